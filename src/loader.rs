use crate::client::CounterClient;
use crate::models::CounterKey;
use crate::page::{CounterSlots, Document, Element, TextTarget};
use crate::updater::CountApi;
use chrono::NaiveDate;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    /// The page has no element for this counter; nothing was requested.
    Skipped,
    Counted(u64),
    Failed,
}

impl SlotOutcome {
    fn from_update(value: Option<u64>) -> Self {
        value.map_or(SlotOutcome::Failed, SlotOutcome::Counted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub namespace: Option<String>,
    pub total: SlotOutcome,
    pub today: SlotOutcome,
}

impl LoadReport {
    fn disabled() -> Self {
        Self {
            namespace: None,
            total: SlotOutcome::Skipped,
            today: SlotOutcome::Skipped,
        }
    }
}

/// Runs the counter markup of one page: bumps `site-total` and the daily
/// counter for `today` when the page has elements for them. Pages without
/// the namespace meta tag are left alone.
pub async fn on_page_load(
    client: &CounterClient,
    document: &mut Document,
    today: NaiveDate,
) -> LoadReport {
    let Some(namespace) = document.namespace() else {
        debug!("page has no counter namespace");
        return LoadReport::disabled();
    };

    let api = CountApi::new(namespace, client.clone());
    let total_key = CounterKey::total();
    let today_key = CounterKey::daily(today);
    let CounterSlots { total, today: daily } = document.counter_slots();

    let (total, today) = tokio::join!(
        update_slot(&api, &total_key, total),
        update_slot(&api, &today_key, daily),
    );

    LoadReport {
        namespace: Some(api.namespace),
        total,
        today,
    }
}

async fn update_slot(
    api: &CountApi,
    key: &CounterKey,
    element: Option<&mut Element>,
) -> SlotOutcome {
    match element {
        Some(el) => {
            let value = api.update_counter(key, Some(el as &mut dyn TextTarget), true).await;
            SlotOutcome::from_update(value)
        }
        None => SlotOutcome::Skipped,
    }
}
