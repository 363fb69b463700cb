use crate::client::CounterClient;
use crate::format;
use crate::models::{CounterKey, Endpoint};
use crate::page::TextTarget;
use tracing::{debug, warn};

pub const FAILURE_TEXT: &str = "-";

/// Namespace bound handle onto the counter service, shared with anything
/// else on the page that wants to show or bump a counter.
#[derive(Debug, Clone)]
pub struct CountApi {
    pub namespace: String,
    client: CounterClient,
}

impl CountApi {
    pub fn new(namespace: impl Into<String>, client: CounterClient) -> Self {
        Self {
            namespace: namespace.into(),
            client,
        }
    }

    /// Hits (or reads) a counter and writes the formatted value into
    /// `element`. Returns `None` when the request or the response failed;
    /// the element then shows a dash.
    pub async fn update_counter(
        &self,
        key: &CounterKey,
        element: Option<&mut dyn TextTarget>,
        increment: bool,
    ) -> Option<u64> {
        let endpoint = Endpoint::for_increment(increment);
        match self.client.fetch(endpoint, &self.namespace, key).await {
            Ok(response) => {
                let value = response.extract();
                debug!(namespace = %self.namespace, %key, value, "counter updated");
                if let Some(element) = element {
                    element.set_text(&format::format_number(value));
                }
                Some(value)
            }
            Err(err) => {
                warn!(namespace = %self.namespace, %key, "counter update failed: {err}");
                if let Some(element) = element {
                    element.set_text(FAILURE_TEXT);
                }
                None
            }
        }
    }

    pub fn format_number(value: u64) -> String {
        format::format_number(value)
    }
}
