use crate::client::CounterClient;
use crate::config::ServerConfig;
use std::{path::PathBuf, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub site_root: Arc<PathBuf>,
    pub counters: CounterClient,
}

impl AppState {
    pub fn new(site_root: PathBuf, counters: CounterClient) -> Self {
        Self {
            site_root: Arc::new(site_root),
            counters,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.site_root.clone(),
            CounterClient::new(config.counter_base_url.clone()),
        )
    }
}
