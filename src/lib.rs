pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod format;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod page;
pub mod site;
pub mod state;
pub mod updater;

pub use app::router;
pub use client::CounterClient;
pub use config::ServerConfig;
pub use format::format_number;
pub use loader::{on_page_load, LoadReport, SlotOutcome};
pub use page::Document;
pub use state::AppState;
pub use updater::CountApi;
