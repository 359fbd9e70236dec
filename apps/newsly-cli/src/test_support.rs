use std::sync::Arc;

use newsly::{MemoryStore, NewslyClient};

use crate::app::App;
use crate::config::AppConfig;

/// App whose API address refuses connections, over an in-memory local store.
pub fn offline_app() -> (App, Arc<MemoryStore>) {
    offline_app_with(AppConfig::default())
}

pub fn offline_app_with(mut config: AppConfig) -> (App, Arc<MemoryStore>) {
    config.api.base_url = "http://127.0.0.1:1".to_owned();
    let client = NewslyClient::new(&config.api).unwrap();
    let local = Arc::new(MemoryStore::new());
    let app = App::from_parts(config, Arc::new(client), local.clone());
    (app, local)
}

pub fn output(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}
