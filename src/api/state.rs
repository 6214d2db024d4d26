// src/api/state.rs
use crate::config::AppConfig;
use crate::errors::Result;
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}
