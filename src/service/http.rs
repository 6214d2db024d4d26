// src/service/http.rs

use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;

use crate::config::AppConfig;
use crate::errors::{Result, VisualizeError};
use crate::models::{VisualizationResult, VisualizeRequest};
use crate::service::VisualizeService;

/// Talks to the rendering service (directly or through the relay) over HTTP.
pub struct HttpVisualizeService {
    client: Client,
    config: AppConfig,
}

impl HttpVisualizeService {
    /// Creates a new `HttpVisualizeService` with the configured request timeout.
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: AppConfig) -> Self {
        Self { client, config }
    }

    async fn rejection(resp: reqwest::Response) -> VisualizeError {
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error body".to_string());
        VisualizeError::rejection(status, body)
    }
}

#[async_trait]
impl VisualizeService for HttpVisualizeService {
    async fn visualize(&self, code: String) -> std::result::Result<Vec<VisualizationResult>, VisualizeError> {
        let url = self.config.visualize_url();
        log::info!("📡 Submitting {} bytes of code to {}", code.len(), url);

        let start = Instant::now();
        let resp = self
            .client
            .post(&url)
            .json(&VisualizeRequest { code })
            .send()
            .await
            .map_err(|e| VisualizeError::transport(e.to_string()))?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;
        log::info!("📥 Visualize response status: {} ({}ms)", status, latency_ms);

        if !status.is_success() {
            return Err(Self::rejection(resp).await);
        }

        resp.json::<Vec<VisualizationResult>>()
            .await
            .map_err(|e| VisualizeError::transport(format!("Unexpected response body: {}", e)))
    }

    async fn fetch_video(&self, index: usize) -> std::result::Result<Vec<u8>, VisualizeError> {
        let url = self.config.video_url(index);
        log::debug!("🎞️  Fetching video {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VisualizeError::transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| VisualizeError::transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
