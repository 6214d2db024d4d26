// src/service/mod.rs

use async_trait::async_trait;

use crate::errors::VisualizeError;
use crate::models::VisualizationResult;

pub mod http;

pub use http::HttpVisualizeService;

/// The remote rendering service as seen from the orchestrator.
///
/// Implementations must not retry; a failed call is reported once and the user
/// decides whether to resubmit.
#[async_trait]
pub trait VisualizeService: Send + Sync {
    /// Submits source code and returns the per-operation results in order.
    ///
    /// # Arguments
    /// * `code` - The source text, passed through untouched (empty is allowed).
    async fn visualize(&self, code: String) -> Result<Vec<VisualizationResult>, VisualizeError>;

    /// Fetches the video for the result at `index` of the latest successful run.
    async fn fetch_video(&self, index: usize) -> Result<Vec<u8>, VisualizeError>;
}
