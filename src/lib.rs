// src/lib.rs
pub mod config;
pub mod errors;
pub mod models;
pub mod locator;
pub mod editor;
pub mod results;
pub mod service;
pub mod orchestrator;
pub mod form;
pub mod banner;
pub mod api;

pub use config::{AppConfig, ResponseOrdering};
pub use editor::{apply_highlight, BufferEditor, EditorSurface};
pub use errors::{Result, VisualizeError, VizError};
pub use form::SubmissionForm;
pub use models::{ErrorInfo, VisualizationResult};
pub use orchestrator::{RequestId, RequestState, Settled, VisualizationOrchestrator};
pub use results::{FreshnessToken, MediaKey, MediaLoadFailure, ResultSet};
pub use service::{HttpVisualizeService, VisualizeService};
