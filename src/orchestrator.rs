//! Request/response cycle for visualization runs.
//!
//! The orchestrator owns the only [`RequestState`]. `submit` dispatches the
//! remote call on a background task and returns at once; settlements come back
//! over a channel and are applied one at a time, in the order they settle.

use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::{AppConfig, ResponseOrdering};
use crate::editor::{apply_highlight, EditorSurface};
use crate::errors::VisualizeError;
use crate::models::{ErrorInfo, VisualizationResult};
use crate::results::{MediaLoadFailure, ResultSet};
use crate::service::VisualizeService;

/// Identifies one submission. Issued in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    /// The error exists only while the state is `Failed`.
    Failed(ErrorInfo),
}

impl RequestState {
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            RequestState::Failed(info) => Some(info),
            _ => None,
        }
    }

    pub fn error_line(&self) -> Option<u32> {
        self.error_info().and_then(|info| info.line_number)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RequestState::Failed(_))
    }
}

/// What happened to a settled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    /// The response was applied and produced this state.
    Applied { request: RequestId, state: RequestState },
    /// The response was older than the newest submission and was dropped.
    Discarded { request: RequestId },
}

type Outcome = Result<Vec<VisualizationResult>, VisualizeError>;

struct Settlement {
    request: RequestId,
    outcome: Outcome,
}

pub struct VisualizationOrchestrator<E: EditorSurface> {
    service: Arc<dyn VisualizeService>,
    ordering: ResponseOrdering,
    editor: E,
    state: RequestState,
    results: ResultSet,
    media_failures: Vec<MediaLoadFailure>,
    last_issued: u64,
    in_flight: usize,
    settled_tx: mpsc::UnboundedSender<Settlement>,
    settled_rx: mpsc::UnboundedReceiver<Settlement>,
}

impl<E: EditorSurface> VisualizationOrchestrator<E> {
    pub fn new(config: &AppConfig, service: Arc<dyn VisualizeService>, editor: E) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            service,
            ordering: config.response_ordering,
            editor,
            state: RequestState::Idle,
            results: ResultSet::new(),
            media_failures: Vec::new(),
            last_issued: 0,
            in_flight: 0,
            settled_tx,
            settled_rx,
        }
    }

    /// Starts a new run with `code`. Returns immediately; earlier in-flight
    /// requests are not cancelled. Must be called inside a Tokio runtime.
    pub fn submit(&mut self, code: String) -> RequestId {
        self.last_issued += 1;
        let request = RequestId(self.last_issued);
        self.in_flight += 1;
        self.media_failures.clear();
        self.transition(RequestState::Submitting);

        log::info!("🚀 Submitting request {} ({} in flight)", request, self.in_flight);

        let service = Arc::clone(&self.service);
        let tx = self.settled_tx.clone();
        tokio::spawn(async move {
            // A panicking or aborted call still settles, as a transport failure.
            let outcome = match tokio::spawn(async move { service.visualize(code).await }).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::error!("Request {} task ended without a response: {}", request, e);
                    Err(VisualizeError::transport(format!("Request did not complete: {}", e)))
                }
            };
            // The receiver lives as long as the orchestrator.
            let _ = tx.send(Settlement { request, outcome });
        });

        request
    }

    /// Waits for the next request to settle and applies it.
    /// Returns `None` when nothing is in flight.
    pub async fn next_settled(&mut self) -> Option<Settled> {
        if self.in_flight == 0 {
            return None;
        }
        let settlement = self.settled_rx.recv().await?;
        Some(self.apply(settlement))
    }

    /// Applies settlements until no request is in flight.
    pub async fn settle_all(&mut self) -> Vec<Settled> {
        let mut settled = Vec::new();
        while let Some(s) = self.next_settled().await {
            settled.push(s);
        }
        settled
    }

    fn apply(&mut self, settlement: Settlement) -> Settled {
        let Settlement { request, outcome } = settlement;
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.ordering == ResponseOrdering::LatestIssued && request.0 < self.last_issued {
            log::warn!(
                "Discarding response for {} (newest request is #{})",
                request,
                self.last_issued
            );
            return Settled::Discarded { request };
        }

        match outcome {
            Ok(results) => {
                log::info!("✅ Request {} succeeded with {} results", request, results.len());
                self.results.replace(results);
                self.media_failures.clear();
                self.transition(RequestState::Succeeded);
            }
            Err(err) => {
                let info = ErrorInfo::from(&err);
                log::error!(
                    "❌ Request {} failed: {} (line: {:?})",
                    request,
                    info.message,
                    info.line_number
                );
                self.transition(RequestState::Failed(info));
            }
        }

        Settled::Applied {
            request,
            state: self.state.clone(),
        }
    }

    fn transition(&mut self, next: RequestState) {
        let touches_failed = self.state.is_failed() || next.is_failed();
        self.state = next;
        if touches_failed {
            apply_highlight(&mut self.editor, self.state.error_line());
        }
    }

    /// Fetches the video for the result at `index`. A failure is recorded as a
    /// media notice and leaves the request state alone.
    pub async fn load_media(&mut self, index: usize) -> Option<Vec<u8>> {
        self.results.media_key(index)?;
        match self.service.fetch_video(index).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                self.report_media_failure(index, err.message());
                None
            }
        }
    }

    /// Records that the presentation layer could not load the video at `index`.
    pub fn report_media_failure(&mut self, index: usize, reason: impl Into<String>) {
        let Some(key) = self.results.media_key(index) else {
            log::debug!("Media failure reported for index {} which has no video", index);
            return;
        };
        let failure = MediaLoadFailure {
            key,
            reason: reason.into(),
        };
        log::warn!("{}", failure.display_message());
        self.media_failures.push(failure);
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn error_info(&self) -> Option<&ErrorInfo> {
        self.state.error_info()
    }

    pub fn error_line(&self) -> Option<u32> {
        self.state.error_line()
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn media_failures(&self) -> &[MediaLoadFailure] {
        &self.media_failures
    }

    /// All messages the user should currently see: the run's error, if any,
    /// followed by media notices.
    pub fn notices(&self) -> Vec<String> {
        self.error_info()
            .map(ErrorInfo::display_message)
            .into_iter()
            .chain(self.media_failures.iter().map(MediaLoadFailure::display_message))
            .collect()
    }

    /// True while at least one request has not settled.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::BufferEditor;
    use async_trait::async_trait;

    /// Answers every call immediately from a fixed outcome.
    struct FixedService {
        outcome: Outcome,
        video: Result<Vec<u8>, VisualizeError>,
    }

    #[async_trait]
    impl VisualizeService for FixedService {
        async fn visualize(&self, _code: String) -> Outcome {
            self.outcome.clone()
        }

        async fn fetch_video(&self, _index: usize) -> Result<Vec<u8>, VisualizeError> {
            self.video.clone()
        }
    }

    /// Panics instead of answering.
    struct PanickingService;

    #[async_trait]
    impl VisualizeService for PanickingService {
        async fn visualize(&self, _code: String) -> Outcome {
            panic!("renderer crashed")
        }

        async fn fetch_video(&self, _index: usize) -> Result<Vec<u8>, VisualizeError> {
            panic!("renderer crashed")
        }
    }

    fn add_result(video: bool) -> VisualizationResult {
        VisualizationResult {
            operation: "add".to_string(),
            input: "[1,2]+[3,4]".to_string(),
            output: "[4,6]".to_string(),
            video_url: video.then(|| "/video/0".to_string()),
            message: None,
        }
    }

    fn orchestrator(outcome: Outcome) -> VisualizationOrchestrator<BufferEditor> {
        let service = FixedService {
            outcome,
            video: Err(VisualizeError::rejection(404, "not found")),
        };
        VisualizationOrchestrator::new(
            &AppConfig::default(),
            Arc::new(service),
            BufferEditor::with_text("a = 1\nb = 2\nc = a +* b"),
        )
    }

    #[tokio::test]
    async fn starts_idle_and_settles_nothing() {
        let mut orch = orchestrator(Ok(vec![]));
        assert_eq!(orch.state(), &RequestState::Idle);
        assert!(!orch.is_loading());
        assert_eq!(orch.next_settled().await, None);
    }

    #[tokio::test]
    async fn submit_moves_to_submitting_and_keeps_old_results() {
        let mut orch = orchestrator(Ok(vec![add_result(false)]));
        orch.submit("x".to_string());
        orch.settle_all().await;
        assert_eq!(orch.results().len(), 1);

        orch.submit("x".to_string());
        assert_eq!(orch.state(), &RequestState::Submitting);
        assert!(orch.is_loading());
        assert_eq!(orch.results().len(), 1);
    }

    #[tokio::test]
    async fn failure_highlights_and_resubmit_clears() {
        let err = VisualizeError::rejection(400, r#"{"error": "Line 3: unsupported token '*'"}"#);
        let mut orch = orchestrator(Err(err));

        orch.submit("c = a +* b".to_string());
        orch.settle_all().await;
        assert_eq!(orch.error_line(), Some(3));
        assert_eq!(orch.editor().highlighted_lines(), vec![2]);
        assert_eq!(
            orch.notices(),
            vec!["Error processing code: Line 3: unsupported token '*'".to_string()]
        );

        orch.submit("c = a + b".to_string());
        assert_eq!(orch.error_info(), None);
        assert!(orch.editor().highlighted_lines().is_empty());
    }

    #[tokio::test]
    async fn panicking_service_settles_as_transport_failure() {
        let mut orch = VisualizationOrchestrator::new(
            &AppConfig::default(),
            Arc::new(PanickingService),
            BufferEditor::with_text("a = 1"),
        );
        orch.submit("a = 1".to_string());

        let settled = tokio::time::timeout(std::time::Duration::from_secs(5), orch.settle_all())
            .await
            .expect("settlement should not hang");
        assert_eq!(settled.len(), 1);

        let info = orch.error_info().unwrap();
        assert!(info.message.starts_with("Request did not complete"));
        assert_eq!(info.line_number, None);
        assert!(!orch.is_loading());
    }

    #[tokio::test]
    async fn media_failure_composes_with_run_error() {
        let mut orch = orchestrator(Ok(vec![add_result(true)]));
        orch.submit("x".to_string());
        orch.settle_all().await;

        orch.service = Arc::new(FixedService {
            outcome: Err(VisualizeError::rejection(400, r#"{"error": "Line 2: bad operand"}"#)),
            video: Err(VisualizeError::rejection(404, "not found")),
        });
        orch.submit("y".to_string());
        orch.settle_all().await;
        assert!(orch.state().is_failed());

        // The previous run's video slot is still addressable.
        assert_eq!(orch.load_media(0).await, None);
        assert!(orch.state().is_failed());
        assert_eq!(orch.error_line(), Some(2));
        assert_eq!(
            orch.notices(),
            vec![
                "Error processing code: Line 2: bad operand".to_string(),
                "Failed to load video 0 (Request failed with status code 404)".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn media_failure_does_not_change_state() {
        let mut orch = orchestrator(Ok(vec![add_result(true)]));
        orch.submit("x".to_string());
        orch.settle_all().await;

        assert_eq!(orch.load_media(0).await, None);
        assert_eq!(orch.state(), &RequestState::Succeeded);
        assert_eq!(orch.media_failures().len(), 1);
        assert_eq!(orch.media_failures()[0].key.index, 0);

        // No video at that index: nothing to load, nothing reported.
        assert_eq!(orch.load_media(3).await, None);
        assert_eq!(orch.media_failures().len(), 1);
    }
}
