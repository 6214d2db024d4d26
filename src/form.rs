// src/form.rs
use crate::editor::EditorSurface;
use crate::orchestrator::{RequestId, VisualizationOrchestrator};

/// Holds the source text the user is editing and hands a copy of it to the
/// orchestrator on submit. No validation happens here.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    code: String,
}

impl SubmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn submit<E: EditorSurface>(&self, orchestrator: &mut VisualizationOrchestrator<E>) -> RequestId {
        orchestrator.submit(self.code.clone())
    }
}
