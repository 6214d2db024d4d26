// src/models.rs
use serde::{Deserialize, Serialize};
use crate::errors::VisualizeError;
use crate::locator;

/// Prefix the front-end puts in front of every failure message it shows.
pub const ERROR_DISPLAY_PREFIX: &str = "Error processing code: ";

/// Outcome of one operation in the submitted code, in the order the
/// rendering service reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationResult {
    pub operation: String,
    pub input: String,
    pub output: String,

    #[serde(default, alias = "videoUrl", skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    /// Set by the service when the operation has no animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VisualizationResult {
    pub fn has_video(&self) -> bool {
        self.video_url.is_some()
    }
}

/// Body of a request to `/visualize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizeRequest {
    pub code: String,
}

/// Error body returned by the service and the relay.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
    pub error: String,
}

/// Diagnostic for a failed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    pub line_number: Option<u32>,
}

impl ErrorInfo {
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let line_number = locator::locate(&message);
        Self { message, line_number }
    }

    /// Text shown to the user.
    pub fn display_message(&self) -> String {
        format!("{}{}", ERROR_DISPLAY_PREFIX, self.message)
    }
}

impl From<&VisualizeError> for ErrorInfo {
    fn from(err: &VisualizeError) -> Self {
        ErrorInfo::from_message(err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_both_video_field_spellings() {
        let snake: VisualizationResult = serde_json::from_value(json!({
            "operation": "add",
            "input": "Operands: [[1, 2], [3, 4]], Keyword Args: {}",
            "output": "[4 6]",
            "video_url": "/video/0"
        }))
        .unwrap();
        assert_eq!(snake.video_url.as_deref(), Some("/video/0"));

        let camel: VisualizationResult = serde_json::from_value(json!({
            "operation": "add",
            "input": "[1,2]+[3,4]",
            "output": "[4,6]",
            "videoUrl": null
        }))
        .unwrap();
        assert!(!camel.has_video());
        assert_eq!(camel.message, None);
    }

    #[test]
    fn keeps_unsupported_animation_message() {
        let result: VisualizationResult = serde_json::from_value(json!({
            "operation": "cumsum",
            "input": "Operands: [[1, 2, 3]], Keyword Args: {}",
            "output": "[1 3 6]",
            "message": "This operation is not supported for Manim animation."
        }))
        .unwrap();
        assert!(!result.has_video());
        assert!(result.message.unwrap().contains("not supported"));
    }

    #[test]
    fn error_info_from_rejection_locates_line() {
        let err = VisualizeError::rejection(400, r#"{"error": "Line 3: unsupported token '#'"}"#);
        let info = ErrorInfo::from(&err);
        assert_eq!(info.line_number, Some(3));
        assert_eq!(
            info.display_message(),
            "Error processing code: Line 3: unsupported token '#'"
        );
    }

    #[test]
    fn error_info_from_transport_has_no_line() {
        let info = ErrorInfo::from(&VisualizeError::transport("operation timed out"));
        assert_eq!(info.message, "operation timed out");
        assert_eq!(info.line_number, None);
    }
}
