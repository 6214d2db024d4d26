// src/errors.rs
use thiserror::Error;

/// Fallback text when a failure carries no usable description at all.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

#[derive(Error, Debug)]
pub enum VizError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VizError>;

/// Failure of a single remote call to the rendering service.
///
/// Every call site has to handle both arms; there is no optional-field probing
/// of an untyped payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VisualizeError {
    /// The call never completed (unreachable host, timeout, unreadable body).
    #[error("{description}")]
    Transport { description: String },

    /// The service answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Rejection {
        status: u16,
        /// The `error` field of the JSON body, when there was one.
        message: Option<String>,
        body: String,
    },
}

impl VisualizeError {
    pub fn transport(description: impl Into<String>) -> Self {
        Self::Transport {
            description: description.into(),
        }
    }

    /// Builds a rejection from a raw response body, pulling out the `error`
    /// string field if the body is a JSON object that has one.
    pub fn rejection(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));
        Self::Rejection {
            status,
            message,
            body,
        }
    }

    /// Human-readable message: the structured error text, else the transport
    /// level description, else a generic fallback.
    pub fn message(&self) -> String {
        let message = match self {
            VisualizeError::Rejection {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            VisualizeError::Rejection { status, .. } => Some(*status),
            VisualizeError::Transport { .. } => None,
        }
    }
}
