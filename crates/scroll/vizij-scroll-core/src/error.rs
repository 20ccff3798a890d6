//! Error types for scroll effects.
//!
//! Missing geometry and missing host capabilities are never errors; they
//! degrade to static defaults. Errors are reserved for caller mistakes.

use serde::{Deserialize, Serialize};

/// Error type for scroll effect operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ScrollFxError {
    /// Named animation preset is not in the catalogue.
    #[error("Unknown animation preset: {name}")]
    UnknownPreset { name: String },

    /// A custom descriptor failed validation.
    #[error("Invalid animation descriptor: {reason}")]
    InvalidDescriptor { reason: String },

    /// Visibility threshold outside [0, 1].
    #[error("Visibility threshold must be within [0, 1], got {value}")]
    InvalidThreshold { value: f32 },

    /// Operation referenced an element that is not registered.
    #[error("Element not registered: {id}")]
    UnknownElement { id: u32 },

    /// Operation referenced a reveal group that does not exist.
    #[error("Reveal group not found: {id}")]
    UnknownGroup { id: u32 },

    /// Configuration value out of range.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// JSON input could not be parsed.
    #[error("Parse error: {reason}")]
    Parse { reason: String },
}

impl ScrollFxError {
    /// Short label used in log lines.
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownPreset { .. } | Self::InvalidDescriptor { .. } => "descriptor",
            Self::InvalidThreshold { .. } => "visibility",
            Self::UnknownElement { .. } | Self::UnknownGroup { .. } => "handle",
            Self::InvalidConfig { .. } => "config",
            Self::Parse { .. } => "parse",
        }
    }
}

impl From<serde_json::Error> for ScrollFxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrollFxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_category() {
        let err = ScrollFxError::UnknownPreset {
            name: "wobble".into(),
        };
        assert_eq!(err.to_string(), "Unknown animation preset: wobble");
        assert_eq!(err.category(), "descriptor");
        assert_eq!(
            ScrollFxError::InvalidThreshold { value: 1.5 }.category(),
            "visibility"
        );
    }

    #[test]
    fn json_errors_convert_to_parse() {
        let err: ScrollFxError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ScrollFxError::Parse { .. }));
    }
}
