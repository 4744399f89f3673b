use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// The main error type for auxgcp operations.
///
/// Every variant is terminal for the invocation that produced it; nothing
/// in the crate retries or substitutes defaults.
#[derive(Debug, Error)]
pub enum AuxGcpError {
    #[error("Failed to retrieve {location}: {message}")]
    Retrieval { location: String, message: String },

    #[error("Malformed sidecar document {location}: {message}")]
    MalformedDocument { location: String, message: String },

    #[error("No <Metadata> entry with a <GeodataXform> found in {location}")]
    MissingGeoreference { location: String },

    #[error("Invalid numeric value '{value}' at {array}[{index}] in {location}")]
    NumericFormat {
        location: String,
        array: &'static str,
        index: usize,
        value: String,
    },

    #[error("Sidecar document yielded zero control points")]
    EmptyControlPointSet,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl AuxGcpError {
    pub(crate) fn malformed(location: &str, message: impl Into<String>) -> Self {
        AuxGcpError::MalformedDocument {
            location: location.to_string(),
            message: message.into(),
        }
    }
}
