//! Error handling for the linking engine
//!
//! This module provides idiomatic Rust error types using thiserror.
//! The taxonomy separates structural errors (required input missing),
//! which abort a call, from resolution outcomes, which degrade into
//! data carrying a confidence score. Low-confidence resolution is only
//! surfaced as an error by the single-reference convenience API, and
//! the error variant still carries the best-effort identifier so the
//! caller can apply its own acceptance threshold.

use thiserror::Error;

/// Main error type for the linking engine.
#[derive(Error, Debug)]
pub enum LinkError {
    /// A required structured input was missing or empty.
    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    /// No identifier could be constructed for the reference at all.
    #[error("could not resolve reference: {reference}")]
    Unresolved { reference: String },

    /// An identifier was computed but its confidence is below the
    /// acceptance threshold. The identifier is still available here.
    #[error("low confidence resolution for {reference} (confidence: {confidence:.2})")]
    LowConfidence {
        reference: String,
        uri: String,
        confidence: f64,
    },

    /// Serialization of a report or extraction result failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_confidence_carries_uri() {
        let err = LinkError::LowConfidence {
            reference: "Article 999".to_string(),
            uri: "https://example.org/gdpr#Art999".to_string(),
            confidence: 0.25,
        };
        let msg = err.to_string();
        assert!(msg.contains("Article 999"));
        assert!(msg.contains("0.25"));
    }
}
