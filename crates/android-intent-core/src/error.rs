// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the intent bridge.

use thiserror::Error;

/// Top-level error type for all intent bridge operations.
#[derive(Debug, Error)]
pub enum IntentError {
    // -- Dispatch --
    #[error("application context not set; cannot send intent")]
    MissingApplicationContext,

    #[error("invalid launch request: {0}")]
    InvalidRequest(String),

    #[error("unsupported extra `{key}`: {reason}")]
    UnsupportedExtra { key: String, reason: String },

    #[error("provider URI could not be issued: {0}")]
    ProviderUri(String),

    // -- Host channel --
    #[error("method not implemented: {0}")]
    NotImplemented(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl IntentError {
    /// Stable machine-readable code reported back to the host layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingApplicationContext => "NO_CONTEXT",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::UnsupportedExtra { .. } => "UNSUPPORTED_EXTRA",
            Self::ProviderUri(_) => "PROVIDER_URI",
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
            Self::Serialization(_) => "SERIALIZATION",
            Self::Bridge(_) => "BRIDGE",
            Self::PlatformUnavailable => "UNAVAILABLE",
        }
    }
}

#[cfg(target_os = "android")]
impl From<jni::errors::Error> for IntentError {
    fn from(e: jni::errors::Error) -> Self {
        Self::Bridge(e.to_string())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, IntentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_variant() {
        let errors = [
            IntentError::MissingApplicationContext,
            IntentError::InvalidRequest("x".into()),
            IntentError::UnsupportedExtra {
                key: "k".into(),
                reason: "r".into(),
            },
            IntentError::ProviderUri("x".into()),
            IntentError::NotImplemented("x".into()),
            IntentError::Bridge("x".into()),
            IntentError::PlatformUnavailable,
        ];
        let mut codes: Vec<_> = errors.iter().map(IntentError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn unsupported_extra_message_names_key() {
        let err = IntentError::UnsupportedExtra {
            key: "payload".into(),
            reason: "null values cannot be bundled".into(),
        };
        assert!(err.to_string().contains("`payload`"));
    }
}
