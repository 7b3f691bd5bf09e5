// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings the host passes in when the bridge is initialised.
///
/// Every field has a default, so the host may send `{}` or only the keys it
/// wants to override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Appended to the application's package name to form the FileProvider
    /// authority declared in the host manifest.
    pub provider_authority_suffix: String,
    /// MIME type set on file-open intents.
    pub open_file_mime_type: String,
    /// First SDK level at which file paths are wrapped in a provider URI
    /// instead of a raw `file://` URI (Android 7.0 enforces this).
    pub provider_uri_min_sdk: u32,
    /// `tracing-subscriber` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl BridgeConfig {
    /// Parse a (possibly partial) JSON configuration object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// FileProvider authority for the given application package.
    pub fn provider_authority(&self, package_name: &str) -> String {
        format!("{package_name}{}", self.provider_authority_suffix)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            provider_authority_suffix: ".flutter_downloader.provider".into(),
            open_file_mime_type: crate::types::MIME_PACKAGE_ARCHIVE.into(),
            provider_uri_min_sdk: 24,
            log_filter: "info".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = BridgeConfig::from_json_str("{}").expect("parse failed");
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            BridgeConfig::from_json_str(r#"{"provider_authority_suffix": ".fileprovider"}"#)
                .expect("parse failed");
        assert_eq!(config.provider_authority_suffix, ".fileprovider");
        assert_eq!(config.provider_uri_min_sdk, 24);
        assert_eq!(
            config.open_file_mime_type,
            "application/vnd.android.package-archive"
        );
    }

    #[test]
    fn authority_appends_suffix() {
        let config = BridgeConfig::default();
        assert_eq!(
            config.provider_authority("com.example.app"),
            "com.example.app.flutter_downloader.provider"
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(BridgeConfig::from_json_str("{not json").is_err());
    }
}
