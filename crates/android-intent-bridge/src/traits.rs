// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait for the OS collaborators the bridge wraps.
//
// The sender and the intent utilities only ever talk to the operating system
// through this trait, so the decision logic runs unchanged against the JNI
// implementation, the desktop stub, and the test double.

use std::path::Path;

use android_intent_core::error::Result;
use android_intent_core::types::{Intent, ResolvedActivity};

/// The Android APIs the bridge needs: package identity, SDK level, provider
/// URIs, activity resolution, and activity start.
pub trait IntentPlatform: Send + Sync {
    /// Handle to an Android `Context` (an `Activity` or the application).
    type Context: Clone + Send + Sync;

    /// Human-readable platform name (e.g. "Android API 34").
    fn platform_name(&self) -> String;

    /// `Build.VERSION.SDK_INT` of the running device.
    fn sdk_version(&self) -> u32;

    /// `Context.getPackageName()`.
    fn package_name(&self, context: &Self::Context) -> Result<String>;

    /// `FileProvider.getUriForFile(context, authority, new File(path))`,
    /// returned as its string form.
    fn provider_uri(&self, context: &Self::Context, authority: &str, path: &Path)
    -> Result<String>;

    /// `Uri.fromFile(new File(path))`: the absolute path behind `file://`,
    /// percent-encoded the way `Uri.encode(path, "/")` does it.
    fn file_uri(&self, path: &Path) -> Result<String> {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Ok(format!("file://{}", encode_uri_path(&absolute.to_string_lossy())))
    }

    /// `intent.resolveActivity(context.getPackageManager())`.
    fn resolve_activity(
        &self,
        context: &Self::Context,
        intent: &Intent,
    ) -> Result<Option<ResolvedActivity>>;

    /// `context.getPackageManager().queryIntentActivities(intent, 0)`.
    fn query_intent_activities(
        &self,
        context: &Self::Context,
        intent: &Intent,
    ) -> Result<Vec<ResolvedActivity>>;

    /// `context.startActivity(intent)`.
    fn start_activity(&self, context: &Self::Context, intent: &Intent) -> Result<()>;
}

/// Percent-encode everything but `/` and the characters `Uri.encode` leaves
/// alone (`A-Z a-z 0-9 _ - ! . ~ ' ( ) *`). Multi-byte characters are
/// encoded byte by byte as UTF-8.
pub fn encode_uri_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'_'
            | b'-'
            | b'!'
            | b'.'
            | b'~'
            | b'\''
            | b'('
            | b')'
            | b'*'
            | b'/' => encoded.push(char::from(byte)),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingPlatform;

    #[test]
    fn file_uri_escapes_reserved_characters() {
        let platform = RecordingPlatform::new(23, true);
        assert_eq!(
            platform.file_uri(Path::new("/sdcard/Download/app#2 (1).apk")).unwrap(),
            "file:///sdcard/Download/app%232%20(1).apk"
        );
        assert_eq!(
            platform.file_uri(Path::new("/sdcard/a?b%c.apk")).unwrap(),
            "file:///sdcard/a%3Fb%25c.apk"
        );
    }

    #[test]
    fn encode_uri_path_keeps_unreserved_and_encodes_utf8() {
        assert_eq!(
            encode_uri_path("/data/my_app-1.0~beta!.apk"),
            "/data/my_app-1.0~beta!.apk"
        );
        assert_eq!(encode_uri_path("/data/caf\u{e9}.apk"), "/data/caf%C3%A9.apk");
    }
}
