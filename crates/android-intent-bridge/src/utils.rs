// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stateless intent helpers: file-open intents and handler checks.
//
// Both helpers run under one process-wide lock so that no two callers are
// inside the package manager / provider calls at the same time.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument};

use android_intent_core::error::{IntentError, Result};
use android_intent_core::types::{ACTION_VIEW, Intent, IntentFlags};
use android_intent_core::BridgeConfig;

use crate::traits::IntentPlatform;

static UTILS_LOCK: Mutex<()> = Mutex::new(());

fn serialized() -> MutexGuard<'static, ()> {
    UTILS_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Build an `ACTION_VIEW` intent for a local file.
///
/// On SDK levels at or above `config.provider_uri_min_sdk` the path is
/// wrapped in a FileProvider URI under `<package><authority suffix>`, which
/// grants the receiving app temporary read access. Older devices get a raw
/// `file://` URI. The intent always carries `ACTIVITY_NEW_TASK` and
/// `GRANT_READ_URI_PERMISSION`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn open_file_intent<P: IntentPlatform>(
    platform: &P,
    config: &BridgeConfig,
    context: &P::Context,
    path: &Path,
) -> Result<Intent> {
    let _guard = serialized();

    if path.as_os_str().is_empty() {
        return Err(IntentError::InvalidRequest("file path is empty".into()));
    }

    let sdk = platform.sdk_version();
    let uri = if sdk >= config.provider_uri_min_sdk {
        let authority = config.provider_authority(&platform.package_name(context)?);
        platform.provider_uri(context, &authority, path)?
    } else {
        platform.file_uri(path)?
    };

    let mut intent = Intent::new(ACTION_VIEW);
    intent
        .set_data_and_type(uri, &config.open_file_mime_type)
        .set_flags(IntentFlags::ACTIVITY_NEW_TASK | IntentFlags::GRANT_READ_URI_PERMISSION);

    debug!(%intent, sdk, "built file-open intent");
    Ok(intent)
}

/// Whether at least one installed activity can handle `intent`.
#[instrument(skip_all, fields(action = %intent.action))]
pub fn validate_intent<P: IntentPlatform>(
    platform: &P,
    context: &P::Context,
    intent: &Intent,
) -> Result<bool> {
    let _guard = serialized();

    let handlers = platform.query_intent_activities(context, intent)?;
    debug!(count = handlers.len(), "queried intent handlers");
    Ok(!handlers.is_empty())
}
