// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JNI entry points called by the host's Java/Kotlin glue.
//
// The glue declares these on `dev.androidintent.IntentBridge`:
//
//     static native void nativeInit(Context applicationContext, String configJson);
//
// `nativeInit` may be passed a null context when the library is loaded by a
// native activity; the `Context` registered with `ndk-context` is used then.
//     static native void nativeSetActivity(Activity activity);
//     static native void nativeSetApplicationContext(Context context);
//     static native String nativeHandleMethodCall(String callJson);
//
// `nativeSetActivity` is called from the host's attach/detach lifecycle
// hooks (with `null` on detach). Panics never unwind into the JVM.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::OnceLock;

use jni::JNIEnv;
use jni::objects::{GlobalRef, JClass, JObject, JString};
use jni::sys::jstring;
use tracing::{debug, error, info};

use android_intent_core::BridgeConfig;
use android_intent_core::error::{IntentError, Result};

use super::AndroidPlatform;
use crate::channel;
use crate::logging;
use crate::sender::IntentSender;
use crate::traits::IntentPlatform;

static SENDER: OnceLock<IntentSender<AndroidPlatform>> = OnceLock::new();

fn sender() -> Result<&'static IntentSender<AndroidPlatform>> {
    SENDER
        .get()
        .ok_or_else(|| IntentError::Bridge("nativeInit has not been called".into()))
}

/// Run `f`, turning a panic into `fallback`.
fn guarded<T>(entry: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        error!(entry, "panic caught at JNI boundary");
        fallback
    })
}

fn global_or_none(env: &mut JNIEnv<'_>, obj: &JObject<'_>) -> Result<Option<GlobalRef>> {
    if obj.is_null() {
        return Ok(None);
    }
    Ok(Some(env.new_global_ref(obj)?))
}

fn read_string(env: &mut JNIEnv<'_>, value: &JString<'_>) -> Result<Option<String>> {
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(env.get_string(value)?.into()))
}

fn init(env: &mut JNIEnv<'_>, context: &JObject<'_>, config_json: &JString<'_>) -> Result<()> {
    let config = match read_string(env, config_json)? {
        Some(json) => BridgeConfig::from_json_str(&json)?,
        None => BridgeConfig::default(),
    };
    logging::init(&config);

    let sender = match SENDER.get() {
        Some(sender) => {
            sender.ignore_config(&config);
            sender
        }
        None => {
            let platform = AndroidPlatform::new(env.get_java_vm()?)?;
            info!(platform = %platform.platform_name(), "intent bridge initialised");
            SENDER.get_or_init(|| IntentSender::new(platform, config))
        }
    };

    let application = match global_or_none(env, context)? {
        Some(application) => application,
        None => {
            debug!("no context passed to nativeInit; using the ndk-context one");
            sender.platform().ndk_context_ref()?
        }
    };
    sender.set_application_context(Some(application));
    Ok(())
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_androidintent_IntentBridge_nativeInit<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    context: JObject<'local>,
    config_json: JString<'local>,
) {
    guarded("nativeInit", (), || {
        if let Err(e) = init(&mut env, &context, &config_json) {
            error!(error = %e, "intent bridge initialisation failed");
        }
    });
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_androidintent_IntentBridge_nativeSetActivity<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    activity: JObject<'local>,
) {
    guarded("nativeSetActivity", (), || {
        let result = sender().and_then(|sender| {
            sender.set_activity(global_or_none(&mut env, &activity)?);
            Ok(())
        });
        if let Err(e) = result {
            error!(error = %e, "setActivity failed");
        }
    });
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_androidintent_IntentBridge_nativeSetApplicationContext<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    context: JObject<'local>,
) {
    guarded("nativeSetApplicationContext", (), || {
        let result = sender().and_then(|sender| {
            sender.set_application_context(global_or_none(&mut env, &context)?);
            Ok(())
        });
        if let Err(e) = result {
            error!(error = %e, "setApplicationContext failed");
        }
    });
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_dev_androidintent_IntentBridge_nativeHandleMethodCall<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    call_json: JString<'local>,
) -> jstring {
    let panic_reply =
        channel::error_envelope(&IntentError::Bridge("panic in method handler".into()));
    let reply = guarded("nativeHandleMethodCall", panic_reply, || {
        let call = match read_string(&mut env, &call_json) {
            Ok(Some(call)) => call,
            Ok(None) => {
                let e = IntentError::InvalidRequest("null method call".into());
                return channel::error_envelope(&e);
            }
            Err(e) => return channel::error_envelope(&e),
        };
        match sender() {
            Ok(sender) => channel::handle_json(sender, &call),
            Err(e) => channel::error_envelope(&e),
        }
    });

    match env.new_string(reply) {
        Ok(j_reply) => j_reply.into_raw(),
        Err(e) => {
            error!(error = %e, "could not allocate method call reply");
            std::ptr::null_mut()
        }
    }
}
