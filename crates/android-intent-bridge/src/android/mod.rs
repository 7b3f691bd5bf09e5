// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Each `IntentPlatform` method converts the
// Rust-side `Intent` into an `android.content.Intent` and calls the
// corresponding SDK API through the ART runtime.
//
// ## Architecture notes
//
// Every call runs inside its own JNI local frame, because the calling thread
// is attached permanently and local references would otherwise pile up
// until the thread exits. A Java exception raised by any call is described
// to logcat, cleared, and surfaced as `IntentError::Bridge`.
//
// Context handles are `GlobalRef`s created by the `exports` entry points
// from the `Activity` / `Context` objects the host glue passes in.

#![cfg(target_os = "android")]

pub mod exports;

use std::path::Path;

use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::sys::jsize;
use jni::{JNIEnv, JavaVM};
use tracing::debug;

use android_intent_core::error::{IntentError, Result};
use android_intent_core::types::{ExtraValue, Extras, Intent, ResolvedActivity};

use crate::traits::IntentPlatform;

/// Local reference capacity reserved per bridged call.
const LOCAL_FRAME_CAPACITY: i32 = 32;

const INTENT_RETURN: &str = "Landroid/content/Intent;";

/// Convenience: map any `jni::errors::Error` into `IntentError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> IntentError {
    IntentError::Bridge(format!("{context}: {e}"))
}

fn jlen(len: usize) -> Result<jsize> {
    jsize::try_from(len)
        .map_err(|_| IntentError::Bridge(format!("array of {len} elements too large for JNI")))
}

// ---------------------------------------------------------------------------
// Platform struct
// ---------------------------------------------------------------------------

/// Android implementation of the intent platform.
///
/// Holds the `JavaVM` and the SDK level read once at construction; every
/// other piece of state lives on the Java side.
pub struct AndroidPlatform {
    vm: JavaVM,
    sdk: u32,
}

impl AndroidPlatform {
    /// Wrap a `JavaVM` and read `Build.VERSION.SDK_INT`.
    pub fn new(vm: JavaVM) -> Result<Self> {
        let sdk = {
            let mut env = vm
                .attach_current_thread_permanently()
                .map_err(|e| jni_err("attach_current_thread", e))?;
            let value = env
                .get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
                .map_err(|e| jni_err("Build.VERSION.SDK_INT", e))?
                .i()
                .map_err(|e| jni_err("SDK_INT->i", e))?;
            u32::try_from(value)
                .map_err(|_| IntentError::Bridge(format!("negative SDK_INT {value}")))?
        };
        debug!(sdk, "Android platform attached");
        Ok(Self { vm, sdk })
    }

    /// Global reference to the `Context` registered with `ndk-context`, used
    /// when the host initialises the bridge without passing one in.
    pub fn ndk_context_ref(&self) -> Result<GlobalRef> {
        let ctx = std::panic::catch_unwind(ndk_context::android_context)
            .map_err(|_| IntentError::Bridge("ndk-context was never initialised".into()))?;
        let ptr = ctx.context();
        if ptr.is_null() {
            return Err(IntentError::MissingApplicationContext);
        }
        // SAFETY: the NDK glue stores a valid global jobject for the hosting
        // Context. It is only borrowed to create a new global ref.
        let obj = unsafe { JObject::from_raw(ptr.cast()) };
        let env = self.env()?;
        env.new_global_ref(&obj)
            .map_err(|e| jni_err("new_global_ref(ndk context)", e))
    }

    fn env(&self) -> Result<JNIEnv<'_>> {
        self.vm
            .attach_current_thread_permanently()
            .map_err(|e| jni_err("attach_current_thread", e))
    }

    /// Run `f` inside a fresh local frame, clearing any Java exception it
    /// leaves pending.
    fn with_env<T>(&self, f: impl FnOnce(&mut JNIEnv<'_>) -> Result<T>) -> Result<T> {
        let mut env = self.env()?;
        let result = env.with_local_frame(LOCAL_FRAME_CAPACITY, |env| f(env));
        if env.exception_check().unwrap_or(false) {
            let _ = env.exception_describe();
            let _ = env.exception_clear();
        }
        result
    }
}

impl IntentPlatform for AndroidPlatform {
    type Context = GlobalRef;

    fn platform_name(&self) -> String {
        format!("Android API {}", self.sdk)
    }

    fn sdk_version(&self) -> u32 {
        self.sdk
    }

    fn package_name(&self, context: &GlobalRef) -> Result<String> {
        self.with_env(|env| string_method(env, context.as_obj(), "getPackageName"))
    }

    /// `FileProvider.getUriForFile`. Fails when the path lies outside the
    /// roots declared in the provider's `file_paths` XML.
    fn provider_uri(&self, context: &GlobalRef, authority: &str, path: &Path) -> Result<String> {
        self.with_env(|env| {
            let file_obj = java_file(env, path)?;
            let j_authority: JString = env
                .new_string(authority)
                .map_err(|e| jni_err("new_string(authority)", e))?;

            let uri = env
                .call_static_method(
                    "androidx/core/content/FileProvider",
                    "getUriForFile",
                    "(Landroid/content/Context;Ljava/lang/String;Ljava/io/File;)Landroid/net/Uri;",
                    &[
                        JValue::Object(context.as_obj()),
                        JValue::Object(&j_authority),
                        JValue::Object(&file_obj),
                    ],
                )
                .and_then(|v| v.l())
                .map_err(|e| IntentError::ProviderUri(format!("{authority}: {e}")))?;

            string_method(env, &uri, "toString")
        })
    }

    /// `Uri.fromFile(new File(path)).toString()`.
    fn file_uri(&self, path: &Path) -> Result<String> {
        self.with_env(|env| {
            let file_obj = java_file(env, path)?;
            let uri = env
                .call_static_method(
                    "android/net/Uri",
                    "fromFile",
                    "(Ljava/io/File;)Landroid/net/Uri;",
                    &[JValue::Object(&file_obj)],
                )
                .map_err(|e| jni_err("Uri.fromFile", e))?
                .l()
                .map_err(|e| jni_err("Uri.fromFile->l", e))?;
            string_method(env, &uri, "toString")
        })
    }

    fn resolve_activity(
        &self,
        context: &GlobalRef,
        intent: &Intent,
    ) -> Result<Option<ResolvedActivity>> {
        self.with_env(|env| {
            let j_intent = java_intent(env, intent)?;
            let pm = package_manager(env, context.as_obj())?;

            let component = env
                .call_method(
                    &j_intent,
                    "resolveActivity",
                    "(Landroid/content/pm/PackageManager;)Landroid/content/ComponentName;",
                    &[JValue::Object(&pm)],
                )
                .map_err(|e| jni_err("Intent.resolveActivity", e))?
                .l()
                .map_err(|e| jni_err("resolveActivity->l", e))?;

            if component.is_null() {
                return Ok(None);
            }
            Ok(Some(ResolvedActivity {
                package: string_method(env, &component, "getPackageName")?,
                class: string_method(env, &component, "getClassName")?,
            }))
        })
    }

    fn query_intent_activities(
        &self,
        context: &GlobalRef,
        intent: &Intent,
    ) -> Result<Vec<ResolvedActivity>> {
        self.with_env(|env| {
            let j_intent = java_intent(env, intent)?;
            let pm = package_manager(env, context.as_obj())?;

            let list = env
                .call_method(
                    &pm,
                    "queryIntentActivities",
                    "(Landroid/content/Intent;I)Ljava/util/List;",
                    &[JValue::Object(&j_intent), JValue::Int(0)],
                )
                .map_err(|e| jni_err("PackageManager.queryIntentActivities", e))?
                .l()
                .map_err(|e| jni_err("queryIntentActivities->l", e))?;

            let size = env
                .call_method(&list, "size", "()I", &[])
                .map_err(|e| jni_err("List.size", e))?
                .i()
                .map_err(|e| jni_err("size->i", e))?;

            let mut activities = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
            for index in 0..size {
                let info = env
                    .call_method(&list, "get", "(I)Ljava/lang/Object;", &[JValue::Int(index)])
                    .map_err(|e| jni_err("List.get", e))?
                    .l()
                    .map_err(|e| jni_err("get->l", e))?;
                let activity_info = env
                    .get_field(&info, "activityInfo", "Landroid/content/pm/ActivityInfo;")
                    .map_err(|e| jni_err("ResolveInfo.activityInfo", e))?
                    .l()
                    .map_err(|e| jni_err("activityInfo->l", e))?;

                activities.push(ResolvedActivity {
                    package: string_field(env, &activity_info, "packageName")?,
                    class: string_field(env, &activity_info, "name")?,
                });

                env.delete_local_ref(activity_info)
                    .map_err(|e| jni_err("delete_local_ref(activityInfo)", e))?;
                env.delete_local_ref(info)
                    .map_err(|e| jni_err("delete_local_ref(info)", e))?;
            }
            Ok(activities)
        })
    }

    fn start_activity(&self, context: &GlobalRef, intent: &Intent) -> Result<()> {
        self.with_env(|env| {
            let j_intent = java_intent(env, intent)?;
            env.call_method(
                context.as_obj(),
                "startActivity",
                "(Landroid/content/Intent;)V",
                &[JValue::Object(&j_intent)],
            )
            .map_err(|e| jni_err("startActivity", e))?;
            Ok(())
        })
    }
}

// ---------------------------------------------------------------------------
// Intent conversion
// ---------------------------------------------------------------------------

/// Build an `android.content.Intent` mirroring `intent`.
fn java_intent<'local>(env: &mut JNIEnv<'local>, intent: &Intent) -> Result<JObject<'local>> {
    let j_action: JString = env
        .new_string(&intent.action)
        .map_err(|e| jni_err("new_string(action)", e))?;
    let j_intent = env
        .new_object(
            "android/content/Intent",
            "(Ljava/lang/String;)V",
            &[JValue::Object(&j_action)],
        )
        .map_err(|e| jni_err("new Intent", e))?;

    if !intent.flags.is_empty() {
        call_intent(env, &j_intent, "setFlags", "I", &[JValue::Int(intent.flags.bits())])?;
    }

    for category in &intent.categories {
        let j_category: JString = env
            .new_string(category)
            .map_err(|e| jni_err("new_string(category)", e))?;
        call_intent(
            env,
            &j_intent,
            "addCategory",
            "Ljava/lang/String;",
            &[JValue::Object(&j_category)],
        )?;
    }

    match (&intent.data, &intent.mime_type) {
        (Some(data), Some(mime_type)) => {
            let uri = parse_uri(env, data)?;
            let j_mime: JString = env
                .new_string(mime_type)
                .map_err(|e| jni_err("new_string(mime_type)", e))?;
            call_intent(
                env,
                &j_intent,
                "setDataAndType",
                "Landroid/net/Uri;Ljava/lang/String;",
                &[JValue::Object(&uri), JValue::Object(&j_mime)],
            )?;
        }
        (Some(data), None) => {
            let uri = parse_uri(env, data)?;
            call_intent(env, &j_intent, "setData", "Landroid/net/Uri;", &[JValue::Object(&uri)])?;
        }
        (None, Some(mime_type)) => {
            let j_mime: JString = env
                .new_string(mime_type)
                .map_err(|e| jni_err("new_string(mime_type)", e))?;
            call_intent(
                env,
                &j_intent,
                "setType",
                "Ljava/lang/String;",
                &[JValue::Object(&j_mime)],
            )?;
        }
        (None, None) => {}
    }

    if !intent.extras.is_empty() {
        let bundle = java_bundle(env, &intent.extras)?;
        call_intent(
            env,
            &j_intent,
            "putExtras",
            "Landroid/os/Bundle;",
            &[JValue::Object(&bundle)],
        )?;
    }

    if let Some(package) = &intent.package {
        let j_package: JString = env
            .new_string(package)
            .map_err(|e| jni_err("new_string(package)", e))?;
        call_intent(
            env,
            &j_intent,
            "setPackage",
            "Ljava/lang/String;",
            &[JValue::Object(&j_package)],
        )?;
    }

    if let Some(component) = &intent.component {
        let j_package: JString = env
            .new_string(&component.package)
            .map_err(|e| jni_err("new_string(component.package)", e))?;
        let j_class: JString = env
            .new_string(&component.class)
            .map_err(|e| jni_err("new_string(component.class)", e))?;
        let j_component = env
            .new_object(
                "android/content/ComponentName",
                "(Ljava/lang/String;Ljava/lang/String;)V",
                &[JValue::Object(&j_package), JValue::Object(&j_class)],
            )
            .map_err(|e| jni_err("new ComponentName", e))?;
        call_intent(
            env,
            &j_intent,
            "setComponent",
            "Landroid/content/ComponentName;",
            &[JValue::Object(&j_component)],
        )?;
    }

    Ok(j_intent)
}

/// Call one of the `Intent` builder methods (which all return the intent).
fn call_intent(
    env: &mut JNIEnv<'_>,
    intent: &JObject<'_>,
    method: &str,
    params: &str,
    args: &[JValue<'_, '_>],
) -> Result<()> {
    let sig = format!("({params}){INTENT_RETURN}");
    env.call_method(intent, method, &sig, args)
        .map_err(|e| jni_err(method, e))?;
    Ok(())
}

/// Build an `android.os.Bundle` from typed extras.
fn java_bundle<'local>(env: &mut JNIEnv<'local>, extras: &Extras) -> Result<JObject<'local>> {
    let bundle = env
        .new_object("android/os/Bundle", "()V", &[])
        .map_err(|e| jni_err("new Bundle", e))?;

    for (key, value) in extras {
        let j_key: JString = env
            .new_string(key)
            .map_err(|e| jni_err("new_string(extra key)", e))?;
        let key_arg = JValue::Object(&j_key);

        match value {
            ExtraValue::Bool(v) => {
                put(env, &bundle, "putBoolean", "Z", &[key_arg, JValue::Bool(u8::from(*v))])?;
            }
            ExtraValue::Int(v) => {
                put(env, &bundle, "putInt", "I", &[key_arg, JValue::Int(*v)])?;
            }
            ExtraValue::Long(v) => {
                put(env, &bundle, "putLong", "J", &[key_arg, JValue::Long(*v)])?;
            }
            ExtraValue::Double(v) => {
                put(env, &bundle, "putDouble", "D", &[key_arg, JValue::Double(*v)])?;
            }
            ExtraValue::String(v) => {
                let j_value: JString = env
                    .new_string(v)
                    .map_err(|e| jni_err("new_string(extra)", e))?;
                let args = [key_arg, JValue::Object(&j_value)];
                put(env, &bundle, "putString", "Ljava/lang/String;", &args)?;
            }
            ExtraValue::BoolArray(values) => {
                let array = env
                    .new_boolean_array(jlen(values.len())?)
                    .map_err(|e| jni_err("new_boolean_array", e))?;
                let raw: Vec<u8> = values.iter().map(|v| u8::from(*v)).collect();
                env.set_boolean_array_region(&array, 0, &raw)
                    .map_err(|e| jni_err("set_boolean_array_region", e))?;
                let args = [key_arg, JValue::Object(&array)];
                put(env, &bundle, "putBooleanArray", "[Z", &args)?;
            }
            ExtraValue::IntArray(values) => {
                let array = env
                    .new_int_array(jlen(values.len())?)
                    .map_err(|e| jni_err("new_int_array", e))?;
                env.set_int_array_region(&array, 0, values)
                    .map_err(|e| jni_err("set_int_array_region", e))?;
                put(env, &bundle, "putIntArray", "[I", &[key_arg, JValue::Object(&array)])?;
            }
            ExtraValue::LongArray(values) => {
                let array = env
                    .new_long_array(jlen(values.len())?)
                    .map_err(|e| jni_err("new_long_array", e))?;
                env.set_long_array_region(&array, 0, values)
                    .map_err(|e| jni_err("set_long_array_region", e))?;
                put(env, &bundle, "putLongArray", "[J", &[key_arg, JValue::Object(&array)])?;
            }
            ExtraValue::DoubleArray(values) => {
                let array = env
                    .new_double_array(jlen(values.len())?)
                    .map_err(|e| jni_err("new_double_array", e))?;
                env.set_double_array_region(&array, 0, values)
                    .map_err(|e| jni_err("set_double_array_region", e))?;
                put(env, &bundle, "putDoubleArray", "[D", &[key_arg, JValue::Object(&array)])?;
            }
            ExtraValue::StringList(values) => {
                let list = env
                    .new_object(
                        "java/util/ArrayList",
                        "(I)V",
                        &[JValue::Int(jlen(values.len())?)],
                    )
                    .map_err(|e| jni_err("new ArrayList", e))?;
                for item in values {
                    let j_item: JString = env
                        .new_string(item)
                        .map_err(|e| jni_err("new_string(list item)", e))?;
                    env.call_method(
                        &list,
                        "add",
                        "(Ljava/lang/Object;)Z",
                        &[JValue::Object(&j_item)],
                    )
                    .map_err(|e| jni_err("ArrayList.add", e))?;
                }
                let args = [key_arg, JValue::Object(&list)];
                put(env, &bundle, "putStringArrayList", "Ljava/util/ArrayList;", &args)?;
            }
            ExtraValue::Bundle(inner) => {
                let nested = java_bundle(env, inner)?;
                let args = [key_arg, JValue::Object(&nested)];
                put(env, &bundle, "putBundle", "Landroid/os/Bundle;", &args)?;
            }
        }
    }

    Ok(bundle)
}

/// Call `Bundle.put*(String key, <value_sig> value)`.
fn put(
    env: &mut JNIEnv<'_>,
    bundle: &JObject<'_>,
    method: &str,
    value_sig: &str,
    args: &[JValue<'_, '_>],
) -> Result<()> {
    let sig = format!("(Ljava/lang/String;{value_sig})V");
    env.call_method(bundle, method, &sig, args)
        .map_err(|e| jni_err(method, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// `Uri.parse(uri)`.
fn parse_uri<'local>(env: &mut JNIEnv<'local>, uri: &str) -> Result<JObject<'local>> {
    let j_uri: JString = env
        .new_string(uri)
        .map_err(|e| jni_err("new_string(uri)", e))?;
    env.call_static_method(
        "android/net/Uri",
        "parse",
        "(Ljava/lang/String;)Landroid/net/Uri;",
        &[JValue::Object(&j_uri)],
    )
    .map_err(|e| jni_err("Uri.parse", e))?
    .l()
    .map_err(|e| jni_err("Uri.parse->l", e))
}

/// `new File(path)`.
fn java_file<'local>(env: &mut JNIEnv<'local>, path: &Path) -> Result<JObject<'local>> {
    let j_path: JString = env
        .new_string(path.to_string_lossy())
        .map_err(|e| jni_err("new_string(path)", e))?;
    env.new_object(
        "java/io/File",
        "(Ljava/lang/String;)V",
        &[JValue::Object(&j_path)],
    )
    .map_err(|e| jni_err("new File(path)", e))
}

/// `context.getPackageManager()`.
fn package_manager<'local>(
    env: &mut JNIEnv<'local>,
    context: &JObject<'_>,
) -> Result<JObject<'local>> {
    env.call_method(
        context,
        "getPackageManager",
        "()Landroid/content/pm/PackageManager;",
        &[],
    )
    .map_err(|e| jni_err("getPackageManager", e))?
    .l()
    .map_err(|e| jni_err("getPackageManager->l", e))
}

/// Call a no-argument method returning `String` and copy the result out.
fn string_method(env: &mut JNIEnv<'_>, obj: &JObject<'_>, method: &str) -> Result<String> {
    let j_value = env
        .call_method(obj, method, "()Ljava/lang/String;", &[])
        .map_err(|e| jni_err(method, e))?
        .l()
        .map_err(|e| jni_err(method, e))?;
    java_string(env, j_value, method)
}

/// Read a `String` field and copy it out.
fn string_field(env: &mut JNIEnv<'_>, obj: &JObject<'_>, field: &str) -> Result<String> {
    let j_value = env
        .get_field(obj, field, "Ljava/lang/String;")
        .map_err(|e| jni_err(field, e))?
        .l()
        .map_err(|e| jni_err(field, e))?;
    java_string(env, j_value, field)
}

fn java_string(env: &mut JNIEnv<'_>, obj: JObject<'_>, context: &str) -> Result<String> {
    if obj.is_null() {
        return Err(IntentError::Bridge(format!("{context} returned null")));
    }
    let j_string = JString::from(obj);
    let value: String = env
        .get_string(&j_string)
        .map_err(|e| jni_err(context, e))?
        .into();
    Ok(value)
}
