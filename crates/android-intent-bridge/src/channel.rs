// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Method channel. Decodes the host layer's JSON method calls into typed
// launch requests and routes them to the sender.
//
// Wire shape, as sent by the host glue:
//
//     {"method": "launch", "arguments": {"action": "...", "flags": 268435456,
//      "category": "...", "data": "...", "arguments": {...extras...},
//      "package": "...", "componentName": "...", "filePath": "..."}}
//
// Replies are JSON envelopes: `{"ok": <value>}` or
// `{"error": {"code": "...", "message": "..."}}`.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{instrument, warn};

use android_intent_core::error::{IntentError, Result};
use android_intent_core::types::{
    ComponentName, IntentFlags, IntentSpec, LaunchRequest, extras_from_json,
};

use crate::sender::IntentSender;
use crate::traits::IntentPlatform;

/// Build and start an intent. Replies `null`.
pub const METHOD_LAUNCH: &str = "launch";
/// Report whether an intent would find a handler. Replies a boolean.
pub const METHOD_CAN_RESOLVE: &str = "canResolveActivity";

/// One call from the host.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LaunchArguments {
    action: Option<String>,
    flags: Option<i32>,
    category: Option<String>,
    data: Option<String>,
    /// Extras bundle.
    arguments: Option<Value>,
    package: Option<String>,
    component_name: Option<String>,
    file_path: Option<String>,
}

impl LaunchArguments {
    fn into_request(self) -> Result<LaunchRequest> {
        // A file path overrides everything else.
        if let Some(path) = self.file_path.filter(|p| !p.is_empty()) {
            return Ok(LaunchRequest::OpenFile {
                path: PathBuf::from(path),
            });
        }

        let action = self
            .action
            .filter(|a| !a.is_empty())
            .ok_or_else(|| IntentError::InvalidRequest("`action` is required".into()))?;

        let extras = match self.arguments {
            None | Some(Value::Null) => None,
            Some(value) => Some(extras_from_json(&value)?),
        };

        let component = self
            .component_name
            .filter(|c| !c.is_empty())
            .map(|name| parse_component(self.package.as_deref(), &name))
            .transpose()?;

        Ok(LaunchRequest::Intent(IntentSpec {
            action,
            flags: self.flags.map(IntentFlags::from_bits),
            category: self.category,
            data: self.data,
            extras,
            package: self.package,
            component,
        }))
    }
}

/// Accepts `pkg/class` or a bare class name qualified by `package`.
fn parse_component(package: Option<&str>, name: &str) -> Result<ComponentName> {
    if name.contains('/') {
        return name.parse();
    }
    match package {
        Some(package) if !package.is_empty() => Ok(ComponentName::new(package, name)),
        _ => Err(IntentError::InvalidRequest(format!(
            "component `{name}` needs `package` or the package/class form"
        ))),
    }
}

/// Decode the arguments of a `launch` / `canResolveActivity` call.
pub fn decode_launch(arguments: &Value) -> Result<LaunchRequest> {
    let args: LaunchArguments = match arguments {
        Value::Null => LaunchArguments::default(),
        other => serde_json::from_value(other.clone())?,
    };
    args.into_request()
}

/// Route one host call to the sender.
///
/// A `launch` that fails after decoding is logged and still answers `null`:
/// the host API is fire-and-forget. Malformed arguments and unknown methods
/// are returned as errors.
#[instrument(skip_all, fields(method = %call.method))]
pub fn handle_method_call<P: IntentPlatform>(
    sender: &IntentSender<P>,
    call: &MethodCall,
) -> Result<Value> {
    match call.method.as_str() {
        METHOD_LAUNCH => {
            let request = decode_launch(&call.arguments)?;
            if let Err(e) = sender.send(&request) {
                warn!(error = %e, code = e.code(), "launch failed");
            }
            Ok(Value::Null)
        }
        METHOD_CAN_RESOLVE => {
            let request = decode_launch(&call.arguments)?;
            Ok(Value::Bool(sender.can_resolve(&request)?))
        }
        other => Err(IntentError::NotImplemented(other.to_owned())),
    }
}

/// Decode a JSON call, route it, and encode the reply envelope.
pub fn handle_json<P: IntentPlatform>(sender: &IntentSender<P>, call_json: &str) -> String {
    let result = serde_json::from_str::<MethodCall>(call_json)
        .map_err(IntentError::from)
        .and_then(|call| handle_method_call(sender, &call));
    match result {
        Ok(value) => json!({ "ok": value }).to_string(),
        Err(e) => error_envelope(&e),
    }
}

/// Reply envelope for an error.
pub fn error_envelope(e: &IntentError) -> String {
    json!({ "error": { "code": e.code(), "message": e.to_string() } }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::DispatchContext;
    use crate::testing::{Ctx, RecordingPlatform};
    use android_intent_core::BridgeConfig;
    use android_intent_core::types::ExtraValue;

    fn sender(resolvable: bool) -> IntentSender<RecordingPlatform> {
        IntentSender::with_context(
            RecordingPlatform::new(34, resolvable),
            BridgeConfig::default(),
            DispatchContext {
                activity: None,
                application: Some(Ctx::Application),
            },
        )
    }

    #[test]
    fn decodes_generic_launch() {
        let request = decode_launch(&json!({
            "action": "android.intent.action.VIEW",
            "flags": 0x0400_0000,
            "category": "android.intent.category.BROWSABLE",
            "data": "https://example.com",
            "arguments": {"count": 2},
            "package": "com.example.maps",
            "componentName": ".MapActivity",
        }))
        .expect("decode failed");

        let LaunchRequest::Intent(spec) = request else {
            panic!("expected a generic intent");
        };
        assert_eq!(spec.action, "android.intent.action.VIEW");
        assert_eq!(spec.flags, Some(IntentFlags::ACTIVITY_CLEAR_TOP));
        assert_eq!(spec.data.as_deref(), Some("https://example.com"));
        assert_eq!(spec.extras.unwrap()["count"], ExtraValue::Int(2));
        assert_eq!(
            spec.component,
            Some(ComponentName::new("com.example.maps", "com.example.maps.MapActivity"))
        );
    }

    #[test]
    fn file_path_wins_over_everything_else() {
        let request = decode_launch(&json!({
            "action": "android.intent.action.SEND",
            "data": "https://example.com",
            "package": "com.example",
            "arguments": {"ignored": null},
            "filePath": "/data/app.apk",
        }))
        .expect("decode failed");

        assert_eq!(
            request,
            LaunchRequest::OpenFile {
                path: "/data/app.apk".into()
            }
        );
    }

    #[test]
    fn short_form_component_needs_no_package() {
        let request = decode_launch(&json!({
            "action": "android.intent.action.MAIN",
            "componentName": "com.example/.Main",
        }))
        .expect("decode failed");
        let LaunchRequest::Intent(spec) = request else {
            panic!("expected a generic intent");
        };
        assert_eq!(spec.component.unwrap().class, "com.example.Main");
    }

    #[test]
    fn bare_component_without_package_is_rejected() {
        let result = decode_launch(&json!({
            "action": "android.intent.action.MAIN",
            "componentName": ".Main",
        }));
        assert!(matches!(result, Err(IntentError::InvalidRequest(_))));
    }

    #[test]
    fn missing_action_is_rejected() {
        assert!(matches!(
            decode_launch(&Value::Null),
            Err(IntentError::InvalidRequest(_))
        ));
        assert!(matches!(
            decode_launch(&json!({"data": "https://example.com"})),
            Err(IntentError::InvalidRequest(_))
        ));
    }

    #[test]
    fn launch_replies_null_and_starts_activity() {
        let sender = sender(true);
        let call = json!({
            "method": "launch",
            "arguments": {"action": "android.intent.action.VIEW", "data": "https://example.com"},
        });
        let reply = handle_json(&sender, &call.to_string());
        assert_eq!(reply, r#"{"ok":null}"#);
        assert_eq!(sender.platform().started().len(), 1);
    }

    #[test]
    fn launch_without_context_is_fire_and_forget() {
        let sender = IntentSender::new(RecordingPlatform::new(34, true), BridgeConfig::default());
        let call = MethodCall {
            method: METHOD_LAUNCH.into(),
            arguments: json!({"action": "android.intent.action.VIEW"}),
        };
        assert_eq!(handle_method_call(&sender, &call).unwrap(), Value::Null);
        assert!(sender.platform().started().is_empty());
    }

    #[test]
    fn can_resolve_replies_boolean() {
        let call = MethodCall {
            method: METHOD_CAN_RESOLVE.into(),
            arguments: json!({"action": "android.intent.action.VIEW"}),
        };
        assert_eq!(handle_method_call(&sender(true), &call).unwrap(), json!(true));
        assert_eq!(handle_method_call(&sender(false), &call).unwrap(), json!(false));
    }

    #[test]
    fn unknown_method_and_bad_json_are_errors() {
        let sender = sender(true);

        let reply: Value =
            serde_json::from_str(&handle_json(&sender, r#"{"method": "openSettings"}"#)).unwrap();
        assert_eq!(reply["error"]["code"], "NOT_IMPLEMENTED");

        let reply: Value = serde_json::from_str(&handle_json(&sender, "not json")).unwrap();
        assert_eq!(reply["error"]["code"], "SERIALIZATION");
    }
}
