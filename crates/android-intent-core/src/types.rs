// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the intent bridge: launch requests, the Rust-side
// intent value, flags, components, and typed extras.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::path::PathBuf;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{IntentError, Result};

/// `Intent.ACTION_VIEW`.
pub const ACTION_VIEW: &str = "android.intent.action.VIEW";

/// MIME type Android's package installer registers for.
pub const MIME_PACKAGE_ARCHIVE: &str = "application/vnd.android.package-archive";

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// The 32-bit `Intent` flag word.
///
/// Stored as `i32` because that is what `Intent.addFlags(int)` takes on the
/// Java side; bits above `0x7fff_ffff` therefore appear negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntentFlags(i32);

impl IntentFlags {
    pub const GRANT_READ_URI_PERMISSION: Self = Self(0x0000_0001);
    pub const GRANT_WRITE_URI_PERMISSION: Self = Self(0x0000_0002);
    pub const ACTIVITY_CLEAR_TASK: Self = Self(0x0000_8000);
    pub const ACTIVITY_CLEAR_TOP: Self = Self(0x0400_0000);
    pub const ACTIVITY_NEW_TASK: Self = Self(0x1000_0000);
    pub const ACTIVITY_SINGLE_TOP: Self = Self(0x2000_0000);
    pub const ACTIVITY_NO_HISTORY: Self = Self(0x4000_0000);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> i32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for IntentFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for IntentFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Display for IntentFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// A concrete activity target: package plus fully qualified class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentName {
    pub package: String,
    pub class: String,
}

impl ComponentName {
    /// Build a component, expanding a class name that starts with `.`
    /// relative to the package (`.MainActivity` → `com.example.MainActivity`).
    pub fn new(package: impl Into<String>, class: impl AsRef<str>) -> Self {
        let package = package.into();
        let class = class.as_ref();
        let class = if class.starts_with('.') {
            format!("{package}{class}")
        } else {
            class.to_owned()
        };
        Self { package, class }
    }
}

/// Parses the `pkg/class` short form produced by
/// `ComponentName.flattenToShortString()`.
impl FromStr for ComponentName {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((package, class)) if !package.is_empty() && !class.is_empty() => {
                Ok(Self::new(package, class))
            }
            _ => Err(IntentError::InvalidRequest(format!(
                "component `{s}` is not of the form package/class"
            ))),
        }
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.class)
    }
}

/// An activity the package manager resolved for an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedActivity {
    pub package: String,
    pub class: String,
}

impl fmt::Display for ResolvedActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.class)
    }
}

// ---------------------------------------------------------------------------
// Extras
// ---------------------------------------------------------------------------

/// Key/value bag placed into the intent's extras `Bundle`.
pub type Extras = BTreeMap<String, ExtraValue>;

/// One value of an extras bundle, typed the way `Bundle.put*` expects.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    BoolArray(Vec<bool>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    DoubleArray(Vec<f64>),
    StringList(Vec<String>),
    Bundle(Extras),
}

impl ExtraValue {
    /// Convert a JSON value sent by the host into a bundle value.
    ///
    /// Integers that fit in 32 bits become `Int`, wider ones `Long`; integers
    /// beyond `i64` are rejected rather than rounded to `Double`. Arrays
    /// must be homogeneous; an empty array is treated as a string list.
    pub fn from_json(key: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Null => Err(unsupported(key, "null values cannot be bundled")),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(v) => Ok(i32::try_from(v).map_or(Self::Long(v), Self::Int)),
                None if n.is_u64() => Err(unsupported(key, "number out of range")),
                None => n
                    .as_f64()
                    .map(Self::Double)
                    .ok_or_else(|| unsupported(key, "number out of range")),
            },
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Array(items) => array_from_json(key, items),
            Value::Object(_) => Ok(Self::Bundle(extras_from_json(value)?)),
        }
    }
}

/// Convert a JSON object into an extras bundle.
pub fn extras_from_json(value: &Value) -> Result<Extras> {
    let Value::Object(map) = value else {
        return Err(IntentError::InvalidRequest(
            "extras must be a JSON object".into(),
        ));
    };
    map.iter()
        .map(|(key, v)| Ok((key.clone(), ExtraValue::from_json(key, v)?)))
        .collect()
}

fn array_from_json(key: &str, items: &[Value]) -> Result<ExtraValue> {
    if items.iter().all(Value::is_string) {
        return Ok(ExtraValue::StringList(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
        ));
    }
    if items.iter().all(Value::is_boolean) {
        return Ok(ExtraValue::BoolArray(
            items.iter().filter_map(Value::as_bool).collect(),
        ));
    }
    if items.iter().all(|v| v.as_i64().is_some()) {
        let longs: Vec<i64> = items.iter().filter_map(Value::as_i64).collect();
        let ints: Option<Vec<i32>> = longs.iter().map(|v| i32::try_from(*v).ok()).collect();
        return Ok(match ints {
            Some(ints) => ExtraValue::IntArray(ints),
            None => ExtraValue::LongArray(longs),
        });
    }
    if items.iter().any(|v| v.is_u64() && v.as_i64().is_none()) {
        return Err(unsupported(key, "number out of range"));
    }
    if items.iter().all(Value::is_number) {
        return Ok(ExtraValue::DoubleArray(
            items.iter().filter_map(Value::as_f64).collect(),
        ));
    }
    Err(unsupported(
        key,
        "arrays must hold values of a single primitive type",
    ))
}

fn unsupported(key: &str, reason: &str) -> IntentError {
    IntentError::UnsupportedExtra {
        key: key.to_owned(),
        reason: reason.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Parameters of a generic intent launch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntentSpec {
    /// Intent action, e.g. [`ACTION_VIEW`].
    pub action: String,
    pub flags: Option<IntentFlags>,
    pub category: Option<String>,
    /// Data URI, parsed with `Uri.parse` on the Java side.
    pub data: Option<String>,
    pub extras: Option<Extras>,
    /// Target package. Dropped if no activity in it resolves.
    pub package: Option<String>,
    /// Target component. Only applied together with `package`.
    pub component: Option<ComponentName>,
}

impl IntentSpec {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }
}

/// What the host asked the bridge to launch.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchRequest {
    /// Build an intent from the given parameters.
    Intent(IntentSpec),
    /// View a local file (typically an APK) through a content provider.
    OpenFile { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Intent value
// ---------------------------------------------------------------------------

/// Rust-side model of an `android.content.Intent`.
///
/// The setters follow Android's semantics: `set_data` clears the type,
/// `set_type` clears the data, and `set_data_and_type` sets both.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Intent {
    pub action: String,
    pub flags: IntentFlags,
    /// Insertion-ordered and free of duplicates.
    pub categories: Vec<String>,
    pub data: Option<String>,
    pub mime_type: Option<String>,
    pub extras: Extras,
    pub package: Option<String>,
    pub component: Option<ComponentName>,
}

impl Intent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn add_flags(&mut self, flags: IntentFlags) -> &mut Self {
        self.flags |= flags;
        self
    }

    /// Replace the whole flag word.
    pub fn set_flags(&mut self, flags: IntentFlags) -> &mut Self {
        self.flags = flags;
        self
    }

    pub fn add_category(&mut self, category: impl Into<String>) -> &mut Self {
        let category = category.into();
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    pub fn set_data(&mut self, data: impl Into<String>) -> &mut Self {
        self.data = Some(data.into());
        self.mime_type = None;
        self
    }

    pub fn set_type(&mut self, mime_type: impl Into<String>) -> &mut Self {
        self.mime_type = Some(mime_type.into());
        self.data = None;
        self
    }

    pub fn set_data_and_type(
        &mut self,
        data: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> &mut Self {
        self.data = Some(data.into());
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Merge `extras` into the intent's bundle; later keys win.
    pub fn put_extras(&mut self, extras: &Extras) -> &mut Self {
        self.extras
            .extend(extras.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn set_package(&mut self, package: Option<String>) -> &mut Self {
        self.package = package;
        self
    }

    pub fn set_component(&mut self, component: Option<ComponentName>) -> &mut Self {
        self.component = component;
        self
    }

    /// Whether the intent names a target package or component.
    pub fn is_explicit(&self) -> bool {
        self.package.is_some() || self.component.is_some()
    }
}

/// Mirrors `Intent.toString()` so bridge logs read like logcat.
impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Intent {{ act={}", self.action)?;
        if !self.categories.is_empty() {
            write!(f, " cat=[{}]", self.categories.join(","))?;
        }
        if let Some(data) = &self.data {
            write!(f, " dat={data}")?;
        }
        if let Some(mime_type) = &self.mime_type {
            write!(f, " typ={mime_type}")?;
        }
        if !self.flags.is_empty() {
            write!(f, " flg={}", self.flags)?;
        }
        if let Some(package) = &self.package {
            write!(f, " pkg={package}")?;
        }
        if let Some(component) = &self.component {
            write!(f, " cmp={component}")?;
        }
        if !self.extras.is_empty() {
            write!(f, " (has extras)")?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flags_or_together() {
        let mut flags = IntentFlags::ACTIVITY_NEW_TASK;
        flags |= IntentFlags::GRANT_READ_URI_PERMISSION;
        assert!(flags.contains(IntentFlags::ACTIVITY_NEW_TASK));
        assert!(flags.contains(IntentFlags::GRANT_READ_URI_PERMISSION));
        assert_eq!(flags.bits(), 0x1000_0001);
        flags.remove(IntentFlags::ACTIVITY_NEW_TASK);
        assert_eq!(flags, IntentFlags::GRANT_READ_URI_PERMISSION);
    }

    #[test]
    fn component_expands_relative_class() {
        let component = ComponentName::new("com.example", ".MainActivity");
        assert_eq!(component.class, "com.example.MainActivity");

        let component: ComponentName = "com.example/org.other.Activity".parse().unwrap();
        assert_eq!(component.package, "com.example");
        assert_eq!(component.class, "org.other.Activity");
    }

    #[test]
    fn component_rejects_missing_separator() {
        assert!("com.example.MainActivity".parse::<ComponentName>().is_err());
        assert!("/Activity".parse::<ComponentName>().is_err());
    }

    #[test]
    fn extras_from_json_types_scalars() {
        let extras = extras_from_json(&json!({
            "flag": true,
            "small": 7,
            "big": 5_000_000_000_i64,
            "ratio": 0.5,
            "name": "report.pdf",
        }))
        .expect("conversion failed");

        assert_eq!(extras["flag"], ExtraValue::Bool(true));
        assert_eq!(extras["small"], ExtraValue::Int(7));
        assert_eq!(extras["big"], ExtraValue::Long(5_000_000_000));
        assert_eq!(extras["ratio"], ExtraValue::Double(0.5));
        assert_eq!(extras["name"], ExtraValue::String("report.pdf".into()));
    }

    #[test]
    fn extras_from_json_types_arrays_and_bundles() {
        let extras = extras_from_json(&json!({
            "ids": [1, 2, 3],
            "stamps": [1, 5_000_000_000_i64],
            "weights": [1, 2.5],
            "tags": ["a", "b"],
            "nested": {"inner": false},
        }))
        .expect("conversion failed");

        assert_eq!(extras["ids"], ExtraValue::IntArray(vec![1, 2, 3]));
        assert_eq!(
            extras["stamps"],
            ExtraValue::LongArray(vec![1, 5_000_000_000])
        );
        assert_eq!(extras["weights"], ExtraValue::DoubleArray(vec![1.0, 2.5]));
        assert_eq!(
            extras["tags"],
            ExtraValue::StringList(vec!["a".into(), "b".into()])
        );
        let mut inner = Extras::new();
        inner.insert("inner".into(), ExtraValue::Bool(false));
        assert_eq!(extras["nested"], ExtraValue::Bundle(inner));
    }

    #[test]
    fn extras_reject_null_and_mixed_arrays() {
        let err = extras_from_json(&json!({"gone": null})).unwrap_err();
        assert!(matches!(err, IntentError::UnsupportedExtra { ref key, .. } if key == "gone"));

        let err = extras_from_json(&json!({"mixed": [1, "two"]})).unwrap_err();
        assert!(matches!(err, IntentError::UnsupportedExtra { ref key, .. } if key == "mixed"));

        assert!(extras_from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn extras_reject_integers_wider_than_long() {
        let err = extras_from_json(&json!({"big": u64::MAX})).unwrap_err();
        assert!(matches!(
            err,
            IntentError::UnsupportedExtra { ref key, ref reason }
                if key == "big" && reason == "number out of range"
        ));

        let err = extras_from_json(&json!({"bigs": [1, u64::MAX]})).unwrap_err();
        assert!(matches!(err, IntentError::UnsupportedExtra { ref key, .. } if key == "bigs"));

        let extras = extras_from_json(&json!({"max": i64::MAX, "ratio": 0.5})).unwrap();
        assert_eq!(extras["max"], ExtraValue::Long(i64::MAX));
        assert_eq!(extras["ratio"], ExtraValue::Double(0.5));
    }

    #[test]
    fn set_data_and_set_type_clear_each_other() {
        let mut intent = Intent::new(ACTION_VIEW);
        intent.set_type("text/plain");
        intent.set_data("https://example.com");
        assert_eq!(intent.mime_type, None);

        intent.set_type("text/plain");
        assert_eq!(intent.data, None);

        intent.set_data_and_type("content://x/y", MIME_PACKAGE_ARCHIVE);
        assert_eq!(intent.data.as_deref(), Some("content://x/y"));
        assert_eq!(intent.mime_type.as_deref(), Some(MIME_PACKAGE_ARCHIVE));
    }

    #[test]
    fn categories_are_deduplicated() {
        let mut intent = Intent::new(ACTION_VIEW);
        intent
            .add_category("android.intent.category.BROWSABLE")
            .add_category("android.intent.category.BROWSABLE");
        assert_eq!(intent.categories.len(), 1);
    }

    #[test]
    fn display_reads_like_logcat() {
        let mut intent = Intent::new(ACTION_VIEW);
        intent
            .set_data("https://example.com")
            .add_flags(IntentFlags::ACTIVITY_NEW_TASK)
            .set_package(Some("com.android.chrome".into()));
        assert_eq!(
            intent.to_string(),
            "Intent { act=android.intent.action.VIEW dat=https://example.com \
             flg=0x10000000 pkg=com.android.chrome }"
        );
    }
}
