use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use super::mac::MacAddress;
use super::schema::{FieldSpec, EXTENSION_FIELDS};
use super::serde_utils::serialize_pairs_as_map;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    #[error("Invalid value for extension '{key}' ({value:?}): {reason}")]
    InvalidFieldValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join_violations(.0))]
    ValidationFailed(Vec<ConstraintViolation>),

    #[error("Line too large: {0} bytes (max: {1} bytes)")]
    LineTooLarge(usize, usize),
}

impl ParseError {
    /// True when the line was well-formed but rejected by a validator.
    pub fn is_validation(&self) -> bool {
        matches!(self, ParseError::ValidationFailed(_))
    }
}

fn join_violations(violations: &[ConstraintViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single constraint broken by an otherwise well-typed event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConstraintViolation {
    pub field: String,
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The seven positional CEF header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CefHeader {
    pub version: i32,
    pub device_vendor: String,
    pub device_product: String,
    pub device_version: String,
    pub device_event_class_id: String,
    pub name: String,
    pub severity: String,
}

impl CefHeader {
    /// Header as a name → value map, keyed by the wire names
    /// (`version`, `deviceVendor`, ...).
    pub fn to_map(&self) -> BTreeMap<&'static str, serde_json::Value> {
        BTreeMap::from([
            ("version", serde_json::Value::from(self.version)),
            ("deviceVendor", self.device_vendor.as_str().into()),
            ("deviceProduct", self.device_product.as_str().into()),
            ("deviceVersion", self.device_version.as_str().into()),
            ("deviceEventClassId", self.device_event_class_id.as_str().into()),
            ("name", self.name.as_str().into()),
            ("severity", self.severity.as_str().into()),
        ])
    }
}

/// A coerced extension value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtensionValue {
    String(String),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Ip(IpAddr),
    Mac(MacAddress),
    Timestamp(DateTime<Utc>),
}

impl ExtensionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtensionValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer and long values widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ExtensionValue::Integer(v) => Some(i64::from(*v)),
            ExtensionValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Float and double values widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExtensionValue::Float(v) => Some(f64::from(*v)),
            ExtensionValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_ip(&self) -> Option<IpAddr> {
        match self {
            ExtensionValue::Ip(ip) => Some(*ip),
            _ => None,
        }
    }

    pub fn as_mac(&self) -> Option<MacAddress> {
        match self {
            ExtensionValue::Mac(mac) => Some(*mac),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            ExtensionValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl fmt::Display for ExtensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionValue::String(s) => f.write_str(s),
            ExtensionValue::Integer(v) => write!(f, "{}", v),
            ExtensionValue::Long(v) => write!(f, "{}", v),
            ExtensionValue::Float(v) => write!(f, "{}", v),
            ExtensionValue::Double(v) => write!(f, "{}", v),
            ExtensionValue::Ip(ip) => write!(f, "{}", ip),
            ExtensionValue::Mac(mac) => write!(f, "{}", mac),
            ExtensionValue::Timestamp(ts) => f.write_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

/// A parsed CEF event.
///
/// Known extensions are keyed by the schema's own key names, so the map can
/// never hold a key the schema does not define. A key has an entry exactly
/// when it appeared in the input; the entry is `None` when the input value
/// was empty and nulls were allowed. Everything else lands in the custom
/// extensions, which keep their raw string form.
#[derive(Debug, Clone, Serialize)]
pub struct CefEvent {
    header: CefHeader,

    extensions: BTreeMap<&'static str, Option<ExtensionValue>>,

    #[serde(rename = "custom", serialize_with = "serialize_pairs_as_map")]
    custom_extensions: Vec<(String, String)>,

    /// Original line (always preserved, never serialized)
    #[serde(skip)]
    raw_content: Bytes,
}

impl CefEvent {
    pub(crate) fn new(header: CefHeader, raw_content: Bytes) -> Self {
        Self {
            header,
            extensions: BTreeMap::new(),
            custom_extensions: Vec::new(),
            raw_content,
        }
    }

    pub(crate) fn insert_known(&mut self, spec: &'static FieldSpec, value: Option<ExtensionValue>) {
        self.extensions.insert(spec.name, value);
    }

    /// Duplicate custom keys keep the last value at the first key's position.
    pub(crate) fn insert_custom(&mut self, key: String, value: String) {
        match self.custom_extensions.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.custom_extensions.push((key, value)),
        }
    }

    pub fn header(&self) -> &CefHeader {
        &self.header
    }

    pub fn header_map(&self) -> BTreeMap<&'static str, serde_json::Value> {
        self.header.to_map()
    }

    /// Value of a known extension; `None` when absent or null.
    pub fn get(&self, key: &str) -> Option<&ExtensionValue> {
        self.extensions.get(key).and_then(Option::as_ref)
    }

    /// Whether a known extension was present in the input, even if null.
    pub fn is_populated(&self, key: &str) -> bool {
        self.extensions.contains_key(key)
    }

    pub fn populated_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.extensions.keys().copied()
    }

    pub fn custom(&self, key: &str) -> Option<&str> {
        self.custom_extensions
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn custom_extensions(&self) -> &[(String, String)] {
        &self.custom_extensions
    }

    /// Extensions as a flat map.
    ///
    /// With `populated_only == false` every schema key is listed, absent ones
    /// as `None`. With `include_custom` the custom extensions are added as
    /// string values.
    pub fn extensions(&self, populated_only: bool, include_custom: bool) -> BTreeMap<String, Option<ExtensionValue>> {
        let mut map: BTreeMap<String, Option<ExtensionValue>> = if populated_only {
            self.extensions
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect()
        } else {
            EXTENSION_FIELDS
                .iter()
                .map(|spec| (spec.name.to_string(), self.extensions.get(spec.name).cloned().flatten()))
                .collect()
        };

        if include_custom {
            for (k, v) in &self.custom_extensions {
                map.insert(k.clone(), Some(ExtensionValue::String(v.clone())));
            }
        }

        map
    }

    pub fn raw_content(&self) -> &Bytes {
        &self.raw_content
    }
}
