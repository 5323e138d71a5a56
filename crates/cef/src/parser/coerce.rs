//! Coerce: converts raw extension strings into typed values via the schema.

use std::net::IpAddr;
use tracing::debug;

use super::locale::Locale;
use super::mac::MacAddress;
use super::model::{CefEvent, ExtensionValue, ParseError};
use super::schema::{self, FieldKind, FieldSpec};
use super::timestamp::parse_timestamp;

/// Convert one raw value to the semantic type of its schema entry.
///
/// Returns the failure reason on mismatch; the caller attaches key and value.
pub fn coerce_value(spec: &FieldSpec, raw: &str, locale: Locale) -> Result<ExtensionValue, String> {
    match spec.kind {
        FieldKind::String => Ok(ExtensionValue::String(raw.to_string())),
        FieldKind::Integer => raw
            .parse()
            .map(ExtensionValue::Integer)
            .map_err(|e| format!("expected an integer: {}", e)),
        FieldKind::Long => raw
            .parse()
            .map(ExtensionValue::Long)
            .map_err(|e| format!("expected a long: {}", e)),
        // Floating kinds tolerate surrounding whitespace; integers do not.
        FieldKind::Float => raw
            .trim()
            .parse()
            .map(ExtensionValue::Float)
            .map_err(|e| format!("expected a float: {}", e)),
        FieldKind::Double => raw
            .trim()
            .parse()
            .map(ExtensionValue::Double)
            .map_err(|e| format!("expected a double: {}", e)),
        FieldKind::IpAddress => parse_ip(raw).map(ExtensionValue::Ip),
        FieldKind::Ipv4Address => match parse_ip(raw)? {
            ip @ IpAddr::V4(_) => Ok(ExtensionValue::Ip(ip)),
            IpAddr::V6(_) => Err("expected an IPv4 address".to_string()),
        },
        FieldKind::MacAddress => MacAddress::parse(raw)
            .map(ExtensionValue::Mac)
            .map_err(|e| e.to_string()),
        FieldKind::Timestamp => parse_timestamp(raw, locale)
            .map(ExtensionValue::Timestamp)
            .map_err(|e| e.to_string()),
    }
}

/// Parse an IPv4 or IPv6 literal. IPv4-mapped IPv6 addresses
/// (`::ffff:10.142.108.195`) come back as plain IPv4. Host names are
/// rejected, never resolved.
pub fn parse_ip(raw: &str) -> Result<IpAddr, String> {
    let ip: IpAddr = raw
        .parse()
        .map_err(|_| "expected an IPv4 or IPv6 address".to_string())?;

    Ok(match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
        v4 => v4,
    })
}

/// Route each pair into the event: schema keys are coerced, the rest are
/// kept verbatim as custom extensions.
///
/// With `allow_nulls`, an empty value on a schema key is stored as null
/// instead of being coerced. The first coercion failure aborts.
pub fn apply_extensions(
    event: &mut CefEvent,
    pairs: Vec<(String, &str)>,
    allow_nulls: bool,
    locale: Locale,
) -> Result<(), ParseError> {
    for (key, raw) in pairs {
        let Some(spec) = schema::lookup(&key) else {
            event.insert_custom(key, raw.to_string());
            continue;
        };

        if allow_nulls && raw.is_empty() {
            event.insert_known(spec, None);
            continue;
        }

        match coerce_value(spec, raw, locale) {
            Ok(value) => event.insert_known(spec, Some(value)),
            Err(reason) => {
                debug!(key = %key, value = %raw, kind = spec.kind.as_str(), "CEF extension failed coercion: {}", reason);
                return Err(ParseError::InvalidFieldValue {
                    key,
                    value: raw.to_string(),
                    reason,
                });
            }
        }
    }

    Ok(())
}
