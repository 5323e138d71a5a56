//! Schema: static CEF Rev 23 field table.
//!
//! Maps every known extension key to its semantic type and the constraint
//! the [`SchemaValidator`](super::validate::SchemaValidator) enforces.
//! Keys absent from this table are custom extensions.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Header keys in wire order.
pub const HEADER_FIELDS: [&str; 7] = [
    "version",
    "deviceVendor",
    "deviceProduct",
    "deviceVersion",
    "deviceEventClassId",
    "name",
    "severity",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Integer,
    Long,
    Float,
    Double,
    /// IPv4 or IPv6
    IpAddress,
    /// IPv4 only (IPv4-mapped IPv6 literals are accepted and unmapped)
    Ipv4Address,
    MacAddress,
    Timestamp,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Long => "long",
            FieldKind::Float => "float",
            FieldKind::Double => "double",
            FieldKind::IpAddress => "ip_address",
            FieldKind::Ipv4Address => "ipv4_address",
            FieldKind::MacAddress => "mac_address",
            FieldKind::Timestamp => "timestamp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    None,
    /// Maximum length in characters
    MaxLength(usize),
    /// Inclusive numeric bounds
    Range { min: Option<i64>, max: Option<i64> },
    /// Case-insensitive enumeration plus a length cap
    OneOf { values: &'static [&'static str], max_len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub constraint: Constraint,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind, constraint: Constraint::None }
}

const fn string(name: &'static str, max_len: usize) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::String, constraint: Constraint::MaxLength(max_len) }
}

const fn one_of(name: &'static str, values: &'static [&'static str], max_len: usize) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::String, constraint: Constraint::OneOf { values, max_len } }
}

const fn bounded(name: &'static str, min: Option<i64>, max: Option<i64>) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Integer, constraint: Constraint::Range { min, max } }
}

const fn int(name: &'static str) -> FieldSpec { field(name, FieldKind::Integer) }
const fn long(name: &'static str) -> FieldSpec { field(name, FieldKind::Long) }
const fn float(name: &'static str) -> FieldSpec { field(name, FieldKind::Float) }
const fn double(name: &'static str) -> FieldSpec { field(name, FieldKind::Double) }
const fn ip(name: &'static str) -> FieldSpec { field(name, FieldKind::IpAddress) }
const fn ipv4(name: &'static str) -> FieldSpec { field(name, FieldKind::Ipv4Address) }
const fn mac(name: &'static str) -> FieldSpec { field(name, FieldKind::MacAddress) }
const fn timestamp(name: &'static str) -> FieldSpec { field(name, FieldKind::Timestamp) }

/// Extension keys defined by CEF Rev 23.
pub static EXTENSION_FIELDS: &[FieldSpec] = &[
    string("act", 63),
    string("app", 31),
    ip("c6a1"),
    string("c6a1Label", 1023),
    ip("c6a2"),
    string("c6a2Label", 1023),
    ip("c6a3"),
    string("c6a3Label", 1023),
    ip("c6a4"),
    string("c6a4Label", 1023),
    float("cfp1"),
    string("cfp1Label", 1023),
    float("cfp2"),
    string("cfp2Label", 1023),
    float("cfp3"),
    string("cfp3Label", 1023),
    float("cfp4"),
    string("cfp4Label", 1023),
    long("cn1"),
    string("cn1Label", 1023),
    long("cn2"),
    string("cn2Label", 1023),
    long("cn3"),
    string("cn3Label", 1023),
    long("cnt"),
    string("cs1", 4000),
    string("cs1Label", 1023),
    string("cs2", 4000),
    string("cs2Label", 1023),
    string("cs3", 4000),
    string("cs3Label", 1023),
    string("cs4", 4000),
    string("cs4Label", 1023),
    string("cs5", 4000),
    string("cs5Label", 1023),
    string("cs6", 4000),
    string("cs6Label", 1023),
    string("destinationDnsDomain", 255),
    string("destinationServiceName", 1023),
    ipv4("destinationTranslatedAddress"),
    int("destinationTranslatedPort"),
    timestamp("deviceCustomDate1"),
    string("deviceCustomDate1Label", 1023),
    timestamp("deviceCustomDate2"),
    string("deviceCustomDate2Label", 1023),
    bounded("deviceDirection", Some(0), Some(1)),
    string("deviceDnsDomain", 255),
    string("deviceExternalId", 255),
    string("deviceFacility", 1023),
    string("deviceInboundInterface", 128),
    string("deviceNtDomain", 255),
    string("deviceOutboundInterface", 128),
    string("devicePayloadId", 128),
    string("deviceProcessName", 1023),
    ipv4("deviceTranslatedAddress"),
    string("dhost", 1023),
    mac("dmac"),
    string("dntdom", 255),
    int("dpid"),
    string("dpriv", 1023),
    string("dproc", 1023),
    bounded("dpt", None, Some(65535)),
    ipv4("dst"),
    string("dtz", 255),
    string("duid", 1023),
    string("duser", 1023),
    ipv4("dvc"),
    string("dvchost", 100),
    mac("dvcmac"),
    int("dvcpid"),
    timestamp("end"),
    string("externalId", 40),
    timestamp("fileCreateTime"),
    string("fileHash", 255),
    string("field", 1023),
    timestamp("fileModificationTime"),
    string("filePath", 1023),
    string("filePermission", 1023),
    string("fileType", 1023),
    timestamp("flexDate1"),
    string("flexDate1Label", 128),
    long("flexNumber1"),
    string("flexNumber1Label", 128),
    long("flexNumber2"),
    string("flexNumber2Label", 128),
    string("flexString1", 1023),
    string("flexString1Label", 128),
    string("flexString2", 1023),
    string("flexString2Label", 128),
    string("fname", 1023),
    int("fsize"),
    int("in"),
    string("msg", 1023),
    timestamp("oldFileCreateTime"),
    string("oldFileHash", 255),
    string("oldField", 1023),
    timestamp("oldFileModificationTime"),
    string("oldFileName", 1023),
    string("oldFilePath", 1023),
    string("oldFilePermission", 1023),
    int("oldFileSize"),
    string("oldFileType", 1023),
    int("out"),
    string("outcome", 63),
    one_of("proto", &["tcp", "udp"], 31),
    string("reason", 1023),
    string("request", 1023),
    string("requestClientApplication", 1023),
    string("requestContext", 2048),
    string("requestCookies", 1023),
    string("requestMethod", 1023),
    timestamp("rt"),
    string("shost", 1023),
    mac("smac"),
    string("sntdom", 255),
    string("sourceDnsDomain", 255),
    string("sourceServiceName", 1023),
    ipv4("sourceTranslatedAddress"),
    int("sourceTranslatedPort"),
    int("spid"),
    string("spriv", 1023),
    string("sproc", 1023),
    bounded("spt", None, Some(65535)),
    ipv4("src"),
    timestamp("start"),
    string("suid", 1023),
    string("suser", 1023),
    bounded("type", Some(0), Some(3)),
    string("agentDnsDomain", 255),
    string("agentNtDomain", 255),
    ipv4("agentTranslatedAddress"),
    string("agentTranslatedZoneExternalID", 200),
    string("agentTranslatedZoneURI", 2048),
    string("agentZoneExternalID", 200),
    string("agentZoneURI", 2048),
    ip("agt"),
    string("ahost", 1023),
    string("aid", 40),
    mac("amac"),
    timestamp("art"),
    string("at", 63),
    string("atz", 255),
    string("av", 31),
    string("cat", 1023),
    string("customerExternalID", 200),
    string("customerURI", 2048),
    string("destinationTranslatedZoneExternalID", 200),
    string("destinationTranslatedZoneURI", 2048),
    string("destinationZoneExternalID", 200),
    string("destinationZoneURI", 2048),
    string("deviceTranslatedZoneExternalID", 200),
    string("deviceTranslatedZoneURI", 2048),
    string("deviceZoneExternalID", 200),
    string("deviceZoneURI", 2048),
    double("dlat"),
    double("dlong"),
    long("eventId"),
    string("rawEvent", 4000),
    double("slat"),
    double("slong"),
    string("sourceTranslatedZoneExternalID", 200),
    string("sourceTranslatedZoneURI", 2048),
    string("sourceZoneExternalID", 200),
    string("sourceZoneURI", 2048),
];

static FIELD_INDEX: LazyLock<HashMap<&'static str, &'static FieldSpec>> = LazyLock::new(|| {
    EXTENSION_FIELDS.iter().map(|spec| (spec.name, spec)).collect()
});

/// Look up a known extension key (case-sensitive, as on the wire).
pub fn lookup(key: &str) -> Option<&'static FieldSpec> {
    FIELD_INDEX.get(key).copied()
}

pub fn is_header_field(key: &str) -> bool {
    HEADER_FIELDS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_no_duplicate_keys() {
        let names: HashSet<_> = EXTENSION_FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names.len(), EXTENSION_FIELDS.len());
    }

    #[test]
    fn test_headers_are_not_extensions() {
        for header in HEADER_FIELDS {
            assert!(is_header_field(header));
            assert!(lookup(header).is_none(), "{} must not be an extension", header);
        }
        for spec in EXTENSION_FIELDS {
            assert!(!is_header_field(spec.name), "{} must not be a header", spec.name);
        }
        assert!(!is_header_field("DeviceVendor"));
    }

    #[test]
    fn test_lookup_types() {
        assert_eq!(lookup("act").unwrap().kind, FieldKind::String);
        assert_eq!(lookup("cn3").unwrap().kind, FieldKind::Long);
        assert_eq!(lookup("spt").unwrap().kind, FieldKind::Integer);
        assert_eq!(lookup("cfp1").unwrap().kind, FieldKind::Float);
        assert_eq!(lookup("dlat").unwrap().kind, FieldKind::Double);
        assert_eq!(lookup("c6a3").unwrap().kind, FieldKind::IpAddress);
        assert_eq!(lookup("dvc").unwrap().kind, FieldKind::Ipv4Address);
        assert_eq!(lookup("smac").unwrap().kind, FieldKind::MacAddress);
        assert_eq!(lookup("rt").unwrap().kind, FieldKind::Timestamp);
    }

    #[test]
    fn test_lookup_constraints() {
        assert_eq!(lookup("act").unwrap().constraint, Constraint::MaxLength(63));
        assert_eq!(
            lookup("deviceDirection").unwrap().constraint,
            Constraint::Range { min: Some(0), max: Some(1) }
        );
        assert_eq!(
            lookup("dpt").unwrap().constraint,
            Constraint::Range { min: None, max: Some(65535) }
        );
        assert!(matches!(lookup("proto").unwrap().constraint, Constraint::OneOf { max_len: 31, .. }));
    }

    #[test]
    fn test_lookup_unknown_and_case_sensitive() {
        assert!(lookup("modelConfidence").is_none());
        assert!(lookup("ACT").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_table_size() {
        assert_eq!(EXTENSION_FIELDS.len(), 164);
    }
}
