use serde::Serializer;
use serde::ser::SerializeMap;

/// Serialize ordered `(key, value)` pairs as a JSON object, keeping input order.
pub fn serialize_pairs_as_map<S>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (k, v) in pairs {
        map.serialize_entry(k, v)?;
    }
    map.end()
}
