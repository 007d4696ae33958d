use std::{fmt, ops::Index};

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use smol_str::SmolStr;

/// Keyed container produced for the root and every `[label]` level.
pub type Map = IndexMap<SmolStr, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    List,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Scalar => "scalar",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        };
        f.write_str(name)
    }
}

/// A node of the decoded tree.
///
/// `Scalar(None)` marks a plain key that appeared without `=`. It is treated as
/// a vacant slot when a later bracket path wants to put a container there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(Option<String>),
    List(Vec<Value>),
    Map(Map),
}

impl Value {
    pub fn string(text: impl Into<String>) -> Self {
        Value::Scalar(Some(text.into()))
    }

    pub const fn absent() -> Self {
        Value::Scalar(None)
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
        }
    }

    pub const fn is_absent(&self) -> bool {
        matches!(self, Value::Scalar(None))
    }

    pub const fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Some(text)) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_list().and_then(|items| items.get(index))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::absent()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Self::Output {
        match self {
            Value::List(items) => items
                .get(index)
                .unwrap_or_else(|| panic!("index {index} out of bounds")),
            other => panic!("cannot index {} with usize", other.kind()),
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Self::Output {
        match self {
            Value::Map(map) => map
                .get(key)
                .unwrap_or_else(|| panic!("key `{key}` not found")),
            other => panic!("cannot index {} with &str", other.kind()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(Some(text)) => serializer.serialize_str(text),
            Value::Scalar(None) => serializer.serialize_unit(),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key.as_str(), value)?;
                }
                out.end()
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Scalar(Some(text)) => serde_json::Value::String(text.clone()),
            Value::Scalar(None) => serde_json::Value::Null,
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(map) => serde_json::Value::Object(map_to_json(map)),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Scalar(Some(text)) => serde_json::Value::String(text),
            Value::Scalar(None) => serde_json::Value::Null,
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key.to_string(), serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// JSON object view of a parsed root, keeping insertion order.
pub fn map_to_json(map: &Map) -> serde_json::Map<String, serde_json::Value> {
    map.iter()
        .map(|(key, value)| (key.to_string(), serde_json::Value::from(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        let mut inner = Map::new();
        inner.insert("id".into(), Value::string("1"));
        inner.insert("gone".into(), Value::absent());
        Value::List(vec![Value::Map(inner), Value::string("x")])
    }

    #[test]
    fn accessors_follow_variant() {
        let value = sample();
        assert!(value.is_list());
        assert_eq!(value[0]["id"].as_str(), Some("1"));
        assert!(value[0]["gone"].is_absent());
        assert_eq!(value.get_index(1).and_then(Value::as_str), Some("x"));
        assert!(value.get_index(2).is_none());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn json_view_maps_absent_to_null() {
        assert_eq!(sample().to_json(), json!([{"id": "1", "gone": null}, "x"]));
        assert_eq!(
            serde_json::to_value(sample()).expect("serialize"),
            json!([{"id": "1", "gone": null}, "x"])
        );
    }

    #[test]
    fn map_equality_ignores_insertion_order() {
        let mut left = Map::new();
        left.insert("a".into(), Value::string("1"));
        left.insert("b".into(), Value::string("2"));
        let mut right = Map::new();
        right.insert("b".into(), Value::string("2"));
        right.insert("a".into(), Value::string("1"));
        assert_eq!(Value::Map(left), Value::Map(right));
    }

    #[test]
    #[should_panic(expected = "cannot index scalar with &str")]
    fn indexing_scalar_by_key_panics() {
        let _ = &Value::string("x")["a"];
    }
}
