//! Canonical, format-independent result shape.
//!
//! Both JSON and XML responses decode into `Value`. Scalars are kept as
//! strings because XML carries no type information; an empty collection is
//! represented by the empty scalar `""` since XML cannot tell an empty map
//! from an empty text node.

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    /// Equality ignores key order.
    Mapping(IndexMap<String, Value>),
}

impl Value {
    /// The empty-collection sentinel.
    pub fn empty() -> Self {
        Value::Scalar(String::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(s) => s.is_empty(),
            Value::Mapping(m) => m.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Mapping(_) => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(m) => Some(m),
            Value::Scalar(_) => None,
        }
    }

    /// Child value under `key`; `None` for scalars and missing keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Follow a sequence of keys, e.g. `["twitter.com", "/home"]`.
    pub fn pointer<'a, I>(&self, path: I) -> Option<&Value>
    where
        I: IntoIterator<Item = &'a str>,
    {
        path.into_iter().try_fold(self, |node, key| node.get(key))
    }

    /// Wrap a mapping, collapsing it to the empty sentinel when it has no
    /// entries.
    pub(crate) fn from_mapping(map: IndexMap<String, Value>) -> Self {
        if map.is_empty() {
            Value::empty()
        } else {
            Value::Mapping(map)
        }
    }

    /// Turn a sequence into a mapping keyed `"0"`, `"1"`, ...
    pub(crate) fn from_sequence<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::from_mapping(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        )
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::empty(),
            serde_json::Value::Bool(b) => Value::Scalar(b.to_string()),
            serde_json::Value::Number(n) => Value::Scalar(n.to_string()),
            serde_json::Value::String(s) => Value::Scalar(s),
            serde_json::Value::Array(items) => {
                Value::from_sequence(items.into_iter().map(Value::from))
            }
            serde_json::Value::Object(map) => Value::from_mapping(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}
