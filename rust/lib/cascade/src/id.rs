use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a hierarchy node.
///
/// Server payloads mix numeric and string ids, so both are accepted.
/// A string holding a canonical integer (`"10"`, not `"010"`) is read as
/// the number, so `10` and `"10"` name the same node. Serializes back as
/// a bare JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Num(i64),
    Text(String),
}

impl NodeId {
    /// Parse a textual id, preferring the numeric form when canonical.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => NodeId::Num(n),
            _ => NodeId::Text(s.to_string()),
        }
    }

    /// Read an id out of a JSON value. `null`, objects and arrays yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(NodeId::Num),
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(NodeId::parse(s)),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            NodeId::Num(n) => serde_json::Value::from(*n),
            NodeId::Text(s) => serde_json::Value::from(s.clone()),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Num(n) => write!(f, "{}", n),
            NodeId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Num(n)
    }
}

impl From<i32> for NodeId {
    fn from(n: i32) -> Self {
        NodeId::Num(n as i64)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::parse(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId::parse(&s)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeId::Num(n) => serializer.serialize_i64(*n),
            NodeId::Text(s) => serializer.serialize_str(s),
        }
    }
}

struct NodeIdVisitor;

impl<'de> Visitor<'de> for NodeIdVisitor {
    type Value = NodeId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or string id")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<NodeId, E> {
        Ok(NodeId::Num(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<NodeId, E> {
        i64::try_from(v)
            .map(NodeId::Num)
            .map_err(|_| E::custom(format!("id {} out of range", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<NodeId, E> {
        Ok(NodeId::parse(v))
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeIdVisitor)
    }
}
