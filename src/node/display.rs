use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Author-supplied display data the engine never interprets.
///
/// Held as a JSON value in memory. It serializes as JSON text so that it survives
/// formats that are not self-describing, such as the bincode snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayData(pub serde_json::Value);

impl DisplayData {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl From<serde_json::Value> for DisplayData {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for DisplayData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other),
        }
    }
}

impl Serialize for DisplayData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for DisplayData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        serde_json::from_str(&text)
            .map(DisplayData)
            .map_err(serde::de::Error::custom)
    }
}
