use serde::Deserialize;

/// Integer that MIMO sometimes sends as a JSON string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransportCount {
    Int(i64),
    String(String),
}

impl TransportCount {
    pub fn into_i64(self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(value),
            Self::String(value) => value.trim().parse::<i64>().ok(),
        }
    }
}

/// Boolean that MIMO sometimes sends as `0`/`1` or `"true"`/`"false"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransportFlag {
    Bool(bool),
    Int(i64),
    String(String),
}

impl TransportFlag {
    pub fn into_bool(self) -> bool {
        match self {
            Self::Bool(value) => value,
            Self::Int(value) => value != 0,
            Self::String(value) => matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes"
            ),
        }
    }
}
