use crate::domain::Number;
use serde::Serialize;
use std::fmt::Display;

// Semantic property type
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Number,
    String,
    Boolean,
    Object,
}

impl Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PropertyKind::Number => "number",
            PropertyKind::String => "string",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Object => "object",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(Number),
    String(String),
    Boolean(bool),
    Object(serde_json::Map<String, serde_json::Value>),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Number(_) => PropertyKind::Number,
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::Boolean(_) => PropertyKind::Boolean,
            PropertyValue::Object(_) => PropertyKind::Object,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn default_for(kind: PropertyKind) -> PropertyValue {
        match kind {
            PropertyKind::Number => PropertyValue::Number(Number::PositiveInt(0)),
            PropertyKind::String => PropertyValue::String(String::new()),
            PropertyKind::Boolean => PropertyValue::Boolean(false),
            PropertyKind::Object => PropertyValue::Object(serde_json::Map::new()),
        }
    }
}

macro_rules! number_value_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PropertyValue {
                fn from(value: $t) -> Self {
                    PropertyValue::Number(Number::from(value))
                }
            }
        )*
    };
}

number_value_from!(u8, u16, u64, i64, f64);

impl From<Number> for PropertyValue {
    fn from(value: Number) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::String(s) => write!(f, "{}", s),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::Object(o) => write!(f, "{}", serde_json::Value::Object(o.clone())),
        }
    }
}
