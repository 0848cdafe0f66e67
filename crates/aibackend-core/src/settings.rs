//! The raw settings mapping a backend config is resolved from.
//!
//! Values stay as `serde_json::Value` until resolution so that the same
//! mapping can come from a TOML file, environment variables or code. Keys are
//! stored upper-cased; `null` values behave as if the key were absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{ConfigError, Result};

pub const MODEL_ID: &str = "MODEL_ID";
pub const TOKEN_LIMIT: &str = "TOKEN_LIMIT";
pub const CHUNK_OVERLAP_CHARACTERS: &str = "CHUNK_OVERLAP_CHARACTERS";
pub const EMBEDDING_OUTPUT_DIMENSIONS: &str = "EMBEDDING_OUTPUT_DIMENSIONS";
pub const LENGTH_CALCULATOR: &str = "LENGTH_CALCULATOR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct ConfigSettings {
    values: BTreeMap<String, Value>,
}

impl ConfigSettings {
    pub fn new() -> Self { Self::default() }

    /// Start a mapping with the one required key.
    pub fn for_model(model_id: impl Into<String>) -> Self {
        let model_id: String = model_id.into();
        Self::new().with(MODEL_ID, model_id)
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_ascii_uppercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values
            .get(&key.to_ascii_uppercase())
            .filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool { self.get(key).is_some() }

    pub fn model_id(&self) -> Result<&str> {
        match self.get(MODEL_ID) {
            None => Err(ConfigError::missing(MODEL_ID)),
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.as_str()),
            Some(Value::String(_)) => Err(ConfigError::missing(MODEL_ID)),
            Some(other) => Err(ConfigError::wrong_type(MODEL_ID, "str", describe(other))),
        }
    }

    /// Read an optional integer override, coercing numeric strings.
    pub fn optional_int(&self, key: &str) -> Result<Option<usize>> {
        self.get(key).map(|v| coerce_int(key, v)).transpose()
    }

    pub fn optional_str(&self, key: &str) -> Result<Option<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(ConfigError::wrong_type(key, "str", describe(other))),
        }
    }
}

impl From<BTreeMap<String, Value>> for ConfigSettings {
    fn from(map: BTreeMap<String, Value>) -> Self {
        let values = map
            .into_iter()
            .map(|(k, v)| (k.to_ascii_uppercase(), v))
            .collect();
        Self { values }
    }
}

impl From<ConfigSettings> for BTreeMap<String, Value> {
    fn from(settings: ConfigSettings) -> Self { settings.values }
}

/// Coerce a settings value into a non-negative integer.
///
/// Accepts integers, non-negative floats (truncated toward zero) and strings
/// holding an integer. Strings may carry surrounding whitespace, a leading
/// `+` and single `_` separators between digits (`"8_000"`).
pub fn coerce_int(field: &str, value: &Value) -> Result<usize> {
    let invalid = || ConfigError::wrong_type(field, "int", describe(value));
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return usize::try_from(u).map_err(|_| invalid());
            }
            match n.as_f64() {
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                Some(f) if f.is_finite() && f >= 0.0 && f.trunc() <= usize::MAX as f64 => {
                    Ok(f.trunc() as usize)
                }
                _ => Err(invalid()),
            }
        }
        Value::String(s) => parse_digits(s).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

fn parse_digits(text: &str) -> Option<usize> {
    let text = text.trim();
    let digits = text.strip_prefix('+').unwrap_or(text);
    let well_formed = !digits.starts_with('_') && !digits.ends_with('_') && !digits.contains("__");
    if !well_formed || !digits.bytes().all(|b| b.is_ascii_digit() || b == b'_') {
        return None;
    }
    digits.replace('_', "").parse().ok()
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "NoneType".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(n) if n.is_f64() => format!("float ({n})"),
        Value::Number(n) if n.is_u64() => format!("int ({n})"),
        Value::Number(n) => format!("negative int ({n})"),
        Value::String(s) => format!("str ({s:?})"),
        Value::Array(_) => "list".to_string(),
        Value::Object(_) => "dict".to_string(),
    }
}
