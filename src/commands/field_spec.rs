//! `key=value` parsing for record fields and list filters.

use anyhow::{Result, anyhow};
use serde_json::{Number, Value};
use std::str::FromStr;

use crate::users::UserRecord;

/// A single `key=value` pair given on the command line.
#[derive(Debug, PartialEq, Clone)]
pub struct FieldSpec {
    pub key: String,
    pub value: String,
}

impl std::fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl FromStr for FieldSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Split on the first '=' so values may contain '='
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid field '{}'. Expected 'key=value'.", s))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(anyhow!("Invalid field '{}': key cannot be empty.", s));
        }

        Ok(FieldSpec {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl FieldSpec {
    /// The value as JSON: integers and floats become numbers, anything else a string.
    ///
    /// A number is only used when it prints back as the exact input, so text
    /// such as `01234` or `1e5` stays a string.
    pub fn json_value(&self) -> Value {
        let number = match self.value.parse::<i64>() {
            Ok(n) => Some(Number::from(n)),
            Err(_) => self.value.parse::<f64>().ok().and_then(Number::from_f64),
        };

        match number {
            Some(n) if n.to_string() == self.value => Value::Number(n),
            _ => Value::String(self.value.clone()),
        }
    }
}

/// Builds a record from field specs. Later keys overwrite earlier ones.
pub fn to_record(fields: &[FieldSpec]) -> UserRecord {
    fields
        .iter()
        .map(|f| (f.key.clone(), f.json_value()))
        .collect()
}

/// Query parameters from field specs, order preserved.
pub fn to_query(fields: &[FieldSpec]) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|f| (f.key.clone(), f.value.clone()))
        .collect()
}
