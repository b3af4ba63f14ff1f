//! Parsers turning raw indexer records into normalized domain entities.
//!
//! Records arrive as `serde_json::Value` and are validated field by field;
//! upstream shapes are never deserialized blindly. Subgraph indexers emit
//! big numbers as strings, so numeric extraction accepts both JSON numbers
//! and base-10 numeric strings.

pub mod deal;
pub mod pool;

pub use deal::{parse_deal, parse_upfront_deal};
pub use pool::parse_pool;

use crate::domain::{Address, CoreError};
use serde_json::Value;

/// A present, non-null field.
pub(crate) fn field<'a>(record: &'a Value, name: &str) -> Option<&'a Value> {
    record.get(name).filter(|v| !v.is_null())
}

pub(crate) fn str_field<'a>(record: &'a Value, name: &str) -> Result<&'a str, CoreError> {
    field(record, name)
        .and_then(Value::as_str)
        .ok_or_else(|| CoreError::MalformedRecord(format!("missing string field {}", name)))
}

pub(crate) fn opt_str_field<'a>(record: &'a Value, name: &str) -> Option<&'a str> {
    field(record, name).and_then(Value::as_str)
}

pub(crate) fn address_field(record: &Value, name: &str) -> Result<Address, CoreError> {
    let raw = str_field(record, name)?;
    Address::parse(raw)
        .map_err(|e| CoreError::MalformedRecord(format!("field {}: {}", name, e)))
}

fn value_as_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

pub(crate) fn i64_field(record: &Value, name: &str) -> Result<i64, CoreError> {
    field(record, name)
        .and_then(value_as_i64)
        .ok_or_else(|| CoreError::MalformedRecord(format!("missing integer field {}", name)))
}

pub(crate) fn opt_i64_field(record: &Value, name: &str) -> Result<Option<i64>, CoreError> {
    match field(record, name) {
        None => Ok(None),
        Some(value) => value_as_i64(value).map(Some).ok_or_else(|| {
            CoreError::MalformedRecord(format!("non-integer value in field {}", name))
        }),
    }
}

pub(crate) fn u64_field(record: &Value, name: &str) -> Result<u64, CoreError> {
    let value = i64_field(record, name)?;
    u64::try_from(value)
        .map_err(|_| CoreError::MalformedRecord(format!("negative value in field {}", name)))
}

pub(crate) fn u64_field_or(record: &Value, name: &str, default: u64) -> Result<u64, CoreError> {
    match field(record, name) {
        None => Ok(default),
        Some(_) => u64_field(record, name),
    }
}

pub(crate) fn u8_field(record: &Value, name: &str) -> Result<u8, CoreError> {
    let value = i64_field(record, name)?;
    u8::try_from(value)
        .map_err(|_| CoreError::MalformedRecord(format!("out-of-range value in field {}", name)))
}

pub(crate) fn bool_field_or(record: &Value, name: &str, default: bool) -> bool {
    field(record, name).and_then(Value::as_bool).unwrap_or(default)
}
