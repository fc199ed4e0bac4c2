//! Float-to-decimal conversion for the keyed-table backend
//!
//! DynamoDB has no binary floating point type; numbers travel as decimal
//! strings. [`to_decimal_tree`] walks a serialized item and replaces every
//! float with a [`BigDecimal`] built from the float's shortest round-trip
//! representation (so `0.1` stays `0.1` instead of its 55-digit binary
//! expansion). Integers, strings, booleans and nulls pass through as-is.
//!
//! The walk knows nothing about DynamoDB: [`to_attribute_value`] is the
//! separate step that maps the resulting tree onto `AttributeValue`.

use aws_sdk_dynamodb::types::AttributeValue;
use bigdecimal::{BigDecimal, ParseBigDecimalError};
use serde_json::{Number, Value};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// A serialized item with every float replaced by a decimal
#[derive(Debug, Clone, PartialEq)]
pub enum TableValue {
    Null,
    Bool(bool),
    /// Integer, left exactly as it was written
    Integer(Number),
    Decimal(BigDecimal),
    String(String),
    List(Vec<TableValue>),
    Map(BTreeMap<String, TableValue>),
}

/// Recursively convert every float in `value` to a decimal.
pub fn to_decimal_tree(value: Value) -> Result<TableValue, ParseBigDecimalError> {
    Ok(match value {
        Value::Null => TableValue::Null,
        Value::Bool(b) => TableValue::Bool(b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => TableValue::Decimal(float_to_decimal(f)?),
            _ => TableValue::Integer(n),
        },
        Value::String(s) => TableValue::String(s),
        Value::Array(items) => TableValue::List(
            items
                .into_iter()
                .map(to_decimal_tree)
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => TableValue::Map(
            map.into_iter()
                .map(|(k, v)| to_decimal_tree(v).map(|v| (k, v)))
                .collect::<Result<_, _>>()?,
        ),
    })
}

fn float_to_decimal(f: f64) -> Result<BigDecimal, ParseBigDecimalError> {
    // `Display` for f64 yields the shortest string that parses back to `f`.
    // Trailing zeros are folded into the exponent so large magnitudes stay
    // within DynamoDB's 38 significant digits.
    Ok(BigDecimal::from_str(&f.to_string())?.normalized())
}

/// Map a decimal tree onto a DynamoDB attribute.
pub fn to_attribute_value(value: TableValue) -> AttributeValue {
    match value {
        TableValue::Null => AttributeValue::Null(true),
        TableValue::Bool(b) => AttributeValue::Bool(b),
        TableValue::Integer(n) => AttributeValue::N(n.to_string()),
        TableValue::Decimal(d) => AttributeValue::N(d.to_string()),
        TableValue::String(s) => AttributeValue::S(s),
        TableValue::List(items) => {
            AttributeValue::L(items.into_iter().map(to_attribute_value).collect())
        },
        TableValue::Map(map) => AttributeValue::M(to_attribute_map(map)),
    }
}

/// Map the top level of a decimal tree onto a DynamoDB item
pub fn to_attribute_map(map: BTreeMap<String, TableValue>) -> HashMap<String, AttributeValue> {
    map.into_iter()
        .map(|(k, v)| (k, to_attribute_value(v)))
        .collect()
}
