//! Value extraction strategies.
//!
//! A strategy string such as `contains(lowercase=true)` is parsed into a
//! [`StrategyConfig`], mapped to a [`Strategy`] through a lookup table,
//! and finally bound to the value found at the condition's path to form
//! a [`Comparator`] that is tried against each candidate.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::coerce;
use crate::error::EvalError;

/// A parsed strategy string: lower-cased name plus parenthesized params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyConfig {
    pub name: String,
    pub params: BTreeMap<String, String>,
}

impl StrategyConfig {
    /// Parse `name(key=value;key2=value2)`.
    ///
    /// A param without `=` is stored under `value`. Without a well-formed
    /// parenthesized suffix the whole string is the name.
    pub fn parse(strategy: &str) -> StrategyConfig {
        if let Some(start) = strategy.find('(').filter(|&s| s > 0) {
            if let Some(end) = strategy[start..].find(')').map(|e| e + start) {
                let mut params = BTreeMap::new();
                for item in strategy[start + 1..end].split(';') {
                    match item.find('=').filter(|&sep| sep > 0) {
                        Some(sep) => {
                            params.insert(
                                item[..sep].trim().to_string(),
                                item[sep + 1..].trim().to_string(),
                            );
                        }
                        None => {
                            params.insert("value".to_string(), item.trim().to_string());
                        }
                    }
                }
                return StrategyConfig {
                    name: strategy[..start].to_lowercase(),
                    params,
                };
            }
        }
        StrategyConfig {
            name: strategy.to_lowercase(),
            params: BTreeMap::new(),
        }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// The closed set of comparison strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// No strategy: loose equality against the value itself.
    Direct,
    /// Compare the value's length.
    Length,
    /// Substring containment, optionally lower-casing the value.
    Contains { lowercase: bool },
    /// Unrecognized name: the value's truthiness decides.
    Unknown(String),
}

type StrategyBuilder = fn(&StrategyConfig) -> Strategy;

fn build_length(_: &StrategyConfig) -> Strategy {
    Strategy::Length
}

fn build_contains(config: &StrategyConfig) -> Strategy {
    Strategy::Contains {
        lowercase: config.param("lowercase") == Some("true"),
    }
}

const STRATEGIES: &[(&str, StrategyBuilder)] =
    &[("length", build_length), ("contains", build_contains)];

impl Strategy {
    /// Select the strategy for an optional strategy string.
    pub fn resolve(strategy: Option<&str>) -> Strategy {
        match strategy.filter(|s| !s.is_empty()) {
            None => Strategy::Direct,
            Some(s) => Strategy::from_config(&StrategyConfig::parse(s)),
        }
    }

    pub fn from_config(config: &StrategyConfig) -> Strategy {
        STRATEGIES
            .iter()
            .find(|(name, _)| *name == config.name)
            .map(|(_, build)| build(config))
            .unwrap_or_else(|| {
                log::debug!(
                    "unknown strategy '{}', falling back to value truthiness",
                    config.name
                );
                Strategy::Unknown(config.name.clone())
            })
    }

    /// Bind the strategy to the value extracted from the property bag.
    pub fn comparator<'v>(&self, value: Option<&'v Value>) -> Comparator<'v> {
        match self {
            Strategy::Direct => Comparator::Equal(value),
            Strategy::Length => {
                let length = value
                    .filter(|v| coerce::is_truthy(Some(*v)))
                    .and_then(length_of);
                match length {
                    Some(len) if coerce::is_truthy(Some(&len)) => Comparator::Length(len.as_f64()),
                    _ => Comparator::ZeroLength,
                }
            }
            Strategy::Contains { lowercase } => {
                match value.filter(|v| coerce::is_truthy(Some(*v))) {
                    Some(v) => Comparator::Contains {
                        value: v,
                        lowercase: *lowercase,
                    },
                    None => Comparator::Never,
                }
            }
            Strategy::Unknown(_) => Comparator::Constant(coerce::is_truthy(value)),
        }
    }
}

/// A strategy bound to a property value, tested against candidates.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparator<'v> {
    /// Strict equality, or the stringified value equals a string candidate.
    Equal(Option<&'v Value>),
    /// The value has a non-zero length. `None` when that length is not a
    /// number, in which case no candidate can equal it.
    Length(Option<f64>),
    /// The value has no length: only `0` and `"0"` match.
    ZeroLength,
    Contains { value: &'v Value, lowercase: bool },
    Never,
    /// Ignores the candidate.
    Constant(bool),
}

impl Comparator<'_> {
    pub fn matches(&self, expected: &Value) -> Result<bool, EvalError> {
        match self {
            Comparator::Equal(None) => Ok(false),
            Comparator::Equal(Some(value)) => {
                if coerce::strict_equals(value, expected) {
                    return Ok(true);
                }
                if !coerce::is_truthy(Some(*value)) {
                    return Ok(false);
                }
                let stringified = coerce::to_string(value)?;
                Ok(expected.as_str() == Some(stringified.as_str()))
            }
            Comparator::Length(length) => {
                let wanted = coerce::to_number(expected)?;
                Ok(length.map_or(false, |l| l == wanted))
            }
            Comparator::ZeroLength => Ok(match expected {
                Value::Number(n) => n.as_f64() == Some(0.0),
                Value::String(s) => s == "0",
                _ => false,
            }),
            Comparator::Contains { value, lowercase } => {
                let mut haystack = coerce::to_string(value)?;
                if *lowercase {
                    haystack = haystack.to_lowercase();
                }
                Ok(haystack.contains(&coerce::display_string(expected)))
            }
            Comparator::Never => Ok(false),
            Comparator::Constant(result) => Ok(*result),
        }
    }
}

/// The `length` a value exposes: UTF-16 units for strings, element count
/// for arrays, the `length` member of objects.
fn length_of(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => Some(Value::from(s.encode_utf16().count())),
        Value::Array(items) => Some(Value::from(items.len())),
        Value::Object(map) => map.get("length").cloned(),
        _ => None,
    }
}
