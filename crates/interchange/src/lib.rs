//! showwhen-interchange: condition document types and deserialization.
//!
//! Provides the typed [`Condition`] tree and the [`ConditionSet`] map of
//! per-widget conditions, plus lenient parsers from `serde_json::Value`.
//! The evaluator and the CLI both depend on this crate for parsing and
//! only ever see the typed model.

pub mod deserialize;
pub mod types;

pub use deserialize::{condition_set_from_json, from_json, parse_condition, InterchangeError};
pub use types::*;
