//! Evaluation errors.

/// Message carried by every coercion failure.
pub const NOT_STRING_OR_NUMBER: &str = "the passed value is not a string or a number";

/// All errors that can be raised while evaluating a condition tree.
///
/// A malformed tree is never an error; only values that cannot be coerced
/// when a comparison requires it are.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// A value could not be converted to a number or a string.
    #[error("the passed value is not a string or a number: {value}")]
    Coercion { value: serde_json::Value },
}

impl EvalError {
    pub fn coercion(value: &serde_json::Value) -> Self {
        EvalError::Coercion {
            value: value.clone(),
        }
    }

    /// The structured `{error, value}` object handed to JSON consumers.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            EvalError::Coercion { value } => serde_json::json!({
                "error": NOT_STRING_OR_NUMBER,
                "value": value,
            }),
        }
    }
}
