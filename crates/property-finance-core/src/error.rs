use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropertyFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (bracket width: {bracket_width})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        bracket_width: Decimal,
    },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PropertyFinanceError {
    fn from(e: serde_json::Error) -> Self {
        PropertyFinanceError::SerializationError(e.to_string())
    }
}
