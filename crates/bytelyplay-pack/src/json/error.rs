//! JSON encoder/decoder error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("integer `{0}` does not fit in 64-bit signed range")]
    IntegerOverflow(String),
    #[error("non-finite float {0} has no JSON representation")]
    NonFiniteFloat(f64),
    #[error("number `{0}` is out of 64-bit float range")]
    FloatOverflow(String),
    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),
}
