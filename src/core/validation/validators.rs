//! Reusable custom validation steps
//!
//! Each constructor returns a step suitable for
//! [`ListController::with_step`](super::ListController::with_step).

use super::controller::{StepInput, StepResult};
use crate::core::error::StepFailure;
use serde_json::Value;

/// Step: value must be present and parse as an integer
pub fn required_integer(
    code: &'static str,
) -> impl Fn(&StepInput<'_>) -> StepResult + Send + Sync + Clone {
    move |input: &StepInput<'_>| {
        input
            .value
            .and_then(|v| v.parse::<i64>().ok())
            .map(|n| Some(Value::from(n)))
            .ok_or_else(|| StepFailure::new(code))
    }
}

/// Step: value must be present and non-empty after trimming
pub fn required(code: &'static str) -> impl Fn(&StepInput<'_>) -> StepResult + Send + Sync + Clone {
    move |input: &StepInput<'_>| match input.value {
        Some(v) if !v.is_empty() => Ok(Some(Value::String(v.to_string()))),
        _ => Err(StepFailure::new(code)),
    }
}

/// Step: optional value, but when present it must be a decimal number
pub fn optional_decimal(
    code: &'static str,
) -> impl Fn(&StepInput<'_>) -> StepResult + Send + Sync + Clone {
    move |input: &StepInput<'_>| match input.value {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(|n| Some(Value::from(n)))
            .ok_or_else(|| StepFailure::new(code)),
    }
}

/// Step: value, when present, must be one of `allowed`
pub fn one_of(
    allowed: Vec<String>,
    code: &'static str,
) -> impl Fn(&StepInput<'_>) -> StepResult + Send + Sync + Clone {
    move |input: &StepInput<'_>| match input.value {
        None => Ok(None),
        Some(v) if allowed.iter().any(|a| a == v) => Ok(Some(Value::String(v.to_string()))),
        Some(_) => Err(StepFailure::new(code)),
    }
}
