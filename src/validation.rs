//! Input checks run before any network access.
//!
//! Each check returns `Ok(())` or the first failing reason; none of them
//! panic or touch shared state.

use crate::error::ValidationError;
use serde_json::Value;

pub const TASK_MIN_CHARS: usize = 3;
pub const TASK_MAX_CHARS: usize = 10_000;
pub const TEMPERATURE_MIN: f64 = 0.0;
pub const TEMPERATURE_MAX: f64 = 2.0;
pub const MAX_TOKENS_MIN: i64 = 1;
pub const MAX_TOKENS_MAX: i64 = 8192;

pub type Validation = std::result::Result<(), ValidationError>;

fn fail<T>(reason: impl Into<String>) -> std::result::Result<T, ValidationError> {
    Err(ValidationError::new(reason))
}

pub fn validate_task(task: &str) -> Validation {
    if task.is_empty() {
        return fail("Please provide a task to execute.");
    }

    let trimmed = task.trim();
    if trimmed.is_empty() {
        return fail("Task cannot be empty or only whitespace.");
    }

    if trimmed.chars().count() < TASK_MIN_CHARS {
        return fail("Task must be at least 3 characters long.");
    }

    if task.chars().count() > TASK_MAX_CHARS {
        return fail("Task is too long (maximum 10,000 characters).");
    }

    Ok(())
}

pub fn validate_temperature(temperature: f64) -> Validation {
    if !temperature.is_finite() {
        return fail("Temperature must be a number.");
    }

    if !(TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&temperature) {
        return fail("Temperature must be between 0.0 and 2.0.");
    }

    Ok(())
}

pub fn validate_max_tokens(max_tokens: i64) -> Validation {
    if max_tokens < MAX_TOKENS_MIN {
        return fail("Max tokens must be at least 1.");
    }

    if max_tokens > MAX_TOKENS_MAX {
        return fail("Max tokens cannot exceed 8192.");
    }

    Ok(())
}

pub fn validate_model<S: AsRef<str>>(model: &str, available_models: &[S]) -> Validation {
    if model.trim().is_empty() {
        return fail("Model identifier cannot be empty.");
    }

    if !available_models.iter().any(|m| m.as_ref() == model) {
        return fail(format!(
            "Model '{}' is not in the available models list.",
            model
        ));
    }

    Ok(())
}

/// Type-checks an untyped temperature, then range-checks it.
pub fn temperature_from_value(value: &Value) -> std::result::Result<f64, ValidationError> {
    let temperature = match value.as_f64() {
        Some(t) if value.is_number() => t,
        _ => return fail("Temperature must be a number."),
    };
    validate_temperature(temperature)?;
    Ok(temperature)
}

/// Type-checks an untyped token budget, then range-checks it.
pub fn max_tokens_from_value(value: &Value) -> std::result::Result<i64, ValidationError> {
    let max_tokens = match value {
        Value::Number(n) if n.is_i64() => n.as_i64().unwrap_or_default(),
        // Only integers above i64::MAX land here.
        Value::Number(n) if n.is_u64() => i64::MAX,
        _ => return fail("Max tokens must be an integer."),
    };
    validate_max_tokens(max_tokens)?;
    Ok(max_tokens)
}
