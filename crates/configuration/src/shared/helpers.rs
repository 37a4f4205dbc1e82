use super::errors::ValidationError;

pub fn merge_errors(errors: Vec<anyhow::Error>, new_error: anyhow::Error) -> Vec<anyhow::Error> {
    let mut errors = errors;
    errors.push(new_error);

    errors
}

pub fn merge_errors_vecs(
    errors: Vec<anyhow::Error>,
    new_errors: Vec<anyhow::Error>,
) -> Vec<anyhow::Error> {
    let mut errors = errors;

    for new_error in new_errors.into_iter() {
        errors.push(new_error);
    }

    errors
}

pub fn ensure_value_is_not_empty(value: &str) -> Result<(), anyhow::Error> {
    if value.is_empty() {
        Err(ValidationError::CantBeEmpty().into())
    } else {
        Ok(())
    }
}

pub fn ensure_not_zero(value: u64) -> Result<(), anyhow::Error> {
    if value == 0 {
        Err(ValidationError::CantBeZero().into())
    } else {
        Ok(())
    }
}

pub fn ensure_at_most(value: u64, max: u64) -> Result<(), anyhow::Error> {
    if value > max {
        Err(ValidationError::ExceedsMaximum(value, max).into())
    } else {
        Ok(())
    }
}

/// Render collected errors, one per line, for callers that need a single error.
pub fn join_errors(errors: &[anyhow::Error]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
