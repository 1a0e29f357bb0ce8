//! Local input validation.
//!
//! Everything here fails with `ClientError::InvalidInput` and never reaches the cluster.

use crate::client::error::ClientError;

/// Parses `"0.1, 0.2, 0.3"` into an input vector.
pub fn parse_input_vector(text: &str) -> Result<Vec<f64>, ClientError> {
    let values = text
        .split(',')
        .map(|item| {
            let item = item.trim();
            item.parse::<f64>()
                .map_err(|_| ClientError::InvalidInput(format!("'{}' is not a number", item)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_input_vector(&values)?;
    Ok(values)
}

pub fn validate_input_vector(values: &[f64]) -> Result<(), ClientError> {
    if values.is_empty() {
        return Err(ClientError::InvalidInput("Input vector is empty".to_string()));
    }
    if let Some(position) = values.iter().position(|v| !v.is_finite()) {
        return Err(ClientError::InvalidInput(format!(
            "Input vector element {} is not a finite number",
            position
        )));
    }
    Ok(())
}

pub fn validate_name(kind: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::InvalidInput(format!("{} must not be empty", kind)));
    }
    Ok(())
}
