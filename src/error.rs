// src/error.rs
use thiserror::Error;

/// Error type shared by every calculator in quant-primer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantError {
    /// A scalar input violates its domain (non-positive price, NaN rate, ...)
    #[error("Invalid input '{parameter}' = {value}: {constraint}")]
    InvalidInput {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// A configuration record is inconsistent
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// A series is too short for the requested statistic
    #[error("Series '{series}' has {actual} observations, at least {required} required")]
    InsufficientData {
        series: String,
        required: usize,
        actual: usize,
    },

    /// Equity plus debt does not add up to the purchase price
    #[error(
        "Invalid capital structure: equity {equity} + debt {debt} != purchase price {purchase_price}"
    )]
    InvalidStructure {
        equity: f64,
        debt: f64,
        purchase_price: f64,
    },

    /// Root finder failed to bracket a root or ran out of iterations
    #[error("{method} did not converge after {iterations} iterations: {reason}")]
    NoConvergence {
        method: String,
        iterations: usize,
        reason: String,
    },
}

/// Result type alias for quant-primer operations
pub type QuantResult<T> = Result<T, QuantError>;

/// Boundary validation helpers
pub mod validation {
    use super::{QuantError, QuantResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> QuantResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(QuantError::InvalidInput {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> QuantResult<()> {
        validate_finite(name, value)?;
        if value < 0.0 {
            Err(QuantError::InvalidInput {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is within a closed range
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> QuantResult<()> {
        if !(min..=max).contains(&value) {
            Err(QuantError::InvalidInput {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        } else {
            Ok(())
        }
    }

    /// Validate a confidence level or probability strictly inside (0, 1)
    pub fn validate_probability(name: &str, value: f64) -> QuantResult<()> {
        if !(value > 0.0 && value < 1.0) {
            Err(QuantError::InvalidInput {
                parameter: name.to_string(),
                value,
                constraint: "must lie strictly between 0 and 1".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> QuantResult<()> {
        if !value.is_finite() {
            Err(QuantError::InvalidInput {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a series has enough finite observations
    pub fn validate_series(name: &str, values: &[f64], required: usize) -> QuantResult<()> {
        if values.len() < required {
            return Err(QuantError::InsufficientData {
                series: name.to_string(),
                required,
                actual: values.len(),
            });
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(QuantError::InvalidInput {
                parameter: name.to_string(),
                value: *bad,
                constraint: "series must contain only finite values".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("sigma", 0.2).is_ok());
        assert!(validate_positive("sigma", 0.0).is_err());
        assert!(validate_positive("sigma", -0.1).is_err());
        assert!(validate_positive("sigma", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_probability() {
        assert!(validate_probability("confidence", 0.95).is_ok());
        assert!(validate_probability("confidence", 0.0).is_err());
        assert!(validate_probability("confidence", 1.0).is_err());
        assert!(validate_probability("confidence", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
        assert!(validate_finite("value", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_series() {
        assert!(validate_series("returns", &[0.01, -0.02], 2).is_ok());
        assert_eq!(
            validate_series("returns", &[0.01], 2),
            Err(QuantError::InsufficientData {
                series: "returns".to_string(),
                required: 2,
                actual: 1,
            })
        );
        assert!(validate_series("returns", &[0.01, f64::NAN], 1).is_err());
    }

    #[test]
    fn test_error_display() {
        let error = QuantError::InvalidInput {
            parameter: "strike".to_string(),
            value: -105.0,
            constraint: "must be positive".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("strike"));
        assert!(display.contains("-105"));
        assert!(display.contains("positive"));
    }

    #[test]
    fn test_structure_error_display() {
        let error = QuantError::InvalidStructure {
            equity: 300.0,
            debt: 600.0,
            purchase_price: 1000.0,
        };

        let display = format!("{}", error);
        assert!(display.contains("300"));
        assert!(display.contains("1000"));
    }
}
