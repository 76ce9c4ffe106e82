//! Numeric validators.

use crate::runner::ds::value::Value;
use crate::runner::plugin::registry::NativeRegistry;
use crate::runner::plugin::types::NativeLibrary;

/// Register the digit validators with the registry.
pub fn register(registry: &mut NativeRegistry) {
    let digits = NativeLibrary::new("digits")
        .add_validator("one_digit", one_digit)
        .add_validator("non_negative", non_negative);

    registry.register_library(digits);
}

/// Accepts whole numbers from 0 through 9, written as integers or as integral floats.
pub fn one_digit(value: &Value) -> Result<(), String> {
    let accepted = match value {
        Value::Integer(i) => (0..=9).contains(i),
        Value::Float(f) => *f > -1.0 && *f < 10.0 && f.fract() == 0.0,
        _ => return Err(format!("expected a number, got {}", value.type_name())),
    };
    if accepted {
        Ok(())
    } else {
        Err(format!("{} is not a single digit", value))
    }
}

pub fn non_negative(value: &Value) -> Result<(), String> {
    match value {
        Value::Integer(i) if *i >= 0 => Ok(()),
        Value::Float(f) if *f >= 0.0 => Ok(()),
        Value::Integer(_) | Value::Float(_) => Err(format!("{} is negative", value)),
        _ => Err(format!("expected a number, got {}", value.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_digit() {
        assert!(one_digit(&Value::Integer(0)).is_ok());
        assert!(one_digit(&Value::Integer(9)).is_ok());
        assert!(one_digit(&Value::Float(4.0)).is_ok());
        assert_eq!(
            one_digit(&Value::Integer(15)),
            Err("15 is not a single digit".to_string())
        );
        assert!(one_digit(&Value::Integer(-1)).is_err());
        assert!(one_digit(&Value::Float(4.5)).is_err());
        assert_eq!(
            one_digit(&Value::str("4")),
            Err("expected a number, got str".to_string())
        );
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative(&Value::Integer(0)).is_ok());
        assert!(non_negative(&Value::Float(-0.5)).is_err());
    }
}
