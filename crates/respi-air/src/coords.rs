//! Coordinate coercion for loosely typed request bodies

use serde_json::Value;

use respi_core::{Error, Result};

/// Accept a JSON number or a numeric string such as `"28.6"`
pub fn coerce_coordinate(value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidInput(format!("Invalid coordinate: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_and_numeric_strings() {
        assert_eq!(coerce_coordinate(&json!(28.6)).unwrap(), 28.6);
        assert_eq!(coerce_coordinate(&json!(-77)).unwrap(), -77.0);
        assert_eq!(coerce_coordinate(&json!("28.6")).unwrap(), 28.6);
        assert_eq!(coerce_coordinate(&json!(" 77.2 ")).unwrap(), 77.2);
    }

    #[test]
    fn test_rejects_everything_else() {
        for value in [json!("north"), json!(""), json!(null), json!(true), json!([1.0]), json!("NaN")] {
            let err = coerce_coordinate(&value).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{value} should be rejected");
        }
    }
}
