//! Example functions exposed as `tapi.examples.arithmetic.*`.

use anyhow::{anyhow, bail, Result};

/// Fails on `i64` overflow; the API answers 500.
pub fn execute_addition(x: i64, y: i64) -> Result<i64> {
    x.checked_add(y)
        .ok_or_else(|| anyhow!("{x} + {y} overflows a 64-bit integer"))
}

/// Fails on `i64` overflow; the API answers 500.
pub fn execute_subtraction(x: i64, y: i64) -> Result<i64> {
    x.checked_sub(y)
        .ok_or_else(|| anyhow!("{x} - {y} overflows a 64-bit integer"))
}

/// Fails on a zero divisor; the API answers 500.
pub fn execute_divide(x: i64, y: i64) -> Result<f64> {
    if y == 0 {
        bail!("division by zero");
    }
    Ok(x as f64 / y as f64)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_addition_and_subtraction() {
        assert_eq!(execute_addition(5, 10).unwrap(), 15);
        assert_eq!(execute_subtraction(5, 1).unwrap(), 4);
    }

    #[test]
    fn test_overflow_fails_instead_of_wrapping() {
        assert!(execute_addition(i64::MAX, 1).is_err());
        assert!(execute_subtraction(i64::MIN, 1).is_err());
    }

    #[test]
    fn test_divide_by_zero_fails() {
        assert!(execute_divide(5, 0).is_err());
        assert!((execute_divide(5, 2).unwrap() - 2.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_overflow_is_500_through_the_api() {
        let mut api = tapi::Api::new();
        let add = tapi::callable!(execute_addition, x, y);
        api.add_endpoint("add", "/add", &add, tapi::ApiMethod::Post)
            .unwrap();

        let body = format!(r#"{{"x": {}, "y": 1}}"#, i64::MAX);
        let response = api.handle(tapi::ApiRequest::post("/add", body)).await;
        assert_eq!(response.status, 500);

        let response = api
            .handle(tapi::ApiRequest::post("/add", r#"{"x": 5, "y": 10}"#))
            .await;
        assert_eq!(response.status, 200);
    }
}
