//! Helpers shared by search service implementations.

use crate::error::{ProspectError, Result};
use crate::service::ImportOutcome;
use keel_backend::FunctionResponse;
use keel_core::RecordId;
use serde_json::Value;

/// Header carrying the credits billed for a call.
pub const CREDITS_HEADER: &str = "x-credits-consumed";

/// Credits billed for a call.
///
/// Read from the `x-credits-consumed` header, falling back to a
/// `credits_consumed` body field; zero when neither is present or parseable.
#[must_use]
pub fn credits_consumed(response: &FunctionResponse) -> f64 {
    let from_header = response
        .header(CREDITS_HEADER)
        .and_then(|v| v.trim().parse::<f64>().ok());
    let from_body = || {
        response
            .body
            .get("credits_consumed")
            .and_then(Value::as_f64)
    };

    match from_header.or_else(from_body) {
        Some(credits) if credits.is_finite() && credits >= 0.0 => credits,
        Some(credits) => {
            tracing::warn!("Ignoring invalid credits figure {credits}");
            0.0
        }
        None => {
            tracing::debug!("Response carries no credits figure");
            0.0
        }
    }
}

/// Parse the body of an import call.
///
/// # Errors
/// `Decode` if the table id or row count is missing.
pub fn import_outcome(body: &Value) -> Result<ImportOutcome> {
    let table_id = match body.get("table_id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(ProspectError::Decode(
                "import response has no table_id".to_string(),
            ))
        }
    };
    let row_count = body
        .get("row_count")
        .and_then(Value::as_u64)
        .ok_or_else(|| ProspectError::Decode("import response has no row_count".to_string()))?;

    Ok(ImportOutcome {
        table_id: RecordId::new(table_id).map_err(|e| ProspectError::Decode(e.to_string()))?,
        row_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn response(headers: &[(&str, &str)], body: &str) -> FunctionResponse {
        let headers: HashMap<String, String> = headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        FunctionResponse::from_parts(200, headers, body).expect("valid response")
    }

    #[test]
    fn test_credits_from_header() {
        let r = response(&[("X-Credits-Consumed", "2.5")], r#"{"credits_consumed": 9}"#);
        assert!((credits_consumed(&r) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_credits_fall_back_to_body() {
        let r = response(&[("x-credits-consumed", "n/a")], r#"{"credits_consumed": 0.5}"#);
        assert!((credits_consumed(&r) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_credits_missing_or_negative() {
        assert!(credits_consumed(&response(&[], "{}")).abs() < f64::EPSILON);
        let r = response(&[("x-credits-consumed", "-1")], "{}");
        assert!(credits_consumed(&r).abs() < f64::EPSILON);
    }

    #[test]
    fn test_import_outcome() {
        let outcome = import_outcome(&json!({ "table_id": "tbl_9", "row_count": 47 })).unwrap();
        assert_eq!(outcome.table_id.as_str(), "tbl_9");
        assert_eq!(outcome.row_count, 47);

        let outcome = import_outcome(&json!({ "table_id": 12, "row_count": 1 })).unwrap();
        assert_eq!(outcome.table_id.as_str(), "12");

        assert!(import_outcome(&json!({ "row_count": 1 })).is_err());
        assert!(import_outcome(&json!({ "table_id": "", "row_count": 1 })).is_err());
        assert!(import_outcome(&json!({ "table_id": "t" })).is_err());
    }
}
