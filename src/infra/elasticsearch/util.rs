use reqwest::Response;
use serde_json::Value;

use crate::application::repos::RepoError;

pub fn map_transport_error(err: reqwest::Error) -> RepoError {
    RepoError::Unavailable(err.to_string())
}

/// Decode a successful JSON response, or turn a failed one into [`RepoError::Store`].
pub async fn read_json(response: Response) -> Result<Value, RepoError> {
    let status = response.status();
    let body = response.text().await.map_err(map_transport_error)?;

    if !status.is_success() {
        return Err(RepoError::store(status.as_u16(), error_reason(&body)));
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|err| RepoError::Decode(err.to_string()))
}

/// Best-effort human-readable reason from a store error body: `error.reason`,
/// then a string-valued `error`, then `reason`, else the raw body.
pub(super) fn error_reason(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    let candidates = [
        parsed.pointer("/error/reason"),
        parsed.get("error").filter(|value| value.is_string()),
        parsed.get("reason"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_nested_error_reason() {
        let body = r#"{"error":{"type":"index_not_found_exception","reason":"no such index [report_config]"},"status":404}"#;
        assert_eq!(error_reason(body), "no such index [report_config]");
    }

    #[test]
    fn falls_back_to_string_error_then_reason() {
        assert_eq!(
            error_reason(r#"{"error":"Incorrect HTTP method","status":405}"#),
            "Incorrect HTTP method"
        );
        assert_eq!(error_reason(r#"{"reason":"shard failure"}"#), "shard failure");
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(error_reason("gateway timeout"), "gateway timeout");
        assert_eq!(error_reason(r#"{"status":500}"#), r#"{"status":500}"#);
    }
}
