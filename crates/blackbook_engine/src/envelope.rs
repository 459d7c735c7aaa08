//! The `{ success, message, data }` wrapper used by every `/api` route.
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{BackendError, FailureKind};

/// Unwrap an envelope response, returning its `data` payload.
///
/// Non-2xx statuses and `success: false` both fail; the message is taken
/// from `data.error`, then `message`, then `fallback`.
pub(crate) async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T, BackendError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| crate::http::map_reqwest_error(err, fallback))?;
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    if !status.is_success() {
        return Err(BackendError::new(
            FailureKind::HttpStatus(status.as_u16()),
            error_message(&payload, fallback),
        ));
    }
    if !payload.get("success").and_then(Value::as_bool).unwrap_or(false) {
        return Err(BackendError::new(
            FailureKind::Rejected,
            error_message(&payload, fallback),
        ));
    }

    let data = payload.get("data").cloned().unwrap_or(Value::Null);
    serde_json::from_value(data)
        .map_err(|err| BackendError::new(FailureKind::Decode, format!("{fallback}: {err}")))
}

/// Error text from a failed envelope (or any JSON body).
pub fn error_message(payload: &Value, fallback: &str) -> String {
    let from_data = payload
        .get("data")
        .and_then(|data| data.get("error"))
        .and_then(Value::as_str);
    let from_message = payload.get("message").and_then(Value::as_str);

    [from_data, from_message]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::error_message;

    #[test]
    fn data_error_wins_over_message() {
        let payload = json!({
            "success": false,
            "message": "Document generation failed",
            "data": { "error": "template missing placeholder" }
        });
        assert_eq!(
            error_message(&payload, "fallback"),
            "template missing placeholder"
        );
    }

    #[test]
    fn message_used_when_no_data_error() {
        let payload = json!({ "success": false, "message": "Invalid template selected", "data": {} });
        assert_eq!(error_message(&payload, "fallback"), "Invalid template selected");
    }

    #[test]
    fn fallback_for_empty_or_non_json_bodies() {
        assert_eq!(error_message(&serde_json::Value::Null, "Download failed"), "Download failed");
        let blank = json!({ "message": "  " });
        assert_eq!(error_message(&blank, "Download failed"), "Download failed");
    }
}
