use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{verb} {url}: {source}")]
    Transport {
        verb: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("token acquisition failed: {0}")]
    Token(String),

    #[error("API error (status {status}): {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("operation ended in state {status}: {detail}")]
    OperationFailed { status: String, detail: String },

    #[error("operation still pending after {polls} polls: {url}")]
    PollTimedOut { polls: usize, url: String },

    #[error("list did not terminate within {max_pages} pages")]
    PageLimitExceeded { max_pages: usize },
}

impl ClientError {
    /// Build an `Api` error from a response status and an ARM error envelope.
    pub fn api(status: u16, body: &Value) -> Self {
        let (code, message) = parse_arm_error(body);
        ClientError::Api { status, code, message }
    }

    /// True when the remote reported the resource as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

/// Extract `code` and `message` from an ARM error envelope. The envelope is
/// `{"error": {"code": ..., "message": ...}}`, but some endpoints return the
/// inner object bare.
pub(crate) fn parse_arm_error(body: &Value) -> (String, String) {
    let err = body
        .get("error")
        .or_else(|| body.get("Error"))
        .unwrap_or(body);
    let code = err["code"].as_str().unwrap_or("Unknown").to_string();
    let message = err["message"].as_str().unwrap_or("unknown error").to_string();
    (code, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_standard_envelope() {
        let body = json!({
            "error": { "code": "ResourceNotFound", "message": "The resource was not found" }
        });
        let (code, message) = parse_arm_error(&body);
        assert_eq!(code, "ResourceNotFound");
        assert!(message.contains("not found"), "got: {message}");
    }

    #[test]
    fn parse_bare_envelope() {
        let body = json!({ "code": "Conflict", "message": "already exists" });
        let (code, _) = parse_arm_error(&body);
        assert_eq!(code, "Conflict");
    }

    #[test]
    fn parse_missing_fields_gives_fallback() {
        let (code, message) = parse_arm_error(&json!({ "error": {} }));
        assert_eq!(code, "Unknown");
        assert_eq!(message, "unknown error");
    }

    #[test]
    fn not_found_predicate() {
        let err = ClientError::api(404, &json!({ "error": { "code": "NotFound" } }));
        assert!(err.is_not_found());
        let err = ClientError::api(409, &json!({ "error": { "code": "Conflict" } }));
        assert!(!err.is_not_found());
    }
}
