//! Outcome classification for relay responses.
//!
//! A response is a success only when it parses as JSON-RPC, carries no error
//! and came back with a 2xx status. Protocol errors win over the HTTP status
//! so the reason recorded is the most specific one available.
use serde_json::Value;

use super::rpc::RpcResponse;

pub const NULL_RESULT_REASON: &str = "response body is set to null";
pub const ENCODE_RESULT_REASON: &str = "failed to marshal response result to JSON";

/// How the request body should be interpreted for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    Single,
    Batch,
}

impl RelayMode {
    /// Batch requests are detected from the first non-whitespace byte.
    #[must_use]
    pub fn detect(body: &[u8]) -> Self {
        if is_batch_request(body) {
            RelayMode::Batch
        } else {
            RelayMode::Single
        }
    }
}

/// Returns true when the body's first non-whitespace byte is `[`.
#[must_use]
pub fn is_batch_request(body: &[u8]) -> bool {
    body.trim_ascii_start().first() == Some(&b'[')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Canonical JSON of the result (or array of results for batches).
    Success { body: String },
    Failure { reason: String },
}

impl Classification {
    pub(crate) fn failure(reason: impl Into<String>) -> Self {
        Classification::Failure {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Classification::Success { .. })
    }
}

/// Classifies one completed HTTP exchange.
#[must_use]
pub fn classify(mode: RelayMode, status: u16, body: &[u8]) -> Classification {
    match mode {
        RelayMode::Single => classify_single(status, body),
        RelayMode::Batch => classify_batch(status, body),
    }
}

const fn is_success_status(status: u16) -> bool {
    status >= 200 && status < 300
}

fn unexpected_status(status: u16) -> Classification {
    Classification::failure(format!("unexpected HTTP status {status}"))
}

/// A body that is not JSON-RPC on a non-2xx status is reported by status, so
/// gateway errors do not merge with malformed 2xx bodies.
fn unparsed_body(status: u16, err: &serde_json::Error) -> Classification {
    if is_success_status(status) {
        Classification::failure(err.to_string())
    } else {
        unexpected_status(status)
    }
}

fn classify_single(status: u16, body: &[u8]) -> Classification {
    let response: RpcResponse = match serde_json::from_slice(body) {
        Ok(response) => response,
        Err(err) => return unparsed_body(status, &err),
    };
    if let Some(error) = response.failure() {
        return Classification::failure(error.reason());
    }
    if !is_success_status(status) {
        return unexpected_status(status);
    }
    match response.result {
        None | Some(Value::Null) => Classification::failure(NULL_RESULT_REASON),
        Some(result) => encode_body(&result),
    }
}

fn classify_batch(status: u16, body: &[u8]) -> Classification {
    let items: Vec<RpcResponse> = match serde_json::from_slice(body) {
        Ok(items) => items,
        Err(err) => {
            // Upstreams often answer a batch with a single error object.
            if let Ok(single) = serde_json::from_slice::<RpcResponse>(body)
                && let Some(error) = single.failure()
            {
                return Classification::failure(error.reason());
            }
            return unparsed_body(status, &err);
        }
    };
    if let Some(error) = items.iter().find_map(RpcResponse::failure) {
        return Classification::failure(error.reason());
    }
    if !is_success_status(status) {
        return unexpected_status(status);
    }
    let results: Vec<Value> = items
        .into_iter()
        .map(|item| item.result.unwrap_or(Value::Null))
        .collect();
    encode_body(&Value::Array(results))
}

fn encode_body(value: &Value) -> Classification {
    serde_json::to_string(value).map_or_else(
        |_err| Classification::failure(ENCODE_RESULT_REASON),
        |body| Classification::Success { body },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_detection_skips_leading_whitespace() {
        assert!(is_batch_request(b"  \n\t[{\"id\":1}]"));
        assert!(!is_batch_request(b"{\"id\":1}"));
        assert!(!is_batch_request(b""));
        assert!(!is_batch_request(b"   "));
        assert_eq!(RelayMode::detect(b"[]"), RelayMode::Batch);
    }

    #[test]
    fn single_success_keeps_result_json() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":"0x10"}"#;
        assert_eq!(
            classify(RelayMode::Single, 200, body),
            Classification::Success {
                body: "\"0x10\"".to_owned()
            }
        );
    }

    #[test]
    fn single_structured_error_is_reported() {
        let body = br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"boom"}}"#;
        assert_eq!(
            classify(RelayMode::Single, 200, body),
            Classification::failure("code: -32000, message: boom")
        );
    }

    #[test]
    fn single_string_error_is_reported() {
        let body = br#"{"jsonrpc":"2.0","id":"a","error":"rate limited"}"#;
        assert_eq!(
            classify(RelayMode::Single, 429, body),
            Classification::failure("message: rate limited")
        );
    }

    #[test]
    fn empty_error_message_is_not_a_failure() {
        let body = br#"{"jsonrpc":"2.0","id":1,"error":{"code":0,"message":""},"result":true}"#;
        assert_eq!(
            classify(RelayMode::Single, 200, body),
            Classification::Success {
                body: "true".to_owned()
            }
        );
    }

    #[test]
    fn null_or_missing_result_fails() {
        let null = br#"{"jsonrpc":"2.0","id":1,"result":null}"#;
        let missing = br#"{"jsonrpc":"2.0","id":1}"#;
        assert_eq!(
            classify(RelayMode::Single, 200, null),
            Classification::failure(NULL_RESULT_REASON)
        );
        assert_eq!(
            classify(RelayMode::Single, 200, missing),
            Classification::failure(NULL_RESULT_REASON)
        );
    }

    #[test]
    fn non_success_status_without_rpc_error_fails() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#;
        assert_eq!(
            classify(RelayMode::Single, 503, body),
            Classification::failure("unexpected HTTP status 503")
        );
    }

    #[test]
    fn unparseable_body_fails_with_decoder_message() {
        let outcome = classify(RelayMode::Single, 200, b"<html>bad gateway</html>");
        assert!(
            matches!(outcome, Classification::Failure { ref reason } if !reason.is_empty()),
            "unexpected classification: {outcome:?}"
        );
    }

    #[test]
    fn unparseable_body_on_error_status_reports_status() {
        assert_eq!(
            classify(RelayMode::Single, 502, b"<html>bad gateway</html>"),
            Classification::failure("unexpected HTTP status 502")
        );
        assert_eq!(
            classify(RelayMode::Single, 503, b""),
            Classification::failure("unexpected HTTP status 503")
        );
        assert_eq!(
            classify(RelayMode::Batch, 502, b"<html>bad gateway</html>"),
            Classification::failure("unexpected HTTP status 502")
        );
    }

    #[test]
    fn rpc_error_on_error_status_still_wins() {
        let body = br#"{"jsonrpc":"2.0","id":null,"error":{"code":-32005,"message":"limit"}}"#;
        assert_eq!(
            classify(RelayMode::Batch, 429, body),
            Classification::failure("code: -32005, message: limit")
        );
    }

    #[test]
    fn batch_success_collects_results_in_order() {
        let body = br#"[{"id":1,"result":"0x1"},{"id":2,"result":{"a":1}},{"id":3}]"#;
        assert_eq!(
            classify(RelayMode::Batch, 200, body),
            Classification::Success {
                body: r#"["0x1",{"a":1},null]"#.to_owned()
            }
        );
    }

    #[test]
    fn batch_first_error_fails_whole_batch() {
        let body = br#"[{"id":1,"result":"0x1"},{"id":2,"error":{"code":-1,"message":"first"}},{"id":3,"error":"second"}]"#;
        assert_eq!(
            classify(RelayMode::Batch, 200, body),
            Classification::failure("code: -1, message: first")
        );
    }

    #[test]
    fn batch_answered_with_single_error_object() {
        let body = br#"{"jsonrpc":"2.0","id":null,"error":{"code":-32600,"message":"invalid batch"}}"#;
        assert_eq!(
            classify(RelayMode::Batch, 200, body),
            Classification::failure("code: -32600, message: invalid batch")
        );
    }

    #[test]
    fn invalid_id_type_is_a_parse_failure() {
        let body = br#"{"jsonrpc":"2.0","id":true,"result":"0x1"}"#;
        assert!(!classify(RelayMode::Single, 200, body).is_success());
    }
}
