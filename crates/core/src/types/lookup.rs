//! JSON envelope returned by the draft order lookup endpoint.

use serde::Serialize;
use serde_json::Value;

/// Response body for every outcome of a lookup.
///
/// | Outcome          | `ok`    | `draftOrder` | `error` | `details`        |
/// |------------------|---------|--------------|---------|------------------|
/// | found            | `true`  | node         | -       | -                |
/// | rejected / empty | `false` | -            | message | -                |
/// | upstream failure | `false` | -            | message | payload or `null`|
///
/// Fields marked `-` are omitted from the serialized JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResponse {
    pub ok: bool,
    #[serde(rename = "draftOrder", skip_serializing_if = "Option::is_none")]
    pub draft_order: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// `Some(Value::Null)` serializes as an explicit `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl LookupResponse {
    /// Fallback message for failures that carry no message of their own.
    pub const FALLBACK_ERROR: &'static str = "Internal error";

    /// A draft order was found.
    #[must_use]
    pub const fn found(draft_order: Value) -> Self {
        Self {
            ok: true,
            draft_order: Some(draft_order),
            error: None,
            details: None,
        }
    }

    /// A request rejected before or after the upstream call, without details.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            draft_order: None,
            error: Some(error.into()),
            details: None,
        }
    }

    /// An upstream or internal failure.
    ///
    /// `details` is always emitted, as `null` when no upstream payload exists.
    /// An empty `error` message is replaced with [`Self::FALLBACK_ERROR`].
    #[must_use]
    pub fn upstream_failure(error: impl Into<String>, details: Option<Value>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            Self::FALLBACK_ERROR.to_owned()
        } else {
            error
        };

        Self {
            ok: false,
            draft_order: None,
            error: Some(error),
            details: Some(details.unwrap_or(Value::Null)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_found_serializes_without_error_fields() {
        let body = serde_json::to_value(LookupResponse::found(json!({"name": "#D1001"}))).unwrap();
        assert_eq!(body, json!({"ok": true, "draftOrder": {"name": "#D1001"}}));
    }

    #[test]
    fn test_failure_omits_details() {
        let body = serde_json::to_value(LookupResponse::failure("Unauthorized")).unwrap();
        assert_eq!(body, json!({"ok": false, "error": "Unauthorized"}));
    }

    #[test]
    fn test_upstream_failure_emits_null_details() {
        let body =
            serde_json::to_value(LookupResponse::upstream_failure("boom", None)).unwrap();
        assert_eq!(body, json!({"ok": false, "error": "boom", "details": null}));
    }

    #[test]
    fn test_upstream_failure_keeps_payload() {
        let payload = json!({"errors": [{"message": "Throttled"}]});
        let body = serde_json::to_value(LookupResponse::upstream_failure(
            "Throttled",
            Some(payload.clone()),
        ))
        .unwrap();
        assert_eq!(body["details"], payload);
    }

    #[test]
    fn test_upstream_failure_fallback_message() {
        let response = LookupResponse::upstream_failure("", None);
        assert_eq!(response.error.as_deref(), Some("Internal error"));
    }
}
