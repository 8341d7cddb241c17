use std::collections::BTreeMap;

use serde::Deserialize;

/// Errors from the admin REST client.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The request was superseded and cancelled before it completed.
    #[error("Request cancelled")]
    Cancelled,

    /// The server (or a local form schema) rejected the submitted fields.
    #[error("Validation failed on {} field(s)", .errors.len())]
    Validation {
        errors: BTreeMap<String, Vec<String>>,
    },

    /// The API returned any other non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Shape of the API's error envelope. Only 422 responses carry `errors`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl AdminError {
    /// Classify a non-2xx response.
    ///
    /// A 422 whose body carries a field map becomes [`AdminError::Validation`];
    /// everything else stays an [`AdminError::Api`] with the raw body.
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 422 {
            if let Ok(ErrorBody {
                errors: Some(errors),
            }) = serde_json::from_str::<ErrorBody>(&body)
            {
                return AdminError::Validation { errors };
            }
        }
        AdminError::Api { status, body }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AdminError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn unprocessable_with_field_map_becomes_validation() {
        let body = r#"{"error":"The given data was invalid.","code":"VALIDATION_ERROR",
            "errors":{"name":["The name field is required."]}}"#;
        let err = AdminError::from_status(422, body.to_string());
        assert_matches!(err, AdminError::Validation { ref errors } => {
            assert_eq!(errors["name"], vec!["The name field is required.".to_string()]);
        });
    }

    #[test]
    fn unprocessable_without_field_map_stays_api_error() {
        let body = r#"{"error":"expected value","code":"INVALID_BODY"}"#;
        assert_matches!(
            AdminError::from_status(422, body.to_string()),
            AdminError::Api { status: 422, .. }
        );
    }

    #[test]
    fn other_statuses_keep_raw_body() {
        assert_matches!(
            AdminError::from_status(500, "boom".into()),
            AdminError::Api { status: 500, ref body } if body == "boom"
        );
    }

    #[test]
    fn only_cancelled_reports_cancelled() {
        assert!(AdminError::Cancelled.is_cancelled());
        assert!(!AdminError::from_status(404, String::new()).is_cancelled());
    }
}
