use reqwest::StatusCode;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name -> messages, as reported by the backend on a rejected form.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("validation failed: {}", format_fields(.fields))]
    Validation { status: u16, fields: FieldErrors },

    #[error("not signed in or session expired")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unexpected response ({status}): {body}")]
    Unexpected { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Message suitable for the dashboard status line.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => {
                "Could not reach the farm server. Press r to retry.".to_string()
            }
            ApiError::Validation { .. } | ApiError::Unauthorized | ApiError::NotFound(_) => {
                self.to_string()
            }
            ApiError::Unexpected { .. } | ApiError::Decode(_) => {
                "Something went wrong. Press r to retry.".to_string()
            }
        }
    }
}

fn format_fields(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, msgs)| format!("{}: {}", field, msgs.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Map a non-success response onto an error category.
pub fn classify_failure(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(body.to_string()),
        s if s.is_client_error() => ApiError::Validation {
            status: s.as_u16(),
            fields: parse_field_errors(body),
        },
        s => ApiError::Unexpected {
            status: s.as_u16(),
            body: body.to_string(),
        },
    }
}

/// Parse `{"field": ["msg", ...] | "msg"}`. Anything else lands under `non_field_errors`.
pub fn parse_field_errors(body: &str) -> FieldErrors {
    let mut fields = FieldErrors::new();
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => {
            for (field, value) in map {
                let msgs = match value {
                    serde_json::Value::String(s) => vec![s],
                    serde_json::Value::Array(items) => items
                        .into_iter()
                        .map(|v| match v {
                            serde_json::Value::String(s) => s,
                            other => other.to_string(),
                        })
                        .collect(),
                    other => vec![other.to_string()],
                };
                fields.insert(field, msgs);
            }
        }
        _ => {
            let text = body.trim();
            if !text.is_empty() {
                fields.insert("non_field_errors".to_string(), vec![text.to_string()]);
            }
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_surface_verbatim() {
        let err = classify_failure(
            StatusCode::BAD_REQUEST,
            r#"{"tag": ["This field is required."], "dob": "Invalid date."}"#,
        );
        match &err {
            ApiError::Validation { status, fields } => {
                assert_eq!(*status, 400);
                assert_eq!(fields["tag"], vec!["This field is required.".to_string()]);
                assert_eq!(fields["dob"], vec!["Invalid date.".to_string()]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(err.to_string().contains("tag: This field is required."));
    }

    #[test]
    fn test_plain_text_4xx_becomes_non_field_error() {
        let err = classify_failure(StatusCode::UNPROCESSABLE_ENTITY, "bad payload");
        match err {
            ApiError::Validation { fields, .. } => {
                assert_eq!(fields["non_field_errors"], vec!["bad payload".to_string()]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_status_categories() {
        assert!(matches!(
            classify_failure(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            classify_failure(StatusCode::NOT_FOUND, "no farm"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::BAD_GATEWAY, "upstream"),
            ApiError::Unexpected { status: 502, .. }
        ));
    }
}
