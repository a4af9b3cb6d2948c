//! Structured API errors
//!
//! Every non-2xx response carries `{error, code, details}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use switchyard_core::messages::{API_INTERNAL_ERROR, API_VALIDATION_ERROR};
use switchyard_core::{Error, UserFriendlyError};
use tracing::{error, warn};

/// JSON body of an error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    pub details: Option<String>,
}

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(
        status: StatusCode,
        error: impl Into<String>,
        code: &str,
        details: Option<String>,
    ) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                code: code.to_string(),
                details,
            },
        }
    }

    /// 422 with the given detail
    pub fn validation(details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            API_VALIDATION_ERROR,
            "VALIDATION_ERROR",
            Some(details.into()),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match &err {
            Error::Validation(detail) => Self::validation(detail.clone()),
            Error::Store(store_err) => {
                warn!(error = %store_err, "Conversation store request failed");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    err.user_message(),
                    err.code(),
                    Some(store_err.to_string()),
                )
            }
            Error::Configuration(_) => {
                error!(error = %err, "Configuration error reached a request handler");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    API_INTERNAL_ERROR,
                    "INTERNAL_ERROR",
                    None,
                )
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchyard_core::StoreError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::Validation("empty".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (
                Error::Store(StoreError::Connection("refused".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                Error::Configuration("bad".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_store_error_code() {
        let api = ApiError::from(Error::Store(StoreError::Command("WRONGTYPE".into())));
        assert_eq!(api.body.code, "STORE_ERROR");
        assert!(api.body.details.unwrap().contains("WRONGTYPE"));
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let api = ApiError::from(Error::Configuration("secret path".into()));
        assert_eq!(api.body.code, "INTERNAL_ERROR");
        assert_eq!(api.body.details, None);
    }
}
