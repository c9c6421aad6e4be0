use crate::errors::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

impl Error {
    /// HTTP status the API answers with for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::DuplicateEmail { .. }
            | Self::InsufficientBalance { .. }
            | Self::InvalidAmount { .. }
            | Self::Validation { .. }
            | Self::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::OperationFailed(_)
            | Self::Config { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::EnvVar(_)
            | Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
                warn!(error = %self, "Request rejected");
            }
            self.to_string()
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status::OrderStatus;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::not_found("Meal", 3).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::DuplicateEmail {
                email: "a@b.c".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Delivered
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::forbidden("no").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            Error::Database("locked".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
