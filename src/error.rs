use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eventflow_shared::Error;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] Error),

    #[error("Not authorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Core(err) => match err {
                Error::Validate(_)
                | Error::Invalid(_)
                | Error::Conflict(_)
                | Error::CapacityExceeded
                | Error::InvalidOperation(_)
                | Error::InvalidCredentials
                | Error::NoOp => StatusCode::BAD_REQUEST,
                Error::Forbidden(_) => StatusCode::FORBIDDEN,
                Error::NotFound(_) => StatusCode::NOT_FOUND,
                Error::UploadFailed(_) | Error::Server(_) | Error::Unknown(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Message shown to the client. Internal details stay in the logs.
    pub fn message(&self) -> String {
        match self {
            AppError::Core(Error::Validate(errors)) => first_validation_message(errors),
            AppError::Core(err) if err.is_internal() => "Internal server error".to_owned(),
            other => other.to_string(),
        }
    }
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    let mut fields = errors.field_errors().into_iter().collect::<Vec<_>>();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .find_map(|(field, errors)| {
            errors.first().map(|error| match &error.message {
                Some(message) if error.code == "blank" => format!("{field} {message}"),
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .unwrap_or_else(|| errors.to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(err = ?self, "request failed");
        } else {
            tracing::debug!(status = %status, err = %self, "request rejected");
        }

        (
            status,
            Json(json!({ "success": false, "message": self.message() })),
        )
            .into_response()
    }
}

/// `axum::Json` whose rejection is reported in the API error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::Invalid("bad".to_owned()), StatusCode::BAD_REQUEST),
            (Error::Conflict("dup".to_owned()), StatusCode::BAD_REQUEST),
            (Error::CapacityExceeded, StatusCode::BAD_REQUEST),
            (Error::InvalidCredentials, StatusCode::BAD_REQUEST),
            (Error::NoOp, StatusCode::BAD_REQUEST),
            (Error::Forbidden("no".to_owned()), StatusCode::FORBIDDEN),
            (Error::NotFound("Event".to_owned()), StatusCode::NOT_FOUND),
            (
                Error::UploadFailed("cdn".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                Error::Server("boom".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }

        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_message_is_masked() {
        let err = AppError::from(Error::Server("database exploded".to_owned()));
        assert_eq!(err.message(), "Internal server error");

        let err = AppError::from(Error::NotFound("Event".to_owned()));
        assert_eq!(err.message(), "Event not found");
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let response = AppError::from(Error::CapacityExceeded).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Event has reached maximum capacity");
    }
}
