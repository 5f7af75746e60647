use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrapper for API responses that adds the `{success, message?, data?}`
/// envelope every surface of this service speaks.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: Option<T>,
    message: Option<String>,
    status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying only data.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
            status_code: StatusCode::OK,
        }
    }

    /// Successful response with a human-readable message alongside the data.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            data: Some(data),
            message: Some(message.into()),
            status_code: StatusCode::OK,
        }
    }

    /// Create a 201 Created response.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            data: Some(data),
            message: Some(message.into()),
            status_code: StatusCode::CREATED,
        }
    }
}

impl ApiResponse<()> {
    /// Acknowledgement with no data payload.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
            status_code: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let mut envelope = json!({ "success": true });

        if let Some(message) = self.message {
            envelope["message"] = json!(message);
        }

        if let Some(data) = self.data {
            match serde_json::to_value(&data) {
                Ok(value) => envelope["data"] = value,
                Err(e) => {
                    tracing::error!("failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "message": "Failed to serialize response data"
                        })),
                    )
                        .into_response();
                }
            }
        }

        (self.status_code, Json(envelope)).into_response()
    }
}

/// Handler result: success envelope or `ApiError` envelope.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
