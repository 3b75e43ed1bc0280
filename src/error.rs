use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for the API: every handler failure maps to exactly one of
/// these, and each carries its HTTP status.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn not_found(resource: &'static str) -> Self {
        ApiError::NotFound { resource }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::Validation { field, message } => json!({
                "status": "error",
                "message": message,
                "field": field,
            }),
            other => json!({
                "status": "error",
                "message": other.to_string(),
            }),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // Unique-constraint violations surface as validation errors; the
            // handlers pre-check for friendlier messages, this is the backstop.
            if db_err.code().as_deref() == Some("23505") {
                return ApiError::validation("non_field_errors", "Record already exists.");
            }
        }
        log::error!("database error: {:?}", err);
        ApiError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(
            ApiError::not_found("category").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::validation("date", "bad date").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn row_not_found_is_a_server_fault_not_a_404() {
        // Ownership-scoped lookups use fetch_optional, so RowNotFound here
        // means a query bug, not a missing resource.
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_message_names_the_resource() {
        assert_eq!(ApiError::not_found("budget").to_string(), "budget not found");
    }
}
