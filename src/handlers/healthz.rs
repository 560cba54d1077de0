use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::models::HealthzResponse;

/// Liveness probe. Does not touch the database.
pub async fn healthz() -> Response {
    let response = HealthzResponse {
        message: "OK".to_string(),
    };

    match serde_json::to_vec(&response) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => ApiError::internal(format!("Failed to encode the response: {e}")).into_response(),
    }
}
