//! Handlers for the `/todos` collection.
//!
//! Status codes differ per method on purpose: existing clients rely on them.
//!
//! | method | bad body | service rejects | storage failure |
//! |--------|----------|-----------------|-----------------|
//! | POST   | 400      | 400             | 500             |
//! | GET    | -        | 500             | 500             |
//! | PUT    | 500      | 400             | 500             |
//! | DELETE | 500      | 404             | 500             |
//!
//! DELETE answers 400 for an explicit empty `ids` list before the service is
//! called. A missing or `null` `ids` goes through and comes back 404.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{
    CreateTodoRequest, CreateTodoResponse, DeleteTodoRequest, DeleteTodoResponse, ReadTodoRequest,
    ReadTodoResponse, UpdateTodoRequest, UpdateTodoResponse,
};
use crate::service::TodoService;

/// Decodes a JSON body regardless of `Content-Type`. A top-level `null`
/// decodes to the request's default.
fn decode_body<T: DeserializeOwned + Default>(body: &[u8], status: StatusCode) -> Result<T, ApiError> {
    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| ApiError::new(status, format!("Failed to decode the request body: {e}")))
}

pub async fn create(
    State(svc): State<TodoService>,
    body: Bytes,
) -> Result<Json<CreateTodoResponse>, ApiError> {
    let req: CreateTodoRequest = decode_body(&body, StatusCode::BAD_REQUEST)?;
    tracing::debug!(subject = %req.subject, "Creating todo");

    let todo = svc
        .create_todo(&req.subject, &req.description)
        .await
        .map_err(|e| ApiError::from_service(e, StatusCode::BAD_REQUEST))?;

    Ok(Json(CreateTodoResponse { todo }))
}

pub async fn read(
    State(svc): State<TodoService>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ReadTodoResponse>, ApiError> {
    let req = ReadTodoRequest::from_query_pairs(&pairs);
    tracing::debug!(prev_id = req.prev_id, size = req.size, "Reading todos");

    let todos = svc
        .read_todos(req.prev_id, req.size)
        .await
        .map_err(|e| ApiError::from_service(e, StatusCode::INTERNAL_SERVER_ERROR))?;

    Ok(Json(ReadTodoResponse { todos }))
}

pub async fn update(
    State(svc): State<TodoService>,
    body: Bytes,
) -> Result<Json<UpdateTodoResponse>, ApiError> {
    let req: UpdateTodoRequest = decode_body(&body, StatusCode::INTERNAL_SERVER_ERROR)?;
    tracing::debug!(id = req.id, "Updating todo");

    let todo = svc
        .update_todo(req.id, &req.subject, &req.description)
        .await
        .map_err(|e| ApiError::from_service(e, StatusCode::BAD_REQUEST))?;

    Ok(Json(UpdateTodoResponse { todo }))
}

pub async fn delete(
    State(svc): State<TodoService>,
    body: Bytes,
) -> Result<Json<DeleteTodoResponse>, ApiError> {
    let req: DeleteTodoRequest = decode_body(&body, StatusCode::INTERNAL_SERVER_ERROR)?;
    let ids = match req.ids {
        Some(ids) if ids.is_empty() => {
            return Err(ApiError::bad_request("ids must not be empty"));
        }
        Some(ids) => ids,
        None => Vec::new(),
    };
    tracing::debug!(?ids, "Deleting todos");

    svc.delete_todos(&ids)
        .await
        .map_err(|e| ApiError::from_service(e, StatusCode::NOT_FOUND))?;

    Ok(Json(DeleteTodoResponse {}))
}
