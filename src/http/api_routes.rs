//! REST API under `/v1`.
//!
//! Record bodies arrive as `{"data": "<json object text>"}`: the store
//! parses the raw text itself, so the API and the CLI share one input path.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::codec::Record;
use crate::config::Config;
use crate::store::StoreError;

use super::server::AppState;

#[derive(Debug, Deserialize)]
pub struct DataBody {
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(code: StatusCode, error: String) -> ApiError {
    (
        code,
        Json(ErrorResponse {
            error,
            code: code.as_u16(),
        }),
    )
}

fn map_store_error(err: StoreError) -> ApiError {
    let code = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(code, err.to_string())
}

/// REST routes, nested under `/v1` by the server.
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/connect", post(connect_handler))
        .route("/{schema}", get(list_handler))
        .route("/{schema}/{collection}/create", post(create_handler))
        .route(
            "/{schema}/{collection}",
            post(insert_handler).get(read_handler).delete(drop_handler),
        )
        .route(
            "/{schema}/{collection}/{id}",
            put(update_handler).delete(delete_handler),
        )
        .with_state(state)
}

/// Validate caller-supplied connection details and prepare the schema.
async fn connect_handler(
    State(state): State<Arc<AppState>>,
    Json(config): Json<Config>,
) -> Result<Json<MessageResponse>, ApiError> {
    config
        .validate()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.to_string()))?;

    state
        .store
        .layout()
        .ensure_schema(&config.schema_name)
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(MessageResponse {
        message: format!("Connected to schema {}", config.schema_name),
    }))
}

async fn list_handler(
    State(state): State<Arc<AppState>>,
    Path(schema): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = state.store.list(&schema).map_err(map_store_error)?;
    Ok(Json(names))
}

async fn create_handler(
    State(state): State<Arc<AppState>>,
    Path((schema, collection)): Path<(String, String)>,
    Json(body): Json<DataBody>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let initial = if body.data.is_empty() {
        None
    } else {
        Some(body.data.as_str())
    };
    state
        .store
        .create(&schema, &collection, initial)
        .map_err(map_store_error)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Collection {} created", collection),
        }),
    ))
}

async fn insert_handler(
    State(state): State<Arc<AppState>>,
    Path((schema, collection)): Path<(String, String)>,
    Json(body): Json<DataBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .insert(&schema, &collection, &body.data)
        .map_err(map_store_error)?;

    Ok(Json(MessageResponse {
        message: "Record inserted".to_string(),
    }))
}

async fn read_handler(
    State(state): State<Arc<AppState>>,
    Path((schema, collection)): Path<(String, String)>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state
        .store
        .load(&schema, &collection)
        .map_err(map_store_error)?;
    Ok(Json(records))
}

async fn update_handler(
    State(state): State<Arc<AppState>>,
    Path((schema, collection, id)): Path<(String, String, String)>,
    Json(body): Json<DataBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .update(&schema, &collection, &id, &body.data)
        .map_err(map_store_error)?;

    Ok(Json(MessageResponse {
        message: format!("Record {} updated", id),
    }))
}

async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path((schema, collection, id)): Path<(String, String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .delete(&schema, &collection, &id)
        .map_err(map_store_error)?;

    Ok(Json(MessageResponse {
        message: format!("Record {} deleted", id),
    }))
}

async fn drop_handler(
    State(state): State<Arc<AppState>>,
    Path((schema, collection)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .drop_collection(&schema, &collection)
        .map_err(map_store_error)?;

    Ok(Json(MessageResponse {
        message: format!("Collection {} dropped", collection),
    }))
}
