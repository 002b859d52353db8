//! HTTP API for a fieldguard workspace.
//!
//! Every route works on the single [`Workspace`] the router was built with.
//! Responses are JSON; failures carry `{"error": "..."}` and a status code.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use fieldguard_datasets::read_csv;
use fieldguard_protect::{
    Category, ColumnState, ConfidentialFieldSet, LoadSummary, ProtectError, TransformReport,
    Workspace, WorkspaceStats,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

type SharedWorkspace = Arc<Workspace>;

// ── Errors ───────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    Protect(ProtectError),
    /// The blocking task running the request panicked or was cancelled.
    Internal(String),
}

impl From<ProtectError> for ApiError {
    fn from(err: ProtectError) -> Self {
        ApiError::Protect(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Protect(err) => {
                let status = match err {
                    ProtectError::NoData => StatusCode::NOT_FOUND,
                    ProtectError::TypeConversion(_) => StatusCode::BAD_REQUEST,
                    ProtectError::NoConfidentialFields
                    | ProtectError::UnknownTransform(_)
                    | ProtectError::Decryption(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    ProtectError::Encryption(_) | ProtectError::Storage(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status.is_server_error() {
            error!(%status, error = %message, "Request failed");
        } else {
            debug!(%status, error = %message, "Request rejected");
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Runs a workspace call off the async executor; the workspace lock and the
/// SQLite store both block.
async fn blocking<T, F>(workspace: SharedWorkspace, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Workspace) -> Result<T, ProtectError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&workspace))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map(Json)
        .map_err(ApiError::from)
}

// ── Response bodies ──────────────────────────────────────────────

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub category: Option<Category>,
    pub confidential: bool,
    pub state: ColumnState,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FieldsRequest {
    pub fields: Vec<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ColumnStateEntry {
    pub column: String,
    pub state: ColumnState,
}

#[derive(Serialize, Debug)]
pub struct DataResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[derive(Serialize, Debug)]
pub struct ProcessResponse {
    pub report: TransformReport,
    pub data: DataResponse,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct KeyResponse {
    pub algorithm: String,
    pub key_bits: usize,
    pub fingerprint: String,
}

impl DataResponse {
    fn from_dataset(dataset: &fieldguard_datasets::Dataset) -> Self {
        Self {
            columns: dataset.column_names().iter().map(|s| s.to_string()).collect(),
            rows: dataset
                .rows()
                .into_iter()
                .map(|row| row.into_iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────

async fn upload_handler(
    State(workspace): State<SharedWorkspace>,
    body: String,
) -> ApiResult<LoadSummary> {
    blocking(workspace, move |ws| {
        let dataset = read_csv(body.as_bytes())?;
        ws.load(dataset)
    })
    .await
}

async fn columns_handler(State(workspace): State<SharedWorkspace>) -> ApiResult<Vec<ColumnInfo>> {
    blocking(workspace, |ws| {
        let classification = ws.classification();
        let fields = ws.confidential_fields();
        let state = ws.transform_state();
        let columns = ws
            .columns()?
            .into_iter()
            .map(|name| ColumnInfo {
                category: classification.category_of(&name),
                confidential: fields.contains(&name),
                state: state.state_of(&name),
                name,
            })
            .collect();
        Ok(columns)
    })
    .await
}

async fn get_fields_handler(
    State(workspace): State<SharedWorkspace>,
) -> ApiResult<ConfidentialFieldSet> {
    blocking(workspace, |ws| Ok(ws.confidential_fields())).await
}

async fn set_fields_handler(
    State(workspace): State<SharedWorkspace>,
    Json(request): Json<FieldsRequest>,
) -> ApiResult<ConfidentialFieldSet> {
    blocking(workspace, move |ws| {
        Ok(ws.set_confidential_fields(request.fields))
    })
    .await
}

async fn process_handler(
    State(workspace): State<SharedWorkspace>,
    Path(operation): Path<String>,
) -> ApiResult<ProcessResponse> {
    blocking(workspace, move |ws| {
        let result = ws.process_named(&operation)?;
        Ok(ProcessResponse {
            data: DataResponse::from_dataset(&result.dataset),
            report: result.report,
        })
    })
    .await
}

async fn data_handler(State(workspace): State<SharedWorkspace>) -> ApiResult<DataResponse> {
    blocking(workspace, |ws| {
        let dataset = ws.current_dataset()?;
        Ok(DataResponse::from_dataset(&dataset))
    })
    .await
}

async fn statistics_handler(
    State(workspace): State<SharedWorkspace>,
) -> ApiResult<WorkspaceStats> {
    blocking(workspace, |ws| ws.statistics()).await
}

async fn state_handler(
    State(workspace): State<SharedWorkspace>,
) -> ApiResult<Vec<ColumnStateEntry>> {
    blocking(workspace, |ws| {
        let state = ws.transform_state();
        let columns = ws
            .columns()?
            .into_iter()
            .map(|column| ColumnStateEntry {
                state: state.state_of(&column),
                column,
            })
            .collect();
        Ok(columns)
    })
    .await
}

async fn key_handler(State(workspace): State<SharedWorkspace>) -> Json<KeyResponse> {
    let info = workspace.key_info();
    Json(KeyResponse {
        algorithm: info.algorithm.to_string(),
        key_bits: info.key_bits,
        fingerprint: info.fingerprint,
    })
}

/// Build the HTTP API router around a workspace.
pub fn build_router(workspace: Arc<Workspace>) -> Router {
    Router::new()
        .route("/api/v1/upload", post(upload_handler))
        .route("/api/v1/columns", get(columns_handler))
        .route(
            "/api/v1/confidential-fields",
            get(get_fields_handler).post(set_fields_handler),
        )
        .route("/api/v1/process/{operation}", post(process_handler))
        .route("/api/v1/data", get(data_handler))
        .route("/api/v1/statistics", get(statistics_handler))
        .route("/api/v1/state", get(state_handler))
        .route("/api/v1/key", get(key_handler))
        .with_state(workspace)
}
