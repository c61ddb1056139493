use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, Method};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shiftboard_core::sync::{self, Snapshot};
use shiftboard_core::{Database, Error as CoreError, PhantomMapping, Record, SyncBatch, Table};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::extra_info::{render_extra_info, NO_EXTRA_INFO};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    db: Database,
}

impl AppState {
    pub const fn new(config: Arc<AppConfig>, db: Database) -> Self {
        Self { config, db }
    }
}

pub fn app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/load", get(load))
        .route("/api/sync", post(sync_changes))
        .route("/api/extra-info", get(extra_info))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = HeaderValue::from_str(&config.frontend_url).map_or_else(
        |_| {
            tracing::warn!(
                frontend_url = %config.frontend_url,
                "FRONTEND_URL is not a valid header value; cross-origin requests will be refused"
            );
            AllowOrigin::list([])
        },
        AllowOrigin::exact,
    );

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_headers(AllowHeaders::mirror_request())
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
    })
}

#[derive(Debug, Serialize)]
struct Rows<T> {
    rows: Vec<T>,
}

#[derive(Debug, Serialize)]
struct LoadResponse {
    success: bool,
    resources: Rows<Record>,
    events: Rows<Record>,
}

async fn load(State(state): State<AppState>) -> Result<Json<LoadResponse>, AppError> {
    let Snapshot { resources, events } = sync::load_snapshot(&state.db)
        .await
        .map_err(AppError::Load)?;

    Ok(Json(LoadResponse {
        success: true,
        resources: Rows { rows: resources },
        events: Rows { rows: events },
    }))
}

#[derive(Debug, Deserialize)]
struct SyncRequest {
    resources: Option<SyncBatch>,
    events: Option<SyncBatch>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<Value>,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    resources: Option<Rows<PhantomMapping>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<Rows<PhantomMapping>>,
}

/// Body is parsed by hand so that malformed payloads still get the
/// `success: false` envelope with whatever `requestId` could be read.
async fn sync_changes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SyncResponse>, AppError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|error| AppError::sync(None, CoreError::Serialization(error)))?;
    let request_id = payload
        .get("requestId")
        .filter(|value| !value.is_null())
        .cloned();
    let request: SyncRequest = serde_json::from_value(payload)
        .map_err(|error| AppError::sync(request_id.clone(), CoreError::Serialization(error)))?;

    let result = tokio::try_join!(
        apply_optional(&state.db, Table::Resources, request.resources),
        apply_optional(&state.db, Table::Events, request.events),
    );
    let (resources, events) = result.map_err(|error| AppError::sync(request_id.clone(), error))?;

    tracing::info!(
        endpoint = "sync",
        request_id = ?request_id,
        resources_added = resources.as_ref().map_or(0, Vec::len),
        events_added = events.as_ref().map_or(0, Vec::len),
        "Applied sync batch"
    );

    Ok(Json(SyncResponse {
        request_id,
        success: true,
        resources: resources.map(|rows| Rows { rows }),
        events: events.map(|rows| Rows { rows }),
    }))
}

async fn apply_optional(
    db: &Database,
    table: Table,
    batch: Option<SyncBatch>,
) -> Result<Option<Vec<PhantomMapping>>, CoreError> {
    match batch {
        Some(batch) => sync::apply_table_changes(db, table, batch).await,
        None => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
struct ExtraInfoQuery {
    id: Option<String>,
}

async fn extra_info(
    State(state): State<AppState>,
    query: Result<Query<ExtraInfoQuery>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    tokio::time::sleep(state.config.extra_info_delay).await;

    let Query(query) = query.map_err(|rejection| {
        AppError::ExtraInfo(CoreError::InvalidInput(rejection.body_text()))
    })?;
    let resource_id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            AppError::ExtraInfo(CoreError::InvalidInput(
                "missing `id` query parameter".to_string(),
            ))
        })?;

    let details = sync::resource_details(&state.db, resource_id)
        .await
        .map_err(AppError::ExtraInfo)?;

    Ok(Html(details.map_or_else(
        || NO_EXTRA_INFO.to_string(),
        |details| render_extra_info(&details),
    )))
}
