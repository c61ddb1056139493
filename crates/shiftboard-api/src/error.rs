use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use shiftboard_core::Error as CoreError;
use thiserror::Error;

/// Handler failures. Clients only ever see the generic message of the
/// endpoint; the full error is logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Load failed: {0}")]
    Load(#[source] CoreError),
    #[error("Sync failed: {source}")]
    Sync {
        request_id: Option<Value>,
        #[source]
        source: CoreError,
    },
    #[error("Extra info lookup failed: {0}")]
    ExtraInfo(#[source] CoreError),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<&'a Value>,
    success: bool,
    message: &'static str,
}

impl AppError {
    pub fn sync(request_id: Option<Value>, source: CoreError) -> Self {
        Self::Sync { request_id, source }
    }

    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::Load(_) => "There was an error loading the resources and events data.",
            Self::Sync { .. } => "There was an error syncing the data.",
            Self::ExtraInfo(_) => "There was an error getting the extra info for the resource.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = match &self {
            Self::Sync { request_id, .. } => request_id.as_ref(),
            Self::Load(_) | Self::ExtraInfo(_) => None,
        };
        tracing::error!(error = %self, request_id = ?request_id, "Request failed");

        let body = FailureBody {
            request_id,
            success: false,
            message: self.client_message(),
        };
        Json(body).into_response()
    }
}
