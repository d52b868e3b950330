use crate::error_code::ErrorKind;
use crate::pipeline::PipelineStats;
use crate::types::Poem;
use crate::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Success body of `GET /poem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoemResponse {
    pub poem: String,
    pub id: String,
    #[serde(rename = "accessionNumber")]
    pub accession_number: String,
}

impl From<Poem> for PoemResponse {
    fn from(poem: Poem) -> Self {
        Self {
            poem: poem.text,
            id: poem.id,
            accession_number: poem.accession_number,
        }
    }
}

/// Failure body. Never carries poem fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            error: err.to_string(),
            code: err.kind().code().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
    pub stats: PipelineStats,
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    StatusCode::from_u16(kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = status_for(self.kind());
        if status.is_server_error() {
            tracing::error!(code = self.kind().code(), error = %self, "request failed");
        } else {
            tracing::info!(code = self.kind().code(), error = %self, "request rejected");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
