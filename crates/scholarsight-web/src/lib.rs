//! HTTP surface: a single-page UI plus JSON endpoints backed by
//! [`PaperAssistant`].
//!
//! The server keeps no per-user state. The page holds the session state and
//! calls `POST /api/explain` and `POST /api/rephrase`.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use scholarsight_core::{
    EXPLAIN_FAILED_MESSAGE, Explanation, GenerativeModel, PaperAssistant, PaperFile,
    REPHRASE_FAILED_MESSAGE, ValidationError,
};

/// Multipart field carrying the uploaded paper.
pub const PAPER_FIELD: &str = "paper";

/// Largest accepted request body.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Build the application router.
pub fn router<M: GenerativeModel + 'static>(assistant: Arc<PaperAssistant<M>>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/explain", post(explain::<M>))
        .route("/api/rephrase", post(rephrase::<M>))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(assistant)
}

/// Error body: `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let status = match err {
            ValidationError::NoFile => StatusCode::BAD_REQUEST,
            ValidationError::NotPdf { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ValidationError::Busy => StatusCode::CONFLICT,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn explain<M: GenerativeModel + 'static>(
    State(assistant): State<Arc<PaperAssistant<M>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Explanation>, ApiError> {
    let file = match multipart {
        Ok(multipart) => read_paper(multipart).await?,
        Err(rejection) => {
            tracing::debug!(%rejection, "explain request without multipart body");
            None
        }
    };
    let file = file.ok_or(ValidationError::NoFile)?;
    if !file.is_pdf() {
        tracing::info!(name = file.name(), mime = file.mime_type(), "rejected non-PDF upload");
        return Err(ValidationError::NotPdf {
            mime_type: file.mime_type().to_string(),
        }
        .into());
    }

    tracing::info!(name = file.name(), size = file.size(), "explaining paper");
    assistant
        .explain_paper(&file)
        .await
        .map(Json)
        .map_err(|_| ApiError::new(StatusCode::BAD_GATEWAY, EXPLAIN_FAILED_MESSAGE))
}

/// Pull the paper out of the form. An empty file part counts as no file.
async fn read_paper(mut multipart: Multipart) -> Result<Option<PaperFile>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        if field.name() != Some(PAPER_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or("paper.pdf").to_string();
        let mime_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        if bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(PaperFile::from_bytes(
            name,
            mime_type.as_deref(),
            bytes.to_vec(),
        )));
    }
    Ok(None)
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RephraseBody {
    pub text: String,
}

async fn rephrase<M: GenerativeModel + 'static>(
    State(assistant): State<Arc<PaperAssistant<M>>>,
    body: Result<Json<RephraseBody>, JsonRejection>,
) -> Result<Json<RephraseBody>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;
    if body.text.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Select some text to simplify.",
        ));
    }

    tracing::info!(chars = body.text.chars().count(), "simplifying selection");
    assistant
        .rephrase_text(&body.text)
        .await
        .map(|text| Json(RephraseBody { text }))
        .map_err(|_| ApiError::new(StatusCode::BAD_GATEWAY, REPHRASE_FAILED_MESSAGE))
}
