//! HTTP-level tests for the web routes, driven through `tower::ServiceExt::oneshot`
//! against a canned model.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use scholarsight_core::{
    EXPLAIN_FAILED_MESSAGE, GenerateRequest, GenerativeModel, NO_FILE_MESSAGE, NOT_PDF_MESSAGE,
    PaperAssistant, REPHRASE_FAILED_MESSAGE, ServiceError,
};
use tower::ServiceExt;

const SAMPLE: &str = r#"{"simpleExplanation":"X", "methodology":"Y", "datasets":"Z", "algorithms":"A", "keyContributions":["C1"], "potentialApplications":["P1"], "referenceHelper":"R"}"#;
const BOUNDARY: &str = "scholarsight-test-boundary";

/// Answers every request with the same reply and counts calls.
struct CannedModel {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl CannedModel {
    fn replying(text: &str) -> Arc<PaperAssistant<Self>> {
        Arc::new(PaperAssistant::with_default_models(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }))
    }

    fn failing() -> Arc<PaperAssistant<Self>> {
        Arc::new(PaperAssistant::with_default_models(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }))
    }
}

impl GenerativeModel for CannedModel {
    fn generate_content(
        &self,
        _request: GenerateRequest,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.clone();
        async move { reply.ok_or_else(|| ServiceError::EmptyResponse("SAFETY".into())) }
    }
}

fn calls(assistant: &PaperAssistant<CannedModel>) -> usize {
    assistant.model().calls.load(Ordering::SeqCst)
}

fn upload(field: &str, filename: &str, content_type: &str, content: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/explain")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn rephrase(text: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/rephrase")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "text": text }).to_string()))
        .unwrap()
}

async fn send(
    assistant: Arc<PaperAssistant<CannedModel>>,
    request: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let app = scholarsight_web::router(assistant);
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn index_serves_the_page() {
    let app = scholarsight_web::router(CannedModel::replying(SAMPLE));
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Drag &amp; drop a PDF here"));
}

#[tokio::test]
async fn explain_returns_breakdown() {
    let assistant = CannedModel::replying(SAMPLE);
    let (status, json) = send(
        assistant.clone(),
        upload("paper", "paper.pdf", "application/pdf", b"%PDF-1.7"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["simpleExplanation"], "X");
    assert_eq!(json["keyContributions"], serde_json::json!(["C1"]));
    assert_eq!(calls(&assistant), 1);
}

#[tokio::test]
async fn explain_accepts_pdf_with_mime_parameters() {
    let assistant = CannedModel::replying(SAMPLE);
    let (status, json) = send(
        assistant.clone(),
        upload(
            "paper",
            "paper.pdf",
            "application/pdf; charset=binary",
            b"%PDF-1.7",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["simpleExplanation"], "X");
    assert_eq!(calls(&assistant), 1);
}

#[tokio::test]
async fn explain_without_file_is_rejected() {
    let assistant = CannedModel::replying(SAMPLE);
    let (status, json) = send(
        assistant.clone(),
        upload("other", "paper.pdf", "application/pdf", b"%PDF-1.7"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], NO_FILE_MESSAGE);
    assert_eq!(calls(&assistant), 0);
}

#[tokio::test]
async fn explain_without_multipart_body_is_rejected() {
    let assistant = CannedModel::replying(SAMPLE);
    let request = Request::builder()
        .method("POST")
        .uri("/api/explain")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(assistant.clone(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], NO_FILE_MESSAGE);
    assert_eq!(calls(&assistant), 0);
}

#[tokio::test]
async fn explain_rejects_non_pdf() {
    let assistant = CannedModel::replying(SAMPLE);
    let (status, json) = send(
        assistant.clone(),
        upload("paper", "notes.txt", "text/plain", b"hello"),
    )
    .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(json["error"], NOT_PDF_MESSAGE);
    assert_eq!(calls(&assistant), 0);
}

#[tokio::test]
async fn explain_failure_is_generic() {
    let (status, json) = send(
        CannedModel::failing(),
        upload("paper", "paper.pdf", "application/pdf", b"%PDF-1.7"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], EXPLAIN_FAILED_MESSAGE);
}

#[tokio::test]
async fn explain_rejects_schema_violation() {
    let (status, json) = send(
        CannedModel::replying(r#"{"simpleExplanation":"X"}"#),
        upload("paper", "paper.pdf", "application/pdf", b"%PDF-1.7"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], EXPLAIN_FAILED_MESSAGE);
}

#[tokio::test]
async fn rephrase_returns_text() {
    let (status, json) = send(
        CannedModel::replying("In plain words."),
        rephrase("A dense paragraph about attention."),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["text"], "In plain words.");
}

#[tokio::test]
async fn rephrase_rejects_blank_text() {
    let assistant = CannedModel::replying("unused");
    let (status, json) = send(assistant.clone(), rephrase("   ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
    assert_eq!(calls(&assistant), 0);
}

#[tokio::test]
async fn rephrase_failure_is_generic() {
    let (status, json) = send(
        CannedModel::failing(),
        rephrase("A dense paragraph about attention."),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], REPHRASE_FAILED_MESSAGE);
}
