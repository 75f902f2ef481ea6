use crate::app::pages;
use crate::core::IntakeService;
use crate::domain::model::{Attachment, OnboardingForm};
use crate::domain::ports::TaskTracker;
use crate::utils::error::IntakeError;
use axum::body::Body;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{Request, StatusCode};
use axum::middleware::{from_fn, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// multipart 文字欄位與邊界的額外空間
const BODY_HEADROOM: usize = 64 * 1024;

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

pub struct AppState<T: TaskTracker> {
    intake: Arc<IntakeService<T>>,
}

impl<T: TaskTracker> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            intake: Arc::clone(&self.intake),
        }
    }
}

impl<T: TaskTracker> AppState<T> {
    pub fn new(intake: IntakeService<T>) -> Self {
        Self {
            intake: Arc::new(intake),
        }
    }

    pub fn intake(&self) -> &IntakeService<T> {
        &self.intake
    }
}

pub fn build_router<T: TaskTracker + 'static>(state: AppState<T>) -> Router {
    let body_limit = state.intake.max_upload_bytes().saturating_add(BODY_HEADROOM);

    Router::new()
        .route("/", get(pages::landing_handler))
        .route("/form", get(pages::form_handler))
        .route("/healthz", get(healthz_handler))
        .route("/api", post(submit_json_handler::<T>))
        .route("/api/submissions", post(submit_multipart_handler::<T>))
        .route("/api/cnpj/validate", post(validate_cnpj_handler::<T>))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn(request_tracing_middleware))
        .with_state(state)
}

async fn request_tracing_middleware(request: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let request_id = REQUEST_SEQ.fetch_add(1, Ordering::Relaxed);
    let method = request.method().to_string();
    let route = request.uri().path().to_string();

    let span = tracing::info_span!(
        "http.request",
        request_id,
        method = %method,
        route = %route,
    );

    let response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
    });
    response
}

fn error_body(code: &str, message: &str, details: Value) -> Value {
    let mut error = json!({ "code": code, "message": message });
    if let (Value::Object(target), Value::Object(extra)) = (&mut error, details) {
        target.extend(extra);
    }
    json!({ "error": error })
}

/// extractor 拒絕請求時的回應；超過 body 上限時回報設定的上傳大小
fn rejection_response(status: StatusCode, message: &str, max_upload_bytes: usize) -> Response {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::info!(max_upload_bytes, "Submission rejected: body over limit");
        let message = format!(
            "Upload is too large: attachments may be at most {} bytes",
            max_upload_bytes
        );
        let details = json!({ "max_upload_bytes": max_upload_bytes });
        return (status, Json(error_body("payload_too_large", &message, details))).into_response();
    }
    (status, Json(error_body("bad_request", message, json!({})))).into_response()
}

fn intake_error_response(err: &IntakeError) -> Response {
    let (status, code, details) = match err {
        IntakeError::FormValidation(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "form_validation",
            json!({ "fields": errors }),
        ),
        IntakeError::InvalidCnpj { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_cnpj",
            json!({}),
        ),
        IntakeError::InvalidAttachment { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_attachment",
            json!({}),
        ),
        IntakeError::TrackerError { status, code, .. } => (
            StatusCode::BAD_GATEWAY,
            "tracker_error",
            json!({ "upstream_status": status, "upstream_code": code }),
        ),
        IntakeError::AttachmentFailed { task_id, .. } => (
            StatusCode::BAD_GATEWAY,
            "attachment_failed",
            json!({ "task_id": task_id }),
        ),
        IntakeError::ApiError(_) | IntakeError::SerializationError(_) => (
            StatusCode::BAD_GATEWAY,
            "tracker_unavailable",
            json!({}),
        ),
        IntakeError::IoError(_)
        | IntakeError::ConfigError { .. }
        | IntakeError::MissingConfigError { .. }
        | IntakeError::InvalidConfigValueError { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            json!({}),
        ),
    };

    if status.is_server_error() {
        tracing::error!(
            category = ?err.category(),
            "❌ Submission failed: {} ({})",
            err,
            err.recovery_suggestion()
        );
    } else {
        tracing::info!("Submission rejected: {}", err);
    }

    (
        status,
        Json(error_body(code, &err.user_friendly_message(), details)),
    )
        .into_response()
}

async fn healthz_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn submit(
    intake: &IntakeService<impl TaskTracker>,
    form: OnboardingForm,
    attachment: Option<Attachment>,
) -> Response {
    match intake.submit(&form, attachment).await {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(err) => intake_error_response(&err),
    }
}

/// 原本前端直接 POST JSON 到 /api 的介面
async fn submit_json_handler<T: TaskTracker + 'static>(
    State(state): State<AppState<T>>,
    payload: Result<Json<OnboardingForm>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(form)) => submit(state.intake(), form, None).await,
        Err(rejection) => rejection_response(
            rejection.status(),
            &rejection.body_text(),
            state.intake().max_upload_bytes(),
        ),
    }
}

async fn submit_multipart_handler<T: TaskTracker + 'static>(
    State(state): State<AppState<T>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let max_upload_bytes = state.intake().max_upload_bytes();
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            return rejection_response(rejection.status(), &rejection.body_text(), max_upload_bytes)
        }
    };

    match read_submission(&mut multipart).await {
        Ok((form, attachment)) => submit(state.intake(), form, attachment).await,
        Err((status, message)) => rejection_response(status, &message, max_upload_bytes),
    }
}

async fn read_submission(
    multipart: &mut Multipart,
) -> Result<(OnboardingForm, Option<Attachment>), (StatusCode, String)> {
    let mut form = OnboardingForm::default();
    let mut attachment = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "attachment" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (e.status(), e.body_text()))?;

            // 沒選檔案時瀏覽器仍會送出空的 file part
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            attachment = Some(Attachment::new(file_name, content_type, bytes.to_vec()));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| (e.status(), e.body_text()))?;
        match name.as_str() {
            "company_name" | "companyName" => form.company_name = value,
            "cnpj" => form.cnpj = value,
            "website" | "webSite" => form.website = value,
            "sector" => form.sector = value,
            "employees" => form.employees = value,
            other => tracing::debug!("Ignoring unknown form field: {}", other),
        }
    }

    Ok((form, attachment))
}

#[derive(Debug, Deserialize)]
struct CnpjRequest {
    cnpj: String,
}

async fn validate_cnpj_handler<T: TaskTracker + 'static>(
    State(state): State<AppState<T>>,
    payload: Result<Json<CnpjRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(request)) => Json(state.intake().check_identifier(&request.cnpj)).into_response(),
        Err(rejection) => rejection_response(
            rejection.status(),
            &rejection.body_text(),
            state.intake().max_upload_bytes(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::{FieldError, FormErrors};

    #[test]
    fn test_error_body_merges_details() {
        let body = error_body("tracker_error", "failed", json!({ "task_id": "t1" }));
        assert_eq!(body["error"]["code"], "tracker_error");
        assert_eq!(body["error"]["task_id"], "t1");
    }

    #[test]
    fn test_form_errors_map_to_422() {
        let err = IntakeError::FormValidation(FormErrors(vec![FieldError {
            field: "cnpj".to_string(),
            message: "CNPJ is not valid".to_string(),
        }]));
        let response = intake_error_response(&err);
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_oversized_body_reports_limit() {
        let response =
            rejection_response(StatusCode::PAYLOAD_TOO_LARGE, "failed to read stream", 1024);
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let other = rejection_response(StatusCode::BAD_REQUEST, "missing boundary", 1024);
        assert_eq!(other.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_attachment_failure_maps_to_502() {
        let err = IntakeError::AttachmentFailed {
            task_id: "t1".to_string(),
            source: Box::new(IntakeError::TrackerError {
                status: 500,
                code: None,
                message: "boom".to_string(),
            }),
        };
        assert_eq!(intake_error_response(&err).status(), StatusCode::BAD_GATEWAY);
    }
}
