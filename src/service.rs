use std::sync::Arc;

use axum::{
    Router,
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::ToolConfig;
use crate::error::{FlowError, ToolError};
use crate::flow::Context;
use crate::models::{
    AnalyzeSampleResponse, AppointmentBookingRequest, AppointmentSearchRequest, CategorizedReport,
    OverallAnalysisRequest, SlotAvailability,
};
use crate::tasks::context_keys;
use crate::workflow::{Pipelines, build_pipelines};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn flow_error_response(e: FlowError) -> ApiError {
    error!("pipeline run failed: {}", e);
    match e {
        FlowError::Tool(ToolError::MissingConfig(name)) => {
            internal_error("Service is missing required configuration", name)
        }
        FlowError::Tool(ToolError::MalformedReply { message, raw }) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "error": "The model did not return a valid report",
                "details": message,
                "raw_output": raw
            })),
        ),
        FlowError::Tool(tool) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "error": "Upstream call failed",
                "details": tool.to_string()
            })),
        ),
        other => internal_error("Pipeline execution failed", &other.to_string()),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pipelines: Pipelines,
}

pub async fn create_app() -> Router {
    let config = Arc::new(ToolConfig::from_env());
    let app_state = AppState {
        pipelines: build_pipelines(config),
    };
    build_router(app_state)
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/analyze-sample", post(analyze_sample))
        .route("/overall-analysis", post(overall_analysis))
        .route("/get-available-appointments", post(get_appointments))
        .route("/book-appointment", post(book_appointment))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "UrinaCare Analysis Service",
        "version": "1.0.0",
        "description": "Urine-sample analysis, report generation and appointment scheduling",
        "endpoints": {
            "POST /analyze-sample": "Analyze a urine-sample image (multipart: image, language)",
            "POST /overall-analysis": "Correlate a report with general health data",
            "POST /get-available-appointments": "Find available doctor slots",
            "POST /book-appointment": "Confirm an appointment",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn analyze_sample(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<AnalyzeSampleResponse> {
    let mut image: Option<(String, Vec<u8>)> = None;
    let mut language = "English".to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request_error(&format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let file_name = field
                    .file_name()
                    .unwrap_or("sample.png")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request_error(&format!("failed to read image part: {e}")))?;
                image = Some((file_name, data.to_vec()));
            }
            Some("language") => {
                language = field
                    .text()
                    .await
                    .map_err(|e| bad_request_error(&format!("failed to read language part: {e}")))?;
            }
            _ => {}
        }
    }

    let (file_name, data) =
        image.ok_or_else(|| bad_request_error("multipart field 'image' is required"))?;

    info!(%file_name, %language, "starting sample analysis");

    // The vision adapter works from a path, so the upload lives in a temp
    // file for the duration of the run.
    let temp_path = std::env::temp_dir().join(format!("{}-{}", Uuid::new_v4(), file_name));
    tokio::fs::write(&temp_path, &data)
        .await
        .map_err(|e| internal_error("Failed to store uploaded image", &e.to_string()))?;

    let context = Context::new();
    context
        .set(context_keys::IMAGE_PATH, temp_path.to_string_lossy())
        .await;
    context.set(context_keys::LANGUAGE, &language).await;

    let run = state.pipelines.analysis.execute(context.clone()).await;

    if let Err(e) = tokio::fs::remove_file(&temp_path).await {
        error!("failed to remove temp image {}: {}", temp_path.display(), e);
    }

    let result = run.map_err(flow_error_response)?;

    let structured_report: CategorizedReport = context
        .get(context_keys::CATEGORIZED_REPORT)
        .await
        .ok_or_else(|| {
            internal_error(
                "Analysis finished without a report",
                "categorized_report missing from run context",
            )
        })?;

    let narrative_report = result.response.ok_or_else(|| {
        internal_error(
            "Analysis finished without a narrative",
            "narrative task produced no response",
        )
    })?;

    Ok(Json(AnalyzeSampleResponse {
        narrative_report,
        structured_report,
    }))
}

async fn overall_analysis(
    State(state): State<AppState>,
    Json(request): Json<OverallAnalysisRequest>,
) -> ApiResult<Value> {
    let context = Context::new();
    context
        .set(context_keys::CATEGORIZED_REPORT, &request.categorized_report)
        .await;
    context
        .set(context_keys::PATIENT_HEALTH_DATA, &request.patient_health_data)
        .await;
    context.set(context_keys::LANGUAGE, &request.language).await;

    let result = state
        .pipelines
        .overall
        .execute(context)
        .await
        .map_err(flow_error_response)?;

    Ok(Json(json!({ "overall_analysis_report": result.response })))
}

async fn get_appointments(
    State(state): State<AppState>,
    Json(request): Json<AppointmentSearchRequest>,
) -> ApiResult<Value> {
    let context = Context::new();
    context
        .set(context_keys::CATEGORIZED_REPORT, &request.categorized_report)
        .await;
    context
        .set(context_keys::ALL_DOCTOR_SCHEDULES, &request.all_doctor_schedules)
        .await;

    state
        .pipelines
        .appointment_search
        .execute(context.clone())
        .await
        .map_err(flow_error_response)?;

    let availability: SlotAvailability = context
        .get(context_keys::AVAILABLE_SLOTS)
        .await
        .ok_or_else(|| {
            internal_error(
                "Search finished without a result",
                "available_slots missing from run context",
            )
        })?;

    Ok(Json(json!({ "available_slots": availability })))
}

async fn book_appointment(
    State(state): State<AppState>,
    Json(request): Json<AppointmentBookingRequest>,
) -> ApiResult<Value> {
    let context = Context::new();
    context
        .set(context_keys::CHOSEN_SLOT, &request.chosen_slot)
        .await;
    context
        .set(context_keys::PATIENT_ID, &request.patient_id)
        .await;

    let result = state
        .pipelines
        .appointment_booking
        .execute(context)
        .await
        .map_err(flow_error_response)?;

    Ok(Json(json!({ "booking_confirmation": result.response })))
}
