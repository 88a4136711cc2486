//! HTTP request handlers

use super::types::{
    ChatRequest, ChatResponse, ConfigResponse, ConfigUpdateRequest, ErrorResponse, ExportQuery,
    ModelsResponse, SessionListResponse, SessionResponse, SuccessResponse, SummaryResponse,
    TemplatesResponse,
};
use super::AppState;
use crate::chat::{
    ChatError, ConfigUpdate, ExportFormat, Resolution, SUMMARY_FAILURE_LABEL, PROMPT_TEMPLATES,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session lifecycle
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/clear", post(clear_session))
        // User actions
        .route("/api/sessions/:id/chat", post(send_chat))
        .route("/api/sessions/:id/config", post(update_config))
        .route("/api/sessions/:id/summarize", post(summarize_session))
        .route("/api/sessions/:id/export", get(export_session))
        // Catalogues
        .route("/api/models", get(list_models))
        .route("/api/templates", get(list_templates))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn list_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    Json(SessionListResponse {
        sessions: state.sessions.list(),
    })
}

async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let (_, session) = state.sessions.create();
    let session = session.lock().await;
    Json(session_response(&state, &session))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.get(id)?;
    let session = session.lock().await;
    Ok(Json(session_response(&state, &session)))
}

fn session_response(state: &AppState, session: &crate::chat::Session) -> SessionResponse {
    SessionResponse {
        session_id: session.id(),
        phase: state.sessions.phase(session.id()),
        config: session.config().clone(),
        max_tokens_bounds: session.bounds(),
        transcript_bound: session.transcript().bound(),
        turns: session.transcript().all().cloned().collect(),
    }
}

async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.clear(id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// User Actions
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let (session_id, session) = state.sessions.get_or_create(Some(id));
    let mut session = session.lock().await;
    let outcome = session.take_turn(&req.text, &state.resolver).await?;

    Ok(Json(ChatResponse {
        session_id,
        outcome,
        turns: session.transcript().len(),
    }))
}

async fn update_config(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ConfigUpdateRequest>,
) -> Result<Json<ConfigResponse>, AppError> {
    let update = ConfigUpdate::parse(&req.field, &req.value)?;
    if let ConfigUpdate::Model(model) = &update {
        if !state.llm_registry().contains(model) {
            return Err(ChatError::UnknownModel(model.clone()).into());
        }
    }

    let (session_id, session) = state.sessions.get_or_create(Some(id));
    let mut session = session.lock().await;
    let config = session.update_config(update)?;

    Ok(Json(ConfigResponse {
        session_id,
        config,
        max_tokens_bounds: session.bounds(),
    }))
}

async fn summarize_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>, AppError> {
    let session = state.sessions.get(id)?;
    let session = session.lock().await;
    let resolution = session.summarize(&state.resolver).await?;

    let error_kind = match &resolution {
        Resolution::Failed { kind, .. } => Some(*kind),
        _ => None,
    };
    Ok(Json(SummaryResponse {
        summary: resolution.render_as(SUMMARY_FAILURE_LABEL),
        failed: resolution.is_failure(),
        error_kind,
    }))
}

async fn export_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let format = match query.format.as_deref() {
        Some(name) => name.parse::<ExportFormat>()?,
        None => ExportFormat::default(),
    };
    let session = state.sessions.get(id)?;
    let body = session.lock().await.export(format)?;

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.file_name()),
        ),
    ];
    Ok((headers, body).into_response())
}

// ============================================================
// Catalogues
// ============================================================

async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let registry = state.llm_registry();
    Json(ModelsResponse {
        models: registry.available_model_info(),
        default: registry.default_model_id().to_string(),
    })
}

async fn list_templates() -> Json<TemplatesResponse> {
    Json(TemplatesResponse {
        templates: PROMPT_TEMPLATES,
    })
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("groqwise ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::SessionNotFound(_) => AppError::NotFound(err.to_string()),
            ChatError::Export(_) => AppError::Internal(err.to_string()),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
