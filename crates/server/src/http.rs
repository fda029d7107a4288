//! HTTP endpoints
//!
//! REST API for the loan advisory pipeline.

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use base64::Engine;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use loan_advisor_core::{IntentLabel, StageError};

use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );

    Router::new()
        // Session endpoints
        .route("/api/sessions", post(create_session))
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id", delete(delete_session))
        .route("/api/sessions/:id/reset", post(reset_session))
        // Voice turn endpoint
        .route("/api/turn/:session_id", post(process_turn))
        // Health check
        .route("/health", get(health_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// With CORS disabled the layer is permissive; with no configured
/// origins it defaults to localhost:3000.
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled, allowing all origins");
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "invalid CORS origin, skipping");
                None
            })
        })
        .collect();

    let allow_origin = if parsed.is_empty() {
        tracing::info!("no CORS origins configured, defaulting to localhost:3000");
        AllowOrigin::exact(HeaderValue::from_static("http://localhost:3000"))
    } else {
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    session_id: String,
    turn_count: usize,
}

/// Create a new session
async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, StatusCode> {
    let session = state
        .sessions
        .create(state.new_orchestrator())
        .map_err(StatusCode::from)?;

    Ok(Json(SessionResponse {
        session_id: session.id.clone(),
        turn_count: 0,
    }))
}

/// Get session info
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(SessionResponse {
        session_id: session.id.clone(),
        turn_count: session.orchestrator.history().len(),
    }))
}

/// Delete session
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.sessions.remove(&id);
    StatusCode::NO_CONTENT
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Clear a session's conversation
///
/// In-flight turns finish against the old conversation but cannot
/// write into the cleared buffer.
async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    session.orchestrator.reset();
    Ok(StatusCode::NO_CONTENT)
}

/// One processed voice turn
#[derive(Debug, Serialize)]
struct TurnResponse {
    transcript_text: String,
    detected_intent: IntentLabel,
    language: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_audio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_content_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct TurnErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<&'static str>,
}

/// Process one recorded utterance
///
/// Accepts multipart form data with an `audio` file field. On a stage
/// failure the response names the stage that failed.
async fn process_turn(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<TurnResponse>, (StatusCode, Json<TurnErrorResponse>)> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "unknown session"))?;
    session.touch();

    let audio = extract_audio(multipart)
        .await
        .map_err(|message| error_response(StatusCode::BAD_REQUEST, message))?;

    match session.orchestrator.process_turn(&audio).await {
        Ok(result) => {
            let (response_audio, audio_content_type) = match result.response_audio {
                Some(clip) => (
                    Some(base64::engine::general_purpose::STANDARD.encode(&clip.bytes)),
                    Some(clip.content_type),
                ),
                None => (None, None),
            };

            Ok(Json(TurnResponse {
                transcript_text: result.transcript_text,
                detected_intent: result.detected_intent,
                language: result.language.code(),
                response_text: result.response_text,
                response_audio,
                audio_content_type,
            }))
        }
        Err(e) => Err(stage_failure(e)),
    }
}

fn error_response(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<TurnErrorResponse>) {
    (
        status,
        Json(TurnErrorResponse {
            error: message.into(),
            stage: None,
        }),
    )
}

fn stage_failure(err: StageError) -> (StatusCode, Json<TurnErrorResponse>) {
    tracing::error!(stage = %err.stage, error = %err.source, "turn failed");
    (
        StatusCode::BAD_GATEWAY,
        Json(TurnErrorResponse {
            error: err.source.to_string(),
            stage: Some(err.stage.as_str()),
        }),
    )
}

/// Pull the recorded audio out of the multipart body
async fn extract_audio(
    mut multipart: Multipart,
) -> Result<loan_advisor_core::AudioClip, String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("malformed multipart body: {}", e))?
    {
        if field.name() != Some("audio") {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("audio/webm")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| format!("failed to read audio field: {}", e))?;

        if bytes.is_empty() {
            return Err("audio field is empty".to_string());
        }

        return Ok(loan_advisor_core::AudioClip::new(
            bytes.to_vec(),
            content_type,
        ));
    }

    Err("missing audio field".to_string())
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
