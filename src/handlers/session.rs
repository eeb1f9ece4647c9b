// src/handlers/session.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    engine::{self, session::{ExamSession, Tuning}},
    error::AppError,
    models::session::{CreateSessionRequest, CreateSessionResponse},
    state::AppState,
};

/// Creates a proctored session from an immutable question list and spawns
/// its engine task. The session starts in `not_started`; the learner's
/// WebSocket drives it from there.
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    for q in &req.questions {
        q.check_shape().map_err(AppError::BadRequest)?;
    }

    let id = Uuid::new_v4().to_string();
    let time_limit = req.time_limit.unwrap_or(state.config.default_time_limit);
    let passing_score = req
        .passing_score
        .unwrap_or(state.config.default_passing_score);

    let questions: Vec<_> = req
        .questions
        .into_iter()
        .map(|q| q.into_question())
        .collect();
    let total_questions = questions.len();

    let session = ExamSession::new(
        id.clone(),
        req.quiz_id.clone(),
        req.subject_id.clone(),
        questions,
        Tuning {
            time_limit,
            passing_score,
            auto_advance_ticks: state.config.auto_advance_ticks,
            face_miss_threshold: state.config.face_miss_threshold,
        },
    );
    let handle = engine::spawn_session(session, state.judge.clone(), state.detector.clone());

    state.sessions.write().await.insert(id.clone(), handle);
    tracing::info!(
        "session {} created for subject {} (quiz {}, {} questions)",
        id,
        req.subject_id,
        req.quiz_id,
        total_questions
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            id,
            total_questions,
            time_limit,
            passing_score,
        }),
    ))
}

/// Read-only session projection.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .sessions
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("session {id} not found")))?;

    let snapshot = handle
        .snapshot()
        .await
        .ok_or_else(|| AppError::Conflict(format!("session {id} is shutting down")))?;

    Ok(Json(snapshot))
}

/// Tears a session down. Removing the registry entry drops the command
/// sender, which ends the engine task and clears its timers.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let removed = state.sessions.write().await.remove(&id);
    match removed {
        Some(_handle) => {
            tracing::info!("session {} torn down", id);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::NotFound(format!("session {id} not found"))),
    }
}
