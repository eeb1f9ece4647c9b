// src/handlers/live.rs

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use crate::{
    engine::SessionHandle,
    error::AppError,
    models::signal::{ClientSignal, Directive},
    state::AppState,
};

/// Learner channel: the locked-down tab streams raw `ClientSignal`s in
/// and receives `Directive`s back on the same socket.
pub async fn learner_ws(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .sessions
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("session {id} not found")))?;

    Ok(ws.on_upgrade(move |socket| run_learner(socket, id, handle)))
}

async fn run_learner(mut socket: WebSocket, session_id: String, handle: SessionHandle) {
    let mut directives = handle.directives.subscribe();
    tracing::debug!("learner connected to session {}", session_id);

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientSignal>(text.as_str()) {
                            Ok(signal) => {
                                // Closed command channel means the session
                                // was torn down underneath us.
                                if !handle.signal(signal).await {
                                    break;
                                }
                            }
                            Err(err) => {
                                tracing::debug!("malformed client signal: {}", err);
                                let reply = Directive::Error {
                                    message: format!("malformed signal: {err}"),
                                };
                                if send_json(&mut socket, &reply).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::debug!("learner socket error: {}", err);
                        break;
                    }
                }
            }
            directive = directives.recv() => {
                match directive {
                    Ok(d) => {
                        if send_json(&mut socket, &d).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "learner stream for session {} lagged, {} directives dropped",
                            session_id,
                            skipped
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
    tracing::debug!("learner disconnected from session {}", session_id);
}

pub(crate) async fn send_json<T: Serialize>(
    socket: &mut WebSocket,
    value: &T,
) -> Result<(), axum::Error> {
    match serde_json::to_string(value) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(err) => {
            tracing::error!("failed to serialize outbound message: {}", err);
            Ok(())
        }
    }
}
