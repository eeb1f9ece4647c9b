// src/handlers/monitor.rs

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use tokio::sync::broadcast::error::RecvError;

use crate::{engine::SessionHandle, error::AppError, handlers::live::send_json, state::AppState};

/// Monitor channel: a remote observer receives the session's event stream
/// (start, violations, per-answer scoring, completion) as it happens.
/// Delivery is best-effort; a lagged or absent monitor never affects the
/// session itself.
pub async fn monitor_ws(
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

    Ok(ws.on_upgrade(move |socket| run_monitor(socket, id, handle)))
}

async fn run_monitor(mut socket: WebSocket, session_id: String, handle: SessionHandle) {
    let mut events = handle.events.subscribe();
    tracing::debug!("monitor connected to session {}", session_id);

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(ev) => {
                        if send_json(&mut socket, &ev).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "monitor for session {} lagged, {} events dropped",
                            session_id,
                            skipped
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::debug!("monitor socket error: {}", err);
                        break;
                    }
                }
            }
        }
    }
    tracing::debug!("monitor disconnected from session {}", session_id);
}
