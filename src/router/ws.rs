//! Websocket subscriber endpoint (§4.C). Forwards every broadcast
//! `MatchState` snapshot to the client as JSON text; client-sent messages are
//! read and discarded (advisory only, per the fan-out contract).

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use tokio::sync::broadcast::error::RecvError;

use crate::domain::state::MatchStatus;

use super::AppState;

/// Clean termination code sent once a match reaches a terminal status
/// (§4.B: "ArchiveMatch ... closes all subscribers with a clean termination
/// code"; `CalculateRound` does the same when the round it just computed is
/// itself terminal).
const MATCH_TERMINATED_CLOSE_CODE: u16 = 1000;

pub async fn subscribe(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(tournament_match_id): Path<i64>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, tournament_match_id))
}

/// Send `snapshot` as JSON; if its status is terminal, follow it with a clean
/// close frame. Returns `true` if the caller should keep the loop going.
async fn send_snapshot(socket: &mut WebSocket, snapshot: &crate::domain::state::MatchState) -> bool {
    let Ok(json) = serde_json::to_string(snapshot) else { return true };
    if socket.send(Message::Text(json)).await.is_err() {
        return false;
    }
    if snapshot.status.is_terminal() && snapshot.status != MatchStatus::DrawPendingResolution {
        let _ = socket
            .send(Message::Close(Some(CloseFrame {
                code: MATCH_TERMINATED_CLOSE_CODE,
                reason: "match terminated".into(),
            })))
            .await;
        return false;
    }
    true
}

async fn handle_socket(mut socket: WebSocket, state: AppState, tournament_match_id: i64) {
    let handle = state.registry.get_or_spawn(tournament_match_id);
    let mut rx = handle.subscribe();

    if let Ok(snapshot) = handle.get_state().await {
        if !send_snapshot(&mut socket, &snapshot).await {
            return;
        }
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(_)) => continue,
                    _ => break,
                }
            }
            broadcast = rx.recv() => {
                match broadcast {
                    Ok(snapshot) => {
                        if !send_snapshot(&mut socket, &snapshot).await {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(tournament_match_id, skipped, "subscriber lagged, closing connection");
                        break;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
}
