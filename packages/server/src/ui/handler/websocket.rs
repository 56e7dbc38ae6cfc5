//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{OutboundEvent, SessionId, SessionIdFactory, ShutdownTrigger},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

/// How long a closing session may take to flush its queued events.
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    if state.shutdown.is_triggered() {
        tracing::warn!("Rejecting WebSocket upgrade: server is shutting down");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let session_id = SessionIdFactory::generate();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, session_id)))
}

/// Spawns a task that forwards queued events to the WebSocket sender.
///
/// When the channel closes (the session was unregistered) a Close frame is
/// sent before the task ends.
///
/// # Arguments
///
/// * `rx` - Channel receiver fed by the MessagePusher
/// * `sender` - WebSocket sink of this session
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                return;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    })
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, session_id: SessionId) {
    // Create a channel for this session to receive events
    let (tx, rx) = mpsc::unbounded_channel();

    // (register_client is called inside the UseCase)
    if let Err(e) = state
        .connect_session_usecase
        .execute(session_id.clone(), tx)
        .await
    {
        tracing::warn!("Session '{}' refused: {}", session_id, e);
        let _ = socket.send(Message::Close(None)).await;
        return;
    }

    let (sender, receiver) = socket.split();
    let (stop_tx, stop_rx) = oneshot::channel();
    let mut recv_task = tokio::spawn(receive_loop(
        receiver,
        stop_rx,
        state.clone(),
        session_id.clone(),
    ));
    let mut send_task = pusher_loop(rx, sender);

    let send_finished = tokio::select! {
        _ = &mut recv_task => false,
        _ = &mut send_task => true,
    };

    // Write side gone: stop reading, but let an in-flight event run to completion
    if send_finished {
        let _ = stop_tx.send(());
        if let Err(e) = recv_task.await {
            tracing::error!("Receive task of session '{}' failed: {}", session_id, e);
        }
    }

    // Unregistering drops the channel sender, which ends `pusher_loop`
    if let Err(e) = state.disconnect_session_usecase.execute(&session_id).await {
        tracing::warn!("Failed to disconnect session '{}': {}", session_id, e);
    }

    if !send_finished
        && tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut send_task)
            .await
            .is_err()
    {
        tracing::debug!("Session '{}' did not flush in time", session_id);
        send_task.abort();
    }
}

/// Reads frames until the peer closes, `stop` fires or shutdown is triggered.
///
/// Events are handled one at a time, so a session's own events are
/// processed in the order they arrived. Stop requests are only observed
/// between events.
async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    mut stop: oneshot::Receiver<()>,
    state: Arc<AppState>,
    session_id: SessionId,
) {
    let shutdown = state.shutdown.clone();
    let shutdown_requested = shutdown.wait();
    tokio::pin!(shutdown_requested);

    loop {
        let frame = tokio::select! {
            _ = &mut shutdown_requested => {
                tracing::info!("Closing session '{}' for shutdown", session_id);
                break;
            }
            _ = &mut stop => {
                tracing::debug!("Session '{}' stopped reading: write side closed", session_id);
                break;
            }
            frame = receiver.next() => frame,
        };

        let msg = match frame {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::error!("WebSocket error on session '{}': {}", session_id, e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!("Received from '{}': {}", session_id, text.as_str());
                dispatch(&state, &session_id, text.as_str()).await;
            }
            Message::Binary(_) => {
                tracing::debug!("Ignoring binary frame from '{}'", session_id);
            }
            Message::Close(_) => {
                tracing::info!("Session '{}' requested close", session_id);
                break;
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }
}

/// Route one client event to its UseCase. Failures go back to the sender
/// only, as an `error` event.
async fn dispatch(state: &AppState, session_id: &SessionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Malformed frame from '{}': {}", session_id, e);
            push_error(state, session_id, format!("Invalid request: {e}")).await;
            return;
        }
    };

    let result = match event {
        ClientEvent::JoinChat(payload) => state
            .join_chat_usecase
            .execute(session_id, payload.username, payload.avatar)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientEvent::SendMessage(payload) => state
            .send_message_usecase
            .execute(session_id, payload.message)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientEvent::AdminClearChat(payload) => state
            .admin_clear_chat_usecase
            .execute(session_id, &payload.password)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientEvent::AdminRestartServer(payload) => state
            .admin_restart_server_usecase
            .execute(session_id, &payload.password)
            .await
            .map_err(|e| e.to_string()),
        ClientEvent::RequestStats => {
            state.get_stats_usecase.execute(session_id).await;
            Ok(())
        }
    };

    if let Err(message) = result {
        push_error(state, session_id, message).await;
    }
}

async fn push_error(state: &AppState, session_id: &SessionId, message: String) {
    if let Err(e) = state
        .message_pusher
        .push_to(session_id, &OutboundEvent::Error(message))
        .await
    {
        tracing::warn!("Failed to push error to '{}': {}", session_id, e);
    }
}
