use crate::error::AppError;
use crate::models::ClientMessage;
use crate::state::AppState;
use axum::{
    extract::{ws::{Message, WebSocket, WebSocketUpgrade}, State},
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};
use types::ids::{ParticipantId, RoomId};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One socket's view of the room channel
pub struct Connection {
    participant_id: ParticipantId,
    room: Option<RoomId>,
}

impl Connection {
    pub fn new(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            room: None,
        }
    }

    fn room(&self) -> Result<&RoomId, AppError> {
        self.room.as_ref().ok_or(AppError::NotInRoom)
    }

    /// Release the room cursor, if any
    async fn leave(&mut self, state: &AppState) {
        if let Some(room) = self.room.take() {
            state.registry.leave(&room, &self.participant_id).await;
        }
    }
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let participant_id = ParticipantId::new();
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    state.dispatcher.register(participant_id, tx.clone());
    info!(
        participant_id = %participant_id,
        connections = state.dispatcher.connection_count(),
        "Socket connected"
    );

    // Single writer keeps frames in dispatch order
    let writer = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut connection = Connection::new(participant_id);
    while let Some(msg) = stream.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => continue,
        };

        if let Err(err) = on_frame(&state, &mut connection, text.as_str()).await {
            warn!(participant_id = %participant_id, code = err.code(), error = %err, "Frame rejected");
            send_error(&tx, &err);
        }
    }

    // Disconnect counts as leave_room
    connection.leave(&state).await;
    state.dispatcher.unregister(&participant_id);
    state.rate_limiter.forget(&participant_id);
    drop(tx);
    let _ = writer.await;
    info!(participant_id = %participant_id, "Socket disconnected");
}

/// Apply one inbound text frame
///
/// Stale and duplicate swipes are not errors; they are absorbed by the
/// session and produce no frame at all.
pub async fn on_frame(
    state: &AppState,
    connection: &mut Connection,
    text: &str,
) -> Result<(), AppError> {
    state.rate_limiter.check(&connection.participant_id)?;

    let msg = ClientMessage::parse(text).map_err(|e| AppError::BadRequest(e.to_string()))?;
    debug!(
        participant_id = %connection.participant_id,
        event = msg.event_type_label(),
        "Frame received"
    );

    let participant_id = connection.participant_id;
    match msg {
        ClientMessage::JoinRoom { room_id } => {
            let room = RoomId::try_new(room_id)
                .ok_or_else(|| AppError::BadRequest("room_id must not be blank".into()))?;

            // Switching rooms releases the old cursor first
            if connection.room.as_ref().is_some_and(|current| *current != room) {
                connection.leave(state).await;
            }

            state.registry.create_or_join(&room, participant_id).await?;
            connection.room = Some(room);
        }
        ClientMessage::Swipe { index, direction } => {
            let room = connection.room()?;
            let decision = direction
                .decision()
                .ok_or_else(|| AppError::BadRequest(format!("cannot swipe {}", direction)))?;
            state.registry.swipe(room, &participant_id, index, decision).await?;
        }
        ClientMessage::GoBack => {
            let room = connection.room()?;
            state.registry.undo(room, &participant_id).await?;
        }
        ClientMessage::ListMatches => {
            let room = connection.room()?;
            state.registry.matches(room, &participant_id).await?;
        }
        ClientMessage::LeaveRoom => {
            connection.leave(state).await;
        }
    }

    Ok(())
}

fn send_error(tx: &UnboundedSender<String>, err: &AppError) {
    if let Ok(text) = serde_json::to_string(&err.to_frame()) {
        let _ = tx.send(text);
    }
}
