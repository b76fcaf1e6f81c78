use serde::Deserialize;
use types::decision::Direction;

/// Inbound frames on the room channel, tagged by `event`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinRoom { room_id: String },
    Swipe { index: usize, direction: Direction },
    GoBack,
    ListMatches,
    LeaveRoom,
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn event_type_label(&self) -> &'static str {
        match self {
            ClientMessage::JoinRoom { .. } => "join_room",
            ClientMessage::Swipe { .. } => "swipe",
            ClientMessage::GoBack => "go_back",
            ClientMessage::ListMatches => "list_matches",
            ClientMessage::LeaveRoom => "leave_room",
        }
    }
}
