//! Identifier types for swipe-session entities
//!
//! Participants are identified by UUID v7 so ids handed out per connection
//! sort by creation time. Rooms are identified by the short PIN participants
//! type in to join.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for a participant in a room
///
/// Carries no identity beyond uniqueness; the gateway mints one per socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// Create a new ParticipantId with current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier (the session PIN)
///
/// Surrounding whitespace is stripped; an empty PIN is not a room.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId from a string
    ///
    /// # Panics
    /// Panics if the PIN is empty after trimming
    pub fn new(pin: impl Into<String>) -> Self {
        let pin = pin.into();
        assert!(!pin.trim().is_empty(), "RoomId must not be empty");
        Self(pin.trim().to_string())
    }

    /// Try to create a RoomId, returning None if the PIN is blank
    pub fn try_new(pin: impl Into<String>) -> Option<Self> {
        let pin = pin.into();
        let trimmed = pin.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Get the PIN string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_creation() {
        let id1 = ParticipantId::new();
        let id2 = ParticipantId::new();
        assert_ne!(id1, id2, "ParticipantIds should be unique");
    }

    #[test]
    fn test_participant_id_serialization() {
        let id = ParticipantId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ParticipantId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_room_id_trims_pin() {
        let room = RoomId::new("  4821 ");
        assert_eq!(room.as_str(), "4821");
    }

    #[test]
    fn test_room_id_try_new() {
        assert!(RoomId::try_new("4821").is_some());
        assert!(RoomId::try_new("   ").is_none());
        assert!(RoomId::try_new("").is_none());
    }

    #[test]
    #[should_panic(expected = "RoomId must not be empty")]
    fn test_room_id_blank_panics() {
        RoomId::new(" ");
    }

    #[test]
    fn test_room_id_serialization() {
        let room = RoomId::new("4821");
        let json = serde_json::to_string(&room).unwrap();
        assert_eq!(json, "\"4821\"");
    }

    proptest::proptest! {
        #[test]
        fn test_room_id_ignores_padding(pin in "[0-9]{1,8}", left in " {0,3}", right in " {0,3}") {
            let padded = format!("{}{}{}", left, pin, right);
            let room = RoomId::try_new(padded).unwrap();
            proptest::prop_assert_eq!(room.as_str(), pin.as_str());
            proptest::prop_assert_eq!(room, RoomId::new(pin.clone()));
        }
    }
}
