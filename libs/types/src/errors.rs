//! Error types for the swipe-session core
//!
//! Only conditions that fail the requesting operation live here. Stale and
//! duplicate swipes are expected under at-least-once delivery and are
//! reported as rejections, never as errors.

use thiserror::Error;

/// Errors surfaced to the participant that initiated an operation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Room {room_id} is closed and cannot be joined")]
    RoomNotJoinable { room_id: String },

    #[error("Participant {participant_id} is not attached to the room")]
    UnknownParticipant { participant_id: String },

    #[error("Room not found: {room_id}")]
    UnknownRoom { room_id: String },

    #[error("Candidate source failed: {reason}")]
    CandidateSource { reason: String },
}

impl SessionError {
    /// Stable machine-readable code for the wire
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::RoomNotJoinable { .. } => "ROOM_NOT_JOINABLE",
            SessionError::UnknownParticipant { .. } => "UNKNOWN_PARTICIPANT",
            SessionError::UnknownRoom { .. } => "UNKNOWN_ROOM",
            SessionError::CandidateSource { .. } => "CANDIDATE_SOURCE_FAILED",
        }
    }
}

/// Why a swipe or undo was not applied
///
/// Absorbed by the processor and reported as `accepted: false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeRejection {
    /// The index already has a decision for this participant
    DuplicateSwipe,
    /// The index is not the participant's current cursor
    StaleSwipe,
    /// Nothing decided above the cursor to undo
    NothingToUndo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_not_joinable_display() {
        let err = SessionError::RoomNotJoinable {
            room_id: "4821".to_string(),
        };
        assert_eq!(err.to_string(), "Room 4821 is closed and cannot be joined");
        assert_eq!(err.code(), "ROOM_NOT_JOINABLE");
    }

    #[test]
    fn test_unknown_participant_code() {
        let err = SessionError::UnknownParticipant {
            participant_id: "p".to_string(),
        };
        assert!(err.to_string().contains("not attached"));
        assert_eq!(err.code(), "UNKNOWN_PARTICIPANT");
    }
}
