//! Outbound room events and the dispatcher seam
//!
//! The session decides who receives an event at emission time; the
//! dispatcher only delivers. Dispatch runs while the room lock is held, so
//! implementations must hand events off without blocking.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};
use types::candidate::{Candidate, CandidateList};
use types::ids::{ParticipantId, RoomId};
use types::matches::Match;

/// Events emitted on the room channel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoomEvent {
    /// The full candidate list, sent to a participant on join
    Restaurants { candidates: CandidateList },
    /// A participant's own cursor moved
    CursorUpdated {
        participant_id: ParticipantId,
        cursor: Option<usize>,
        can_go_back: bool,
    },
    /// Everyone in the room liked this candidate
    Match {
        sequence: u64,
        candidate_index: usize,
        candidate: Candidate,
        participants: BTreeSet<ParticipantId>,
    },
    /// Matches formed so far, on request
    Matches { matches: Vec<Match> },
}

impl RoomEvent {
    pub fn event_type_label(&self) -> &'static str {
        match self {
            RoomEvent::Restaurants { .. } => "restaurants",
            RoomEvent::CursorUpdated { .. } => "cursor_updated",
            RoomEvent::Match { .. } => "match",
            RoomEvent::Matches { .. } => "matches",
        }
    }
}

impl From<&Match> for RoomEvent {
    fn from(m: &Match) -> Self {
        RoomEvent::Match {
            sequence: m.sequence,
            candidate_index: m.candidate_index,
            candidate: m.candidate.clone(),
            participants: m.matched_participants.clone(),
        }
    }
}

/// An event addressed to specific participants
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub recipients: Vec<ParticipantId>,
    pub event: RoomEvent,
}

impl Outbound {
    pub fn new(recipients: Vec<ParticipantId>, event: RoomEvent) -> Self {
        Self { recipients, event }
    }

    /// Address a single participant
    pub fn to(participant_id: ParticipantId, event: RoomEvent) -> Self {
        Self::new(vec![participant_id], event)
    }

    pub fn is_for(&self, participant_id: &ParticipantId) -> bool {
        self.recipients.contains(participant_id)
    }
}

/// Delivers outbound events to the sockets subscribed to a room
pub trait BroadcastDispatcher: Send + Sync {
    fn dispatch(&self, room_id: &RoomId, outbound: Outbound);
}

/// Dispatcher that keeps everything it is handed, in order
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<(RoomId, Outbound)>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything dispatched so far
    pub fn sent(&self) -> Vec<(RoomId, Outbound)> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events delivered to one participant, in dispatch order
    pub fn events_for(&self, participant_id: &ParticipantId) -> Vec<RoomEvent> {
        self.sent()
            .into_iter()
            .filter(|(_, outbound)| outbound.is_for(participant_id))
            .map(|(_, outbound)| outbound.event)
            .collect()
    }

    /// Match events dispatched for a room
    pub fn matches_in(&self, room_id: &RoomId) -> Vec<RoomEvent> {
        self.sent()
            .into_iter()
            .filter(|(room, outbound)| {
                room == room_id && matches!(outbound.event, RoomEvent::Match { .. })
            })
            .map(|(_, outbound)| outbound.event)
            .collect()
    }

    pub fn clear(&self) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl BroadcastDispatcher for RecordingDispatcher {
    fn dispatch(&self, room_id: &RoomId, outbound: Outbound) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((room_id.clone(), outbound));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_tag() {
        let event = RoomEvent::CursorUpdated {
            participant_id: ParticipantId::new(),
            cursor: Some(1),
            can_go_back: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "cursor_updated");
        assert_eq!(json["cursor"], 1);
        assert_eq!(event.event_type_label(), "cursor_updated");
    }

    #[test]
    fn test_exhausted_cursor_serializes_null() {
        let event = RoomEvent::CursorUpdated {
            participant_id: ParticipantId::new(),
            cursor: None,
            can_go_back: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json["cursor"].is_null());
    }

    #[test]
    fn test_recording_dispatcher_filters_by_recipient() {
        let dispatcher = RecordingDispatcher::new();
        let room = RoomId::new("4821");
        let p1 = ParticipantId::new();
        let p2 = ParticipantId::new();

        dispatcher.dispatch(
            &room,
            Outbound::to(p1, RoomEvent::Matches { matches: Vec::new() }),
        );
        dispatcher.dispatch(
            &room,
            Outbound::new(vec![p1, p2], RoomEvent::Matches { matches: Vec::new() }),
        );

        assert_eq!(dispatcher.events_for(&p1).len(), 2);
        assert_eq!(dispatcher.events_for(&p2).len(), 1);

        dispatcher.clear();
        assert!(dispatcher.sent().is_empty());
    }
}
