//! Room session
//!
//! Owns one candidate list and every participant cursor for a room. All
//! mutation goes through `&mut self`; the registry wraps each session in its
//! own lock, so operations on one room never interleave.
//!
//! # State machine
//!
//! ```text
//!            last leave               grace elapsed / close
//!   Active ─────────────▶ Idle ─────────────────────────▶ Closed
//!     ▲                    │
//!     └──── join ──────────┘
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;
use tracing::{debug, info, warn};
use types::candidate::CandidateList;
use types::decision::Decision;
use types::errors::SessionError;
use types::ids::{ParticipantId, RoomId};
use types::matches::Match;

use crate::config::SessionConfig;
use crate::cursor::ParticipantCursor;
use crate::events::{BroadcastDispatcher, Outbound, RoomEvent};
use crate::matcher::MatchDetector;
use crate::processor::{SwipeOutcome, SwipeProcessor, UndoOutcome};

/// Lifecycle state of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// At least one participant attached
    Active,
    /// Empty, still joinable until the grace period runs out
    Idle,
    /// Torn down (terminal); joins are rejected
    Closed,
}

/// Result of joining a room
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub participant_id: ParticipantId,
    pub cursor: Option<usize>,
    pub candidates: CandidateList,
    /// The participant was already attached; its progress is untouched
    pub rejoined: bool,
}

/// Result of leaving a room
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeaveOutcome {
    pub removed: bool,
    /// The room became empty and is now pending teardown
    pub now_idle: bool,
    /// Matches unlocked because the departing participant no longer counts
    pub matches: Vec<Match>,
}

/// Shared swipe state for one room
#[derive(Debug)]
pub struct Session {
    pub(crate) room_id: RoomId,
    pub(crate) candidates: CandidateList,
    pub(crate) participants: BTreeMap<ParticipantId, ParticipantCursor>,
    /// Candidate indices that already produced a match
    pub(crate) matches: BTreeSet<usize>,
    pub(crate) match_log: Vec<Match>,
    pub(crate) next_match_sequence: u64,
    pub(crate) config: SessionConfig,
    state: SessionState,
    idle_since: Option<Instant>,
}

impl Session {
    /// Create an empty session
    ///
    /// A new session is `Idle` until its first participant attaches, so a
    /// room whose creator never arrives is still swept.
    pub fn new(
        room_id: RoomId,
        candidates: CandidateList,
        config: SessionConfig,
        now: Instant,
    ) -> Self {
        info!(
            room_id = %room_id,
            candidates = candidates.len(),
            "Session created"
        );

        Self {
            room_id,
            candidates,
            participants: BTreeMap::new(),
            matches: BTreeSet::new(),
            match_log: Vec::new(),
            next_match_sequence: 0,
            config,
            state: SessionState::Idle,
            idle_since: Some(now),
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn participant_ids(&self) -> Vec<ParticipantId> {
        self.participants.keys().copied().collect()
    }

    pub fn cursor(&self, participant_id: &ParticipantId) -> Option<&ParticipantCursor> {
        self.participants.get(participant_id)
    }

    pub fn is_matched(&self, candidate_index: usize) -> bool {
        self.matches.contains(&candidate_index)
    }

    /// Matches in the order they formed
    pub fn matches(&self) -> &[Match] {
        &self.match_log
    }

    /// Whether an idle room has outlived its grace period
    pub fn is_expired(&self, now: Instant) -> bool {
        match (self.state, self.idle_since) {
            (SessionState::Idle, Some(since)) => {
                now.saturating_duration_since(since) >= self.config.idle_grace
            }
            _ => false,
        }
    }

    /// Attach a participant and send them the candidate list
    ///
    /// Joining twice with the same id keeps the existing cursor and resends
    /// the list.
    pub fn join(
        &mut self,
        participant_id: ParticipantId,
        now: Instant,
        dispatcher: &dyn BroadcastDispatcher,
    ) -> Result<JoinOutcome, SessionError> {
        if self.is_expired(now) {
            self.close();
        }

        if self.state == SessionState::Closed {
            warn!(
                room_id = %self.room_id,
                participant_id = %participant_id,
                "Join rejected: room closed"
            );
            return Err(SessionError::RoomNotJoinable {
                room_id: self.room_id.to_string(),
            });
        }

        let rejoined = self.participants.contains_key(&participant_id);
        if !rejoined {
            self.participants.insert(
                participant_id,
                ParticipantCursor::new(participant_id, &self.candidates),
            );
        }

        if self.state == SessionState::Idle {
            self.state = SessionState::Active;
            self.idle_since = None;
            debug!(room_id = %self.room_id, "Session active");
        }

        info!(
            room_id = %self.room_id,
            participant_id = %participant_id,
            participants = self.participants.len(),
            rejoined,
            "Participant joined"
        );

        dispatcher.dispatch(
            &self.room_id,
            Outbound::to(
                participant_id,
                RoomEvent::Restaurants {
                    candidates: self.candidates.clone(),
                },
            ),
        );

        let cursor = self
            .participants
            .get(&participant_id)
            .and_then(ParticipantCursor::cursor);

        Ok(JoinOutcome {
            participant_id,
            cursor,
            candidates: self.candidates.clone(),
            rejoined,
        })
    }

    /// Detach a participant
    ///
    /// Their decisions leave with them, but matches they contributed to
    /// stand. Leaving a room you are not in is a no-op.
    pub fn leave(
        &mut self,
        participant_id: &ParticipantId,
        now: Instant,
        dispatcher: &dyn BroadcastDispatcher,
    ) -> LeaveOutcome {
        let Some(departed) = self.participants.remove(participant_id) else {
            return LeaveOutcome::default();
        };

        info!(
            room_id = %self.room_id,
            participant_id = %participant_id,
            participants = self.participants.len(),
            "Participant left"
        );

        if self.participants.is_empty() {
            if self.state == SessionState::Active {
                self.state = SessionState::Idle;
                self.idle_since = Some(now);
                info!(room_id = %self.room_id, "Session idle");
            }
            return LeaveOutcome {
                removed: true,
                now_idle: true,
                matches: Vec::new(),
            };
        }

        let matches = MatchDetector::reevaluate(self, &departed);
        let recipients = self.participant_ids();
        for m in &matches {
            dispatcher.dispatch(
                &self.room_id,
                Outbound::new(recipients.clone(), RoomEvent::from(m)),
            );
        }

        LeaveOutcome {
            removed: true,
            now_idle: false,
            matches,
        }
    }

    pub fn swipe(
        &mut self,
        participant_id: &ParticipantId,
        candidate_index: usize,
        decision: Decision,
        dispatcher: &dyn BroadcastDispatcher,
    ) -> Result<SwipeOutcome, SessionError> {
        SwipeProcessor::apply_swipe(self, participant_id, candidate_index, decision, dispatcher)
    }

    pub fn undo(
        &mut self,
        participant_id: &ParticipantId,
        dispatcher: &dyn BroadcastDispatcher,
    ) -> Result<UndoOutcome, SessionError> {
        SwipeProcessor::undo(self, participant_id, dispatcher)
    }

    /// Send the match history to one attached participant
    pub fn send_matches(
        &self,
        participant_id: &ParticipantId,
        dispatcher: &dyn BroadcastDispatcher,
    ) -> Result<Vec<Match>, SessionError> {
        if !self.participants.contains_key(participant_id) {
            return Err(SessionError::UnknownParticipant {
                participant_id: participant_id.to_string(),
            });
        }

        let matches = self.match_log.clone();
        dispatcher.dispatch(
            &self.room_id,
            Outbound::to(
                *participant_id,
                RoomEvent::Matches {
                    matches: matches.clone(),
                },
            ),
        );
        Ok(matches)
    }

    /// Tear the room down; terminal
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.participants.clear();
        self.state = SessionState::Closed;
        self.idle_since = None;
        info!(
            room_id = %self.room_id,
            matches = self.match_log.len(),
            "Session closed"
        );
    }
}
