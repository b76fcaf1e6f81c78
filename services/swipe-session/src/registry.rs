//! Room registry
//!
//! Live rooms sit in an arena keyed by room id; each entry is a session
//! behind its own async mutex. Every operation clones the room handle out of
//! the map, drops the map guard, then awaits the room lock, so a busy room
//! never blocks lookups of other rooms.
//!
//! A room that closes is dropped from the arena and leaves only a tombstone
//! (its id and close time) so the PIN keeps rejecting joins. Tombstones are
//! pruned by the sweep once `closed_retention` has passed.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info};
use types::candidate::CandidateList;
use types::decision::Decision;
use types::errors::SessionError;
use types::ids::{ParticipantId, RoomId};
use types::matches::Match;

use crate::config::SessionConfig;
use crate::events::BroadcastDispatcher;
use crate::processor::{SwipeOutcome, UndoOutcome};
use crate::session::{JoinOutcome, LeaveOutcome, Session, SessionState};
use crate::source::CandidateSource;

type RoomHandle = Arc<Mutex<Session>>;

/// Creates, looks up and tears down sessions by room id
pub struct RoomRegistry {
    rooms: DashMap<RoomId, RoomHandle>,
    // Closed room ids mapped to when they closed
    tombstones: DashMap<RoomId, Instant>,
    source: Arc<dyn CandidateSource>,
    dispatcher: Arc<dyn BroadcastDispatcher>,
    config: SessionConfig,
}

impl RoomRegistry {
    pub fn new(
        source: Arc<dyn CandidateSource>,
        dispatcher: Arc<dyn BroadcastDispatcher>,
        config: SessionConfig,
    ) -> Self {
        info!(
            idle_grace_secs = config.idle_grace.as_secs(),
            closed_retention_secs = config.closed_retention.as_secs(),
            reevaluate_on_leave = config.match_policy.reevaluate_on_leave,
            min_participants = config.match_policy.min_participants,
            "RoomRegistry initialized"
        );

        Self {
            rooms: DashMap::new(),
            tombstones: DashMap::new(),
            source,
            dispatcher,
            config,
        }
    }

    fn room(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.rooms.get(room_id).map(|entry| Arc::clone(entry.value()))
    }

    fn require_room(&self, room_id: &RoomId) -> Result<RoomHandle, SessionError> {
        self.room(room_id).ok_or_else(|| {
            if self.tombstones.contains_key(room_id) {
                SessionError::RoomNotJoinable {
                    room_id: room_id.to_string(),
                }
            } else {
                SessionError::UnknownRoom {
                    room_id: room_id.to_string(),
                }
            }
        })
    }

    fn not_joinable(room_id: &RoomId) -> SessionError {
        SessionError::RoomNotJoinable {
            room_id: room_id.to_string(),
        }
    }

    /// Replace a closed session with its tombstone
    ///
    /// The tombstone goes in before the arena entry is removed, so a
    /// concurrent first join always sees one or the other.
    fn retire(&self, room_id: &RoomId, closed_at: Instant) {
        self.tombstones.insert(room_id.clone(), closed_at);
        self.rooms.remove(room_id);
        debug!(room_id = %room_id, "Room retired");
    }

    /// Join `room_id`, creating the session on first join
    ///
    /// The candidate list is fetched outside any lock. If two first joins
    /// race, one list wins and both participants see it.
    pub async fn create_or_join(
        &self,
        room_id: &RoomId,
        participant_id: ParticipantId,
    ) -> Result<JoinOutcome, SessionError> {
        if self.tombstones.contains_key(room_id) {
            return Err(Self::not_joinable(room_id));
        }

        let room = match self.room(room_id) {
            Some(room) => room,
            None => {
                let candidates = CandidateList::new(self.source.fetch(room_id).await?);
                match self.rooms.entry(room_id.clone()) {
                    Entry::Occupied(entry) => Arc::clone(entry.get()),
                    Entry::Vacant(entry) => {
                        // Closed while the list was being fetched
                        if self.tombstones.contains_key(room_id) {
                            return Err(Self::not_joinable(room_id));
                        }
                        let session = Session::new(
                            room_id.clone(),
                            candidates,
                            self.config.clone(),
                            Instant::now(),
                        );
                        Arc::clone(entry.insert(Arc::new(Mutex::new(session))).value())
                    }
                }
            }
        };

        let mut session = room.lock().await;
        let now = Instant::now();
        let result = session.join(participant_id, now, self.dispatcher.as_ref());
        if session.state() == SessionState::Closed {
            self.retire(room_id, now);
        }
        result
    }

    /// Release a participant's cursor; unknown rooms and participants are ignored
    pub async fn leave(&self, room_id: &RoomId, participant_id: &ParticipantId) -> LeaveOutcome {
        let Some(room) = self.room(room_id) else {
            debug!(room_id = %room_id, "Leave for unknown room ignored");
            return LeaveOutcome::default();
        };

        let mut session = room.lock().await;
        session.leave(participant_id, Instant::now(), self.dispatcher.as_ref())
    }

    pub async fn swipe(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
        candidate_index: usize,
        decision: Decision,
    ) -> Result<SwipeOutcome, SessionError> {
        let room = self.require_room(room_id)?;
        let mut session = room.lock().await;
        session.swipe(participant_id, candidate_index, decision, self.dispatcher.as_ref())
    }

    pub async fn undo(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
    ) -> Result<UndoOutcome, SessionError> {
        let room = self.require_room(room_id)?;
        let mut session = room.lock().await;
        session.undo(participant_id, self.dispatcher.as_ref())
    }

    /// Send the room's match history to a participant
    pub async fn matches(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
    ) -> Result<Vec<Match>, SessionError> {
        let room = self.require_room(room_id)?;
        let session = room.lock().await;
        session.send_matches(participant_id, self.dispatcher.as_ref())
    }

    /// Close a room explicitly; later joins fail with `RoomNotJoinable`
    pub async fn close(&self, room_id: &RoomId) -> Result<(), SessionError> {
        if self.tombstones.contains_key(room_id) {
            return Ok(());
        }
        let room = self.require_room(room_id)?;
        let mut session = room.lock().await;
        session.close();
        self.retire(room_id, Instant::now());
        Ok(())
    }

    /// Close every room idle past the grace period and prune old tombstones
    ///
    /// Returns the ids closed by this sweep.
    pub async fn sweep_idle(&self, now: Instant) -> Vec<RoomId> {
        let handles: Vec<(RoomId, RoomHandle)> = self
            .rooms
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        let mut closed = Vec::new();
        for (room_id, room) in handles {
            let mut session = room.lock().await;
            if session.is_expired(now) {
                session.close();
                self.retire(&room_id, now);
                closed.push(room_id);
            }
        }

        let retention = self.config.closed_retention;
        let before = self.tombstones.len();
        self.tombstones
            .retain(|_, closed_at| now.saturating_duration_since(*closed_at) < retention);
        let pruned = before.saturating_sub(self.tombstones.len());

        if !closed.is_empty() || pruned > 0 {
            info!(closed = closed.len(), pruned, "Idle rooms swept");
        }
        closed
    }

    pub async fn state(&self, room_id: &RoomId) -> Option<SessionState> {
        if let Some(room) = self.room(room_id) {
            let state = room.lock().await.state();
            return Some(state);
        }
        self.tombstones
            .contains_key(room_id)
            .then_some(SessionState::Closed)
    }

    /// Number of live rooms
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of closed room ids still rejecting joins
    pub fn closed_count(&self) -> usize {
        self.tombstones.len()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
