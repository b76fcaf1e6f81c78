//! Swipe processing
//!
//! Validates swipes and undos against a participant's cursor. The transport
//! delivers swipe events at least once, and a single gesture can fire the
//! client's handler many times, so:
//! - a swipe on an index already decided is a no-op (duplicate)
//! - a swipe on any index other than the cursor is a no-op (stale)
//!
//! Neither is an error; both come back as `accepted: false`.

use std::collections::BTreeMap;
use tracing::debug;
use types::decision::Decision;
use types::errors::{SessionError, SwipeRejection};
use types::ids::ParticipantId;
use types::matches::Match;

use crate::cursor::ParticipantCursor;
use crate::events::{BroadcastDispatcher, Outbound, RoomEvent};
use crate::matcher::MatchDetector;
use crate::session::Session;

/// Result of applying a swipe
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeOutcome {
    pub accepted: bool,
    /// Cursor after the call; unchanged when not accepted
    pub new_cursor: Option<usize>,
    pub rejection: Option<SwipeRejection>,
    /// Match produced by this swipe, if any
    pub matched: Option<Match>,
}

impl SwipeOutcome {
    fn rejected(cursor: Option<usize>, reason: SwipeRejection) -> Self {
        Self {
            accepted: false,
            new_cursor: cursor,
            rejection: Some(reason),
            matched: None,
        }
    }
}

/// Result of a go-back request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoOutcome {
    pub accepted: bool,
    /// Index put back on top, when accepted
    pub restored_index: Option<usize>,
    pub cursor: Option<usize>,
    pub rejection: Option<SwipeRejection>,
}

/// Applies swipe and undo events to a session
pub struct SwipeProcessor;

impl SwipeProcessor {
    /// Apply one swipe from `participant_id` on `candidate_index`
    ///
    /// On acceptance the swiper gets a cursor update; a resulting match is
    /// broadcast to every active participant.
    pub fn apply_swipe(
        session: &mut Session,
        participant_id: &ParticipantId,
        candidate_index: usize,
        decision: Decision,
        dispatcher: &dyn BroadcastDispatcher,
    ) -> Result<SwipeOutcome, SessionError> {
        let cursor = lookup(&mut session.participants, participant_id)?;

        if cursor.has_decided(candidate_index) {
            debug!(
                room_id = %session.room_id,
                participant_id = %participant_id,
                candidate_index,
                "Dropping duplicate swipe"
            );
            return Ok(SwipeOutcome::rejected(
                cursor.cursor(),
                SwipeRejection::DuplicateSwipe,
            ));
        }

        if cursor.cursor() != Some(candidate_index) {
            debug!(
                room_id = %session.room_id,
                participant_id = %participant_id,
                candidate_index,
                cursor = ?cursor.cursor(),
                "Dropping stale swipe"
            );
            return Ok(SwipeOutcome::rejected(
                cursor.cursor(),
                SwipeRejection::StaleSwipe,
            ));
        }

        cursor.record(candidate_index, decision);
        let new_cursor = cursor.cursor();
        let can_go_back = cursor.can_go_back();

        debug!(
            room_id = %session.room_id,
            participant_id = %participant_id,
            candidate_index,
            ?decision,
            new_cursor = ?new_cursor,
            "Swipe accepted"
        );

        dispatcher.dispatch(
            &session.room_id,
            Outbound::to(
                *participant_id,
                RoomEvent::CursorUpdated {
                    participant_id: *participant_id,
                    cursor: new_cursor,
                    can_go_back,
                },
            ),
        );

        let matched = if decision.is_like() {
            MatchDetector::check_match(session, candidate_index)
        } else {
            None
        };

        if let Some(m) = &matched {
            dispatcher.dispatch(
                &session.room_id,
                Outbound::new(session.participant_ids(), RoomEvent::from(m)),
            );
        }

        Ok(SwipeOutcome {
            accepted: true,
            new_cursor,
            rejection: None,
            matched,
        })
    }

    /// Step back one decision for `participant_id`
    ///
    /// Restores the most recently decided candidate and clears its decision.
    /// A match already formed from that decision stays in place.
    pub fn undo(
        session: &mut Session,
        participant_id: &ParticipantId,
        dispatcher: &dyn BroadcastDispatcher,
    ) -> Result<UndoOutcome, SessionError> {
        let cursor = lookup(&mut session.participants, participant_id)?;

        let Some(restored) = cursor.rewind() else {
            debug!(
                room_id = %session.room_id,
                participant_id = %participant_id,
                "Nothing to undo"
            );
            return Ok(UndoOutcome {
                accepted: false,
                restored_index: None,
                cursor: cursor.cursor(),
                rejection: Some(SwipeRejection::NothingToUndo),
            });
        };

        let can_go_back = cursor.can_go_back();
        debug!(
            room_id = %session.room_id,
            participant_id = %participant_id,
            restored_index = restored,
            "Undo accepted"
        );

        dispatcher.dispatch(
            &session.room_id,
            Outbound::to(
                *participant_id,
                RoomEvent::CursorUpdated {
                    participant_id: *participant_id,
                    cursor: Some(restored),
                    can_go_back,
                },
            ),
        );

        Ok(UndoOutcome {
            accepted: true,
            restored_index: Some(restored),
            cursor: Some(restored),
            rejection: None,
        })
    }
}

fn lookup<'a>(
    participants: &'a mut BTreeMap<ParticipantId, ParticipantCursor>,
    participant_id: &ParticipantId,
) -> Result<&'a mut ParticipantCursor, SessionError> {
    participants
        .get_mut(participant_id)
        .ok_or_else(|| SessionError::UnknownParticipant {
            participant_id: participant_id.to_string(),
        })
}
