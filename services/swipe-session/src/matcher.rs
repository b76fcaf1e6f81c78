//! Match detection
//!
//! A candidate matches the first moment every active participant has liked
//! it. "Active" is evaluated at check time, so a participant who has not
//! reached the index yet holds the match back until they like it or leave.

use tracing::info;
use types::decision::Decision;
use types::matches::Match;

use crate::cursor::ParticipantCursor;
use crate::session::Session;

/// Detects convergence on a candidate
pub struct MatchDetector;

impl MatchDetector {
    /// Check whether `candidate_index` has just become a match
    ///
    /// Returns None for indices that already matched, so each index yields
    /// at most one Match for the lifetime of the room.
    pub fn check_match(session: &mut Session, candidate_index: usize) -> Option<Match> {
        if session.matches.contains(&candidate_index) {
            return None;
        }

        let active = session.participants.len();
        if active == 0 || active < session.config.match_policy.min_participants {
            return None;
        }

        let all_like = session
            .participants
            .values()
            .all(|cursor| cursor.decision(candidate_index) == Some(Decision::Like));
        if !all_like {
            return None;
        }

        let candidate = session.candidates.get(candidate_index)?.clone();
        session.matches.insert(candidate_index);
        session.next_match_sequence += 1;

        let matched = Match::new(
            session.next_match_sequence,
            candidate_index,
            candidate,
            session.participants.keys().copied().collect(),
        );
        session.match_log.push(matched.clone());

        info!(
            room_id = %session.room_id,
            candidate_index,
            candidate = %matched.candidate.name,
            participants = active,
            sequence = matched.sequence,
            "Match formed"
        );

        Some(matched)
    }

    /// Re-check pending likes after `departed` left the room
    ///
    /// Only indices the departed participant never decided can unlock; an
    /// index they passed on stays closed. Results come back in decision
    /// order (highest index first).
    pub fn reevaluate(session: &mut Session, departed: &ParticipantCursor) -> Vec<Match> {
        if !session.config.match_policy.reevaluate_on_leave {
            return Vec::new();
        }

        let pending: Vec<usize> = match session.participants.values().next() {
            Some(cursor) => cursor
                .liked_indices()
                .filter(|index| !session.matches.contains(index))
                .filter(|index| !departed.has_decided(*index))
                .collect(),
            None => return Vec::new(),
        };

        pending
            .into_iter()
            .filter_map(|index| Self::check_match(session, index))
            .collect()
    }
}
