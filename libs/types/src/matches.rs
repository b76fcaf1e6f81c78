//! Match records
//!
//! A match is produced once per candidate index, the first moment every
//! active participant in the room has liked it. It is final: later undos do
//! not retract it.

use crate::candidate::Candidate;
use crate::ids::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A candidate liked by everyone in the room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Per-room match sequence, starting at 1
    pub sequence: u64,
    pub candidate_index: usize,
    pub candidate: Candidate,
    /// Participants active when the match formed
    pub matched_participants: BTreeSet<ParticipantId>,
}

impl Match {
    pub fn new(
        sequence: u64,
        candidate_index: usize,
        candidate: Candidate,
        matched_participants: BTreeSet<ParticipantId>,
    ) -> Self {
        Self {
            sequence,
            candidate_index,
            candidate,
            matched_participants,
        }
    }

    pub fn includes(&self, participant: &ParticipantId) -> bool {
        self.matched_participants.contains(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_membership() {
        let p1 = ParticipantId::new();
        let p2 = ParticipantId::new();
        let m = Match::new(
            1,
            1,
            Candidate::new("b", "B", 4.0, 10, "https://maps.example/b"),
            [p1].into_iter().collect(),
        );
        assert!(m.includes(&p1));
        assert!(!m.includes(&p2));
    }
}
