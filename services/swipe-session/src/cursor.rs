//! Per-participant swipe progress
//!
//! A cursor walks the candidate list from the top index down to 0. Every
//! accepted swipe is pushed onto a decision log; undo pops it. Because only
//! the candidate on top may be decided and only the last decision may be
//! undone, the log always holds the contiguous run `top..=cursor + 1`.

use std::collections::BTreeMap;
use types::candidate::CandidateList;
use types::decision::Decision;
use types::ids::ParticipantId;

/// One participant's position and decisions within a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantCursor {
    participant_id: ParticipantId,
    /// Next index to decide; None once every candidate is decided
    cursor: Option<usize>,
    decisions: BTreeMap<usize, Decision>,
    /// Decided indices in the order they were decided
    log: Vec<usize>,
    /// Lowest index ever decided; never rises, even across undo
    lowest_decided_index: Option<usize>,
}

impl ParticipantCursor {
    /// Start a cursor on top of the list, like every other participant
    pub fn new(participant_id: ParticipantId, candidates: &CandidateList) -> Self {
        Self {
            participant_id,
            cursor: candidates.top_index(),
            decisions: BTreeMap::new(),
            log: Vec::new(),
            lowest_decided_index: None,
        }
    }

    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn decision(&self, candidate_index: usize) -> Option<Decision> {
        self.decisions.get(&candidate_index).copied()
    }

    pub fn has_decided(&self, candidate_index: usize) -> bool {
        self.decisions.contains_key(&candidate_index)
    }

    pub fn lowest_decided_index(&self) -> Option<usize> {
        self.lowest_decided_index
    }

    pub fn decided_count(&self) -> usize {
        self.log.len()
    }

    /// Whether a candidate is still on top
    pub fn can_swipe(&self) -> bool {
        self.cursor.is_some()
    }

    /// Whether a decided candidate sits above the cursor
    pub fn can_go_back(&self) -> bool {
        self.last_decided().is_some()
    }

    /// Most recently decided index, the only one undo may restore
    pub fn last_decided(&self) -> Option<usize> {
        self.log.last().copied()
    }

    /// Liked indices, highest first (decision order)
    pub fn liked_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.decisions
            .iter()
            .rev()
            .filter(|(_, decision)| decision.is_like())
            .map(|(index, _)| *index)
    }

    /// Record a decision for the candidate currently on top
    ///
    /// Callers must have checked that `candidate_index` is the cursor.
    pub(crate) fn record(&mut self, candidate_index: usize, decision: Decision) {
        debug_assert_eq!(self.cursor, Some(candidate_index));
        debug_assert!(!self.decisions.contains_key(&candidate_index));

        self.decisions.insert(candidate_index, decision);
        self.log.push(candidate_index);
        self.cursor = candidate_index.checked_sub(1);
        self.lowest_decided_index = Some(
            self.lowest_decided_index
                .map_or(candidate_index, |lowest| lowest.min(candidate_index)),
        );
    }

    /// Pop the most recent decision and put that candidate back on top
    pub(crate) fn rewind(&mut self) -> Option<usize> {
        let restored = self.log.pop()?;
        debug_assert_eq!(self.cursor.map_or(0, |c| c + 1), restored);

        self.decisions.remove(&restored);
        self.cursor = Some(restored);
        Some(restored)
    }
}
