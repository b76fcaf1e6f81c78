//! Property tests for swipe processing and match detection
//!
//! Covers idempotence, staleness rejection, cursor monotonicity, the undo
//! bound, and order independence of match detection.

use proptest::prelude::*;
use std::time::Instant;
use swipe_session::{RecordingDispatcher, Session, SessionConfig};
use types::candidate::{Candidate, CandidateList};
use types::decision::Decision;
use types::errors::SwipeRejection;
use types::ids::{ParticipantId, RoomId};

fn candidates(n: usize) -> CandidateList {
    CandidateList::new(
        (0..n)
            .map(|i| Candidate::new(format!("c{}", i), format!("C{}", i), 4.0, 10, ""))
            .collect(),
    )
}

fn session_with(n: usize, participants: &[ParticipantId], dispatcher: &RecordingDispatcher) -> Session {
    let now = Instant::now();
    let mut session = Session::new(RoomId::new("4821"), candidates(n), SessionConfig::default(), now);
    for p in participants {
        session.join(*p, now, dispatcher).unwrap();
    }
    session
}

fn decision(like: bool) -> Decision {
    if like {
        Decision::Like
    } else {
        Decision::Pass
    }
}

#[derive(Debug, Clone)]
enum Op {
    Swipe(bool),
    Undo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<bool>().prop_map(Op::Swipe),
        1 => Just(Op::Undo),
    ]
}

proptest! {
    #[test]
    fn prop_swipe_twice_equals_once(likes in prop::collection::vec(any::<bool>(), 1..20)) {
        let dispatcher = RecordingDispatcher::new();
        let p1 = ParticipantId::new();
        let p2 = ParticipantId::new();
        let n = likes.len();
        // two participants so no solo matches interfere
        let mut once = session_with(n, &[p1, p2], &dispatcher);
        let mut twice = session_with(n, &[p1, p2], &dispatcher);

        for (step, like) in likes.iter().enumerate() {
            let index = n - 1 - step;
            let first = once.swipe(&p1, index, decision(*like), &dispatcher).unwrap();
            prop_assert!(first.accepted);

            twice.swipe(&p1, index, decision(*like), &dispatcher).unwrap();
            let repeat = twice.swipe(&p1, index, decision(*like), &dispatcher).unwrap();
            prop_assert!(!repeat.accepted);
            prop_assert_eq!(repeat.rejection, Some(SwipeRejection::DuplicateSwipe));

            prop_assert_eq!(once.cursor(&p1), twice.cursor(&p1));
        }
    }

    #[test]
    fn prop_stale_swipe_leaves_state_unchanged(
        n in 1usize..15,
        advance in 0usize..15,
        target in 0usize..40,
    ) {
        let dispatcher = RecordingDispatcher::new();
        let p1 = ParticipantId::new();
        let mut session = session_with(n, &[p1, ParticipantId::new()], &dispatcher);

        for step in 0..advance.min(n) {
            session.swipe(&p1, n - 1 - step, Decision::Pass, &dispatcher).unwrap();
        }

        let before = session.cursor(&p1).cloned().unwrap();
        prop_assume!(before.cursor() != Some(target));

        let outcome = session.swipe(&p1, target, Decision::Like, &dispatcher).unwrap();
        prop_assert!(!outcome.accepted);
        prop_assert_eq!(outcome.new_cursor, before.cursor());
        prop_assert_eq!(session.cursor(&p1), Some(&before));
    }

    #[test]
    fn prop_cursor_strictly_decreases(likes in prop::collection::vec(any::<bool>(), 1..25)) {
        let dispatcher = RecordingDispatcher::new();
        let p1 = ParticipantId::new();
        let n = likes.len();
        let mut session = session_with(n, &[p1], &dispatcher);

        let mut previous = session.cursor(&p1).and_then(|c| c.cursor());
        for like in likes {
            let index = previous.unwrap();
            let outcome = session.swipe(&p1, index, decision(like), &dispatcher).unwrap();
            prop_assert!(outcome.accepted);
            match outcome.new_cursor {
                Some(next) => prop_assert!(next < index),
                None => prop_assert_eq!(index, 0),
            }
            previous = outcome.new_cursor;
        }
        prop_assert_eq!(previous, None);
    }

    #[test]
    fn prop_undo_restores_only_last_decision(ops in prop::collection::vec(op(), 1..40)) {
        let dispatcher = RecordingDispatcher::new();
        let p1 = ParticipantId::new();
        let n = 10;
        let mut session = session_with(n, &[p1, ParticipantId::new()], &dispatcher);

        for op in ops {
            let before = session.cursor(&p1).cloned().unwrap();
            match op {
                Op::Swipe(like) => {
                    if let Some(index) = before.cursor() {
                        let outcome = session.swipe(&p1, index, decision(like), &dispatcher).unwrap();
                        prop_assert!(outcome.accepted);
                    }
                }
                Op::Undo => {
                    let outcome = session.undo(&p1, &dispatcher).unwrap();
                    match before.last_decided() {
                        Some(last) => {
                            prop_assert!(outcome.accepted);
                            prop_assert_eq!(outcome.restored_index, Some(last));
                            // exactly one step back
                            prop_assert_eq!(Some(last), before.cursor().map_or(Some(0), |c| Some(c + 1)));
                            let lowest = before.lowest_decided_index().unwrap();
                            prop_assert!(last >= lowest);
                            let after = session.cursor(&p1).unwrap();
                            prop_assert!(!after.has_decided(last));
                            prop_assert_eq!(after.decided_count(), before.decided_count() - 1);
                        }
                        None => {
                            prop_assert!(!outcome.accepted);
                            prop_assert_eq!(session.cursor(&p1), Some(&before));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn prop_match_iff_all_like(votes in prop::collection::vec(any::<bool>(), 1..6)) {
        let dispatcher = RecordingDispatcher::new();
        let participants: Vec<ParticipantId> = votes.iter().map(|_| ParticipantId::new()).collect();
        let mut session = session_with(1, &participants, &dispatcher);

        let mut matches = 0;
        for (p, like) in participants.iter().zip(&votes) {
            let outcome = session.swipe(p, 0, decision(*like), &dispatcher).unwrap();
            if outcome.matched.is_some() {
                matches += 1;
            }
        }

        let everyone_liked = votes.iter().all(|v| *v);
        prop_assert_eq!(matches, usize::from(everyone_liked));
        prop_assert_eq!(session.is_matched(0), everyone_liked);
    }
}

fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

#[test]
fn test_match_order_independent_for_three() {
    let orders = permutations(&[0, 1, 2]);
    assert_eq!(orders.len(), 6);

    for order in orders {
        let dispatcher = RecordingDispatcher::new();
        let participants = [ParticipantId::new(), ParticipantId::new(), ParticipantId::new()];
        let mut session = session_with(3, &participants, &dispatcher);

        for (position, who) in order.iter().enumerate() {
            let outcome = session
                .swipe(&participants[*who], 2, Decision::Like, &dispatcher)
                .unwrap();
            let last = position == order.len() - 1;
            assert_eq!(outcome.matched.is_some(), last, "order {:?}", order);
        }

        assert!(session.is_matched(2));
        let m = &session.matches()[0];
        assert_eq!(m.matched_participants, participants.iter().copied().collect());
        assert_eq!(dispatcher.matches_in(session.room_id()).len(), 1);
    }
}

#[test]
fn test_match_final_under_any_undo() {
    let dispatcher = RecordingDispatcher::new();
    let participants = [ParticipantId::new(), ParticipantId::new()];
    let mut session = session_with(3, &participants, &dispatcher);

    for p in &participants {
        session.swipe(p, 2, Decision::Like, &dispatcher).unwrap();
    }
    assert!(session.is_matched(2));

    for p in &participants {
        let undo = session.undo(p, &dispatcher).unwrap();
        assert!(undo.accepted);
        assert!(session.is_matched(2));
    }
    assert_eq!(session.matches().len(), 1);
}
