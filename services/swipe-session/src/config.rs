//! Session configuration

use std::time::Duration;

/// How match eligibility reacts to the room's membership
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPolicy {
    /// When a participant leaves, immediately match every index that all
    /// remaining participants have already liked
    pub reevaluate_on_leave: bool,
    /// Minimum number of active participants for a match to form
    pub min_participants: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            reevaluate_on_leave: true,
            min_participants: 1,
        }
    }
}

/// Per-room configuration shared by every session in a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long an empty room stays joinable before it is closed
    pub idle_grace: Duration,
    /// How long a closed room id keeps rejecting joins before it can be reused
    pub closed_retention: Duration,
    pub match_policy: MatchPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_grace: Duration::from_secs(300),
            closed_retention: Duration::from_secs(3600),
            match_policy: MatchPolicy::default(),
        }
    }
}
