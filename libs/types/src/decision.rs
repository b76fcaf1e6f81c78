//! Swipe decisions
//!
//! `Decision` is what the session records; `Direction` is how the client
//! reports it (a card flung right is a like).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A participant's verdict on one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Like,
    Pass,
}

impl Decision {
    pub fn is_like(&self) -> bool {
        matches!(self, Decision::Like)
    }
}

/// Swipe direction as sent by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Map a direction to a decision
    ///
    /// Returns None for vertical swipes, which cards do not allow.
    pub fn decision(&self) -> Option<Decision> {
        match self {
            Direction::Right => Some(Decision::Like),
            Direction::Left => Some(Decision::Pass),
            Direction::Up | Direction::Down => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_directions_map_to_decisions() {
        assert_eq!(Direction::Right.decision(), Some(Decision::Like));
        assert_eq!(Direction::Left.decision(), Some(Decision::Pass));
    }

    #[test]
    fn test_vertical_directions_rejected() {
        assert_eq!(Direction::Up.decision(), None);
        assert_eq!(Direction::Down.decision(), None);
    }

    #[test]
    fn test_direction_wire_format() {
        let dir: Direction = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(dir, Direction::Left);
        assert_eq!(serde_json::to_string(&Decision::Like).unwrap(), "\"LIKE\"");
    }
}
