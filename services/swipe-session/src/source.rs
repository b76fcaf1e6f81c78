//! Candidate source seam
//!
//! Where a new room's candidate list comes from. Fetching happens before the
//! room lock is taken, so a slow source never stalls a live room.

use async_trait::async_trait;
use types::candidate::Candidate;
use types::errors::SessionError;
use types::ids::RoomId;

/// Supplies the candidate list for a room being created
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch(&self, room_id: &RoomId) -> Result<Vec<Candidate>, SessionError>;
}

/// Hands every room the same fixed list
#[derive(Debug, Clone, Default)]
pub struct StaticCandidateSource {
    candidates: Vec<Candidate>,
}

impl StaticCandidateSource {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Parse a JSON array of candidates
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::new)
    }

    /// Built-in list for local runs
    pub fn demo() -> Self {
        Self::new(vec![
            Candidate::new("demo-1", "Red Robin", 4.1, 1532, "https://www.google.com/maps?cid=demo-1"),
            Candidate::new("demo-2", "Noodle House", 4.6, 812, "https://www.google.com/maps?cid=demo-2"),
            Candidate::new("demo-3", "Taqueria Sol", 4.4, 2210, "https://www.google.com/maps?cid=demo-3"),
            Candidate::new("demo-4", "Pho Saigon", 4.3, 967, "https://www.google.com/maps?cid=demo-4"),
            Candidate::new("demo-5", "Burger Barn", 3.9, 455, "https://www.google.com/maps?cid=demo-5"),
        ])
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[async_trait]
impl CandidateSource for StaticCandidateSource {
    async fn fetch(&self, _room_id: &RoomId) -> Result<Vec<Candidate>, SessionError> {
        Ok(self.candidates.clone())
    }
}
