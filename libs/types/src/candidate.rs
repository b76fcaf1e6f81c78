//! Candidate restaurants and the room-scoped candidate list
//!
//! A `CandidateList` is fixed when a room starts and shared by every
//! participant. Participants decide it top-down: index `len - 1` first,
//! index `0` last.

use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// A single restaurant offered for swiping
///
/// Field names on the wire follow the client (`ratingValue`, `numberRatings`,
/// `url`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    /// Average star rating, fractional (e.g. 4.5)
    pub rating_value: f64,
    pub number_ratings: u32,
    #[serde(rename = "url")]
    pub external_url: String,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rating_value: f64,
        number_ratings: u32,
        external_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rating_value,
            number_ratings,
            external_url: external_url.into(),
        }
    }
}

/// Immutable ordered candidate sequence
///
/// Cloning is cheap: every clone shares the same allocation, so all cursors
/// in a session index into one list.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateList(Arc<[Candidate]>);

impl CandidateList {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self(candidates.into())
    }

    /// Index of the first candidate to decide, or None for an empty list
    pub fn top_index(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.0.get(index)
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.0
    }

    /// Whether two lists share the same backing allocation
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for CandidateList {
    type Target = [Candidate];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Candidate>> for CandidateList {
    fn from(candidates: Vec<Candidate>) -> Self {
        Self::new(candidates)
    }
}

impl Serialize for CandidateList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CandidateList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Candidate>::deserialize(deserializer).map(Self::new)
    }
}
