//! Types library for the swipe-session service
//!
//! Shared definitions used by the coordination core and the gateway.
//!
//! # Modules
//! - `ids`: Identifiers (RoomId, ParticipantId)
//! - `candidate`: Candidate and the immutable CandidateList
//! - `decision`: Like/Pass decisions and swipe directions
//! - `matches`: Match records
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod candidate;
pub mod decision;
pub mod matches;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::candidate::*;
    pub use crate::decision::*;
    pub use crate::matches::*;
    pub use crate::errors::*;
}
