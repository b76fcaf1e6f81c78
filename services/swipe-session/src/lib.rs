//! Swipe-session coordination core
//!
//! Keeps every participant in a room consistent while they swipe through a
//! shared candidate list:
//! - swipes apply exactly once per participant under at-least-once delivery
//! - go-back undoes one decision at a time, newest first
//! - a match fires once, the moment every active participant likes a candidate
//!
//! # Architecture
//!
//! ```text
//!  join / swipe / go_back / leave
//!              │
//!      ┌───────▼───────┐
//!      │ RoomRegistry  │  ← room arena, one lock per room
//!      └───────┬───────┘
//!              │
//!      ┌───────▼───────┐
//!      │    Session    │  ← candidate list, cursors, matches
//!      └──┬─────────┬──┘
//!         │         │
//!  ┌──────▼───┐ ┌───▼──────────┐
//!  │ Swipe    │ │ Match        │
//!  │ Processor│─▶ Detector     │
//!  └──────┬───┘ └───┬──────────┘
//!         │         │
//!  ┌──────▼─────────▼──────┐
//!  │  BroadcastDispatcher  │
//!  └───────────────────────┘
//! ```

pub mod config;
pub mod cursor;
pub mod events;
pub mod matcher;
pub mod processor;
pub mod registry;
pub mod session;
pub mod source;

pub use config::{MatchPolicy, SessionConfig};
pub use events::{BroadcastDispatcher, Outbound, RecordingDispatcher, RoomEvent};
pub use registry::RoomRegistry;
pub use session::{Session, SessionState};
pub use source::{CandidateSource, StaticCandidateSource};

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
