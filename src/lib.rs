//! Tracks Code Manager deploy status across polls.
//!
//! Each poll decodes a raw status snapshot, then reconciles it into a
//! persisted per-environment history: updates to known deploys are merged,
//! new deploys are appended, vanished unfinished deploys become ghosts and
//! vanished environments get a Deleted marker.

pub mod code_state;
pub mod error;
pub mod matcher;
pub mod model;
mod reconcile;
pub mod remote;
pub mod render;
pub mod snapshot;
pub mod store;
pub mod web;

pub use self::code_state::{CodeState, UpdateError};
pub use self::matcher::{Verdict, match_deploys};
