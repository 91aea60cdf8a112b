//! Input: host events are buffered as they arrive and read by the simulation
//! only through a per-frame [`InputState`] snapshot.
//!
//! # Invariants
//! - Simulation code never observes a live, concurrently mutating event.
//! - A click is delivered in exactly one snapshot.
//! - Pointer position is last-write-wins.

pub mod action;
pub mod state;

pub use action::MoveDirection;
pub use state::{Edge, HostEvent, InputBuffer, InputState, Key, KeyEdge, normalize_pointer};

pub fn crate_info() -> &'static str {
    "playfield-input v0.1.0"
}
