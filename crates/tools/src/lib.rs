//! Developer Tooling: read-only inspection of a running frame orchestrator.
//!
//! # Invariants
//! - Inspection never mutates simulation state.

mod inspector;

pub use inspector::{DynamicInfo, EntityInfo, FrameInspector, FrameSummary};

pub fn crate_info() -> &'static str {
    "playfield-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
