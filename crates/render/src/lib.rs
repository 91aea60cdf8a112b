//! Rendering Adapter: implementations of the kernel's `RenderBackend`.
//!
//! # Invariants
//! - A renderer reads the world it is handed and never mutates it.
//! - Output derives only from the pass contents and the viewport size.

mod renderer;

pub use renderer::DebugTextRenderer;

pub fn crate_info() -> &'static str {
    "playfield-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
