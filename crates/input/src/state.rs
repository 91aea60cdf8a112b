use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys the simulation polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    A,
    D,
    W,
    S,
    Space,
    /// Debug mode toggle.
    C,
}

impl Key {
    pub const ALL: [Key; 6] = [Key::A, Key::D, Key::W, Key::S, Key::Space, Key::C];

    fn index(self) -> usize {
        self as usize
    }
}

/// A raw event captured by the host outside the frame step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer moved, in normalized viewport coordinates.
    PointerMoved(Vec2),
    /// Primary button pressed, in normalized viewport coordinates.
    PointerDown(Vec2),
    /// Window lost focus; key-up events will never arrive.
    FocusLost,
}

/// Map a pixel position inside a `width` x `height` viewport to [-1, 1],
/// with +Y pointing up.
pub fn normalize_pointer(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    let w = width.max(1.0);
    let h = height.max(1.0);
    Vec2::new((x / w) * 2.0 - 1.0, -(y / h) * 2.0 + 1.0)
}

/// Immutable per-frame view of the input devices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    held: [bool; Key::ALL.len()],
    /// Last known pointer position, if the pointer ever moved.
    pub pointer: Option<Vec2>,
    /// Click delivered this frame.
    pub click: Option<Vec2>,
}

impl InputState {
    /// Build a snapshot directly, mostly useful for tests and scripted hosts.
    pub fn with_keys(keys: &[Key]) -> Self {
        let mut state = Self::default();
        for key in keys {
            state.held[key.index()] = true;
        }
        state
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.held[key.index()]
    }

    pub fn any_pressed(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.is_pressed(*k))
    }
}

/// Accumulates host events between frames.
#[derive(Debug, Default)]
pub struct InputBuffer {
    held: [bool; Key::ALL.len()],
    pointer: Option<Vec2>,
    pending_click: Option<Vec2>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: HostEvent) {
        match event {
            HostEvent::KeyDown(key) => self.held[key.index()] = true,
            HostEvent::KeyUp(key) => self.held[key.index()] = false,
            HostEvent::PointerMoved(pos) => self.pointer = Some(pos),
            HostEvent::PointerDown(pos) => {
                self.pointer = Some(pos);
                self.pending_click = Some(pos);
            }
            HostEvent::FocusLost => {
                tracing::debug!("focus lost, releasing all keys");
                self.held = [false; Key::ALL.len()];
            }
        }
    }

    /// Produce the snapshot for the next frame, consuming the pending click.
    pub fn snapshot(&mut self) -> InputState {
        InputState {
            held: self.held,
            pointer: self.pointer,
            click: self.pending_click.take(),
        }
    }
}

/// Result of feeding one frame of key state to a [`KeyEdge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Pressed,
    Held,
    Released,
    Idle,
}

/// Remembers the previous frame's state of one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyEdge {
    previous: bool,
}

impl KeyEdge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, down: bool) -> Edge {
        let edge = match (self.previous, down) {
            (false, true) => Edge::Pressed,
            (true, true) => Edge::Held,
            (true, false) => Edge::Released,
            (false, false) => Edge::Idle,
        };
        self.previous = down;
        edge
    }

    pub fn is_down(&self) -> bool {
        self.previous
    }
}
