//! Play/Debug toggle as a pure state transition plus the effects it implies.

use playfield_input::{Edge, KeyEdge};

use crate::camera::{CameraId, CameraRig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMode {
    Play,
    Debug,
}

impl DebugMode {
    pub fn camera(self) -> CameraId {
        match self {
            Self::Play => CameraId::Gameplay,
            Self::Debug => CameraId::Debug,
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Play => Self::Debug,
            Self::Debug => Self::Play,
        }
    }
}

/// Mode plus the toggle key's previous-frame state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugModeState {
    pub mode: DebugMode,
    pub key: KeyEdge,
}

impl Default for DebugModeState {
    fn default() -> Self {
        Self {
            mode: DebugMode::Debug,
            key: KeyEdge::new(),
        }
    }
}

/// Side effects of a toggle, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugEffect {
    DetachListener(CameraId),
    Activate(CameraId),
    SetAidsVisible(bool),
    AttachListener(CameraId),
}

/// Debug-only scene helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneAids {
    pub frustum_helper: bool,
    pub grid: bool,
    pub axis: bool,
}

impl SceneAids {
    pub fn all(visible: bool) -> Self {
        Self {
            frustum_helper: visible,
            grid: visible,
            axis: visible,
        }
    }
}

/// Advance by one frame of toggle-key input. Only the press edge toggles.
pub fn transition(state: DebugModeState, toggle_down: bool) -> (DebugModeState, Vec<DebugEffect>) {
    let mut key = state.key;
    if key.update(toggle_down) != Edge::Pressed {
        return (DebugModeState { key, ..state }, Vec::new());
    }

    let from = state.mode;
    let to = from.toggled();
    let effects = vec![
        DebugEffect::DetachListener(from.camera()),
        DebugEffect::Activate(to.camera()),
        DebugEffect::SetAidsVisible(to == DebugMode::Debug),
        DebugEffect::AttachListener(to.camera()),
    ];
    (DebugModeState { mode: to, key }, effects)
}

/// Carry out toggle effects on the camera rig and scene aids.
pub fn apply_effects(effects: &[DebugEffect], rig: &mut CameraRig, aids: &mut SceneAids) {
    for effect in effects {
        match *effect {
            DebugEffect::DetachListener(id) => rig.detach_listener(id),
            DebugEffect::Activate(id) => rig.activate(id),
            DebugEffect::SetAidsVisible(visible) => *aids = SceneAids::all(visible),
            DebugEffect::AttachListener(id) => rig.attach_listener(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    #[test]
    fn starts_in_debug() {
        assert_eq!(DebugModeState::default().mode, DebugMode::Debug);
    }

    #[test]
    fn press_edge_toggles_with_ordered_effects() {
        let (next, effects) = transition(DebugModeState::default(), true);
        assert_eq!(next.mode, DebugMode::Play);
        assert_eq!(
            effects,
            vec![
                DebugEffect::DetachListener(CameraId::Debug),
                DebugEffect::Activate(CameraId::Gameplay),
                DebugEffect::SetAidsVisible(false),
                DebugEffect::AttachListener(CameraId::Gameplay),
            ]
        );
    }

    #[test]
    fn held_key_toggles_once() {
        let mut state = DebugModeState::default();
        let mut changes = 0;
        for _ in 0..30 {
            let (next, effects) = transition(state, true);
            if !effects.is_empty() {
                changes += 1;
            }
            state = next;
        }
        let (state, effects) = transition(state, false);
        assert!(effects.is_empty());
        assert_eq!(changes, 1);
        assert_eq!(state.mode, DebugMode::Play);
    }

    #[test]
    fn second_press_returns_to_debug() {
        let (s, _) = transition(DebugModeState::default(), true);
        let (s, _) = transition(s, false);
        let (s, effects) = transition(s, true);
        assert_eq!(s.mode, DebugMode::Debug);
        assert!(effects.contains(&DebugEffect::SetAidsVisible(true)));
    }

    #[test]
    fn applying_effects_keeps_listener_on_active_camera() {
        let mut rig = CameraRig::new(&CameraConfig::default());
        let mut aids = SceneAids::all(true);
        let (_, effects) = transition(DebugModeState::default(), true);
        apply_effects(&effects, &mut rig, &mut aids);
        assert_eq!(rig.active(), CameraId::Gameplay);
        assert_eq!(rig.listener(), Some(CameraId::Gameplay));
        assert_eq!(aids, SceneAids::all(false));
    }
}
