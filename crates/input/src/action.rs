use std::f32::consts::{FRAC_PI_2, PI};

use crate::state::{InputState, Key};

/// A single-direction movement intent, relative to the active camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    StrafeLeft,
    StrafeRight,
    Forward,
    Back,
}

impl MoveDirection {
    /// Order in which held keys are checked; the first held one wins.
    pub const PRIORITY: [MoveDirection; 4] = [
        MoveDirection::StrafeLeft,
        MoveDirection::StrafeRight,
        MoveDirection::Forward,
        MoveDirection::Back,
    ];

    pub fn key(self) -> Key {
        match self {
            Self::StrafeLeft => Key::A,
            Self::StrafeRight => Key::D,
            Self::Forward => Key::W,
            Self::Back => Key::S,
        }
    }

    /// Angle added to the camera yaw to obtain the character heading.
    pub fn heading_offset(self) -> f32 {
        match self {
            Self::StrafeLeft => FRAC_PI_2,
            Self::StrafeRight => -FRAC_PI_2,
            Self::Forward => 0.0,
            Self::Back => PI,
        }
    }

    /// First held direction in [`Self::PRIORITY`] order, or `None` when no
    /// movement key is down.
    pub fn from_input(input: &InputState) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|dir| input.is_pressed(dir.key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_keys_no_direction() {
        assert_eq!(MoveDirection::from_input(&InputState::default()), None);
    }

    #[test]
    fn single_keys_map_to_directions() {
        for dir in MoveDirection::PRIORITY {
            let input = InputState::with_keys(&[dir.key()]);
            assert_eq!(MoveDirection::from_input(&input), Some(dir));
        }
    }

    #[test]
    fn a_beats_d_beats_w_beats_s() {
        let all = InputState::with_keys(&[Key::S, Key::W, Key::D, Key::A]);
        assert_eq!(MoveDirection::from_input(&all), Some(MoveDirection::StrafeLeft));
        let dws = InputState::with_keys(&[Key::S, Key::W, Key::D]);
        assert_eq!(MoveDirection::from_input(&dws), Some(MoveDirection::StrafeRight));
        let ws = InputState::with_keys(&[Key::S, Key::W]);
        assert_eq!(MoveDirection::from_input(&ws), Some(MoveDirection::Forward));
    }

    #[test]
    fn offsets() {
        assert_eq!(MoveDirection::Forward.heading_offset(), 0.0);
        assert_eq!(MoveDirection::Back.heading_offset(), PI);
        assert_eq!(MoveDirection::StrafeLeft.heading_offset(), FRAC_PI_2);
        assert_eq!(MoveDirection::StrafeRight.heading_offset(), -FRAC_PI_2);
    }
}
