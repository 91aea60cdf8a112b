/// Whether the player is standing on something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundState {
    Airborne,
    Grounded,
}

/// Debounces ground contact and gates jumping behind a cooldown.
///
/// The cooldown serves two purposes: a held jump key cannot re-trigger, and
/// the contact that is still reported right after take-off cannot re-ground
/// the player.
#[derive(Debug, Clone)]
pub struct GroundContactTracker {
    state: GroundState,
    last_jump_time: Option<f64>,
    cooldown: f64,
}

impl GroundContactTracker {
    pub fn new(cooldown: f64) -> Self {
        Self {
            state: GroundState::Airborne,
            last_jump_time: None,
            cooldown,
        }
    }

    pub fn state(&self) -> GroundState {
        self.state
    }

    pub fn is_grounded(&self) -> bool {
        self.state == GroundState::Grounded
    }

    pub fn last_jump_time(&self) -> Option<f64> {
        self.last_jump_time
    }

    fn cooled_down(&self, elapsed: f64) -> bool {
        match self.last_jump_time {
            Some(last) => elapsed > last + self.cooldown,
            None => true,
        }
    }

    /// Attempt a jump. Returns `true` when the caller must apply the impulse
    /// and play the jump cue.
    pub fn try_jump(&mut self, elapsed: f64, jump_pressed: bool) -> bool {
        if !jump_pressed || !self.is_grounded() || !self.cooled_down(elapsed) {
            return false;
        }
        self.state = GroundState::Airborne;
        self.last_jump_time = Some(elapsed);
        tracing::debug!(t = elapsed, "jump");
        true
    }

    /// Feed the post-step contact query result.
    pub fn observe_contact(&mut self, elapsed: f64, contact: bool) {
        if contact && self.state == GroundState::Airborne && self.cooled_down(elapsed) {
            self.state = GroundState::Grounded;
            tracing::debug!(t = elapsed, "grounded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded(cooldown: f64) -> GroundContactTracker {
        let mut g = GroundContactTracker::new(cooldown);
        g.observe_contact(0.0, true);
        assert!(g.is_grounded());
        g
    }

    #[test]
    fn starts_airborne_and_lands_on_contact() {
        let mut g = GroundContactTracker::new(3.0);
        assert_eq!(g.state(), GroundState::Airborne);
        g.observe_contact(0.5, false);
        assert_eq!(g.state(), GroundState::Airborne);
        g.observe_contact(0.6, true);
        assert_eq!(g.state(), GroundState::Grounded);
    }

    #[test]
    fn cannot_jump_while_airborne() {
        let mut g = GroundContactTracker::new(3.0);
        assert!(!g.try_jump(10.0, true));
    }

    #[test]
    fn jump_scenario_with_cooldown() {
        let mut g = grounded(3.0);

        assert!(g.try_jump(0.0, true));
        assert_eq!(g.state(), GroundState::Airborne);
        assert_eq!(g.last_jump_time(), Some(0.0));

        // held key with contact every frame until 2.9: nothing
        let mut t = 0.1;
        while t <= 2.9 {
            g.observe_contact(t, true);
            assert!(!g.try_jump(t, true), "re-jumped at {t}");
            t += 0.1;
        }
        assert_eq!(g.state(), GroundState::Airborne);

        g.observe_contact(3.1, true);
        assert!(g.is_grounded());
        assert!(!g.try_jump(3.1, false));

        assert!(g.try_jump(3.2, true));
        assert_eq!(g.last_jump_time(), Some(3.2));
    }

    #[test]
    fn held_key_jumps_at_most_once_per_cooldown() {
        let mut g = GroundContactTracker::new(3.0);
        let mut jumps = Vec::new();
        let dt = 1.0 / 60.0;
        for frame in 0..(60 * 20) {
            let t = frame as f64 * dt;
            if g.try_jump(t, true) {
                jumps.push(t);
            }
            g.observe_contact(t, true);
        }
        assert!(jumps.len() >= 2);
        for pair in jumps.windows(2) {
            assert!(pair[1] - pair[0] >= 3.0, "{pair:?}");
        }
    }
}
