use serde::{Deserialize, Serialize};

/// Simulation time as seen by every component during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    /// Seconds of simulation time since the first frame.
    pub elapsed_time: f64,
    /// Seconds advanced by the current frame.
    pub delta: f64,
}

/// Turns host timestamps into clamped, monotonic simulation time.
///
/// A stall between frames only shrinks into one `max_delta` step; simulation
/// time is the sum of clamped deltas, so it never jumps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    clock: SimulationClock,
    max_delta: f64,
    last_host_time: Option<f64>,
}

impl FrameClock {
    pub fn new(max_delta: f64) -> Self {
        Self {
            clock: SimulationClock::default(),
            max_delta,
            last_host_time: None,
        }
    }

    /// Advance from a host timestamp in seconds. The first call yields a zero delta.
    pub fn tick(&mut self, host_seconds: f64) -> SimulationClock {
        let raw = match self.last_host_time {
            Some(last) => host_seconds - last,
            None => 0.0,
        };
        self.last_host_time = Some(host_seconds);
        self.advance(raw)
    }

    /// Advance by an explicit delta, clamped to `[0, max_delta]`.
    pub fn advance(&mut self, delta: f64) -> SimulationClock {
        let delta = if delta.is_finite() {
            delta.clamp(0.0, self.max_delta)
        } else {
            0.0
        };
        self.clock.delta = delta;
        self.clock.elapsed_time += delta;
        self.clock
    }

    pub fn now(&self) -> SimulationClock {
        self.clock
    }
}
