use std::time::{Duration, Instant};

/// Frame clock for host loops.
///
/// The exhibit itself is driven purely by the deltas handed to
/// [`Exhibit::update`](crate::exhibit::Exhibit::update); this timer is the
/// convenience a host uses to produce them from wall-clock time.
pub struct Timer {
    start_time: Instant,
    last_update: Instant,
    /// Time since last tick
    pub delta: Duration,
    /// Total elapsed time since creation
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
    /// Upper bound applied to `delta`, so a stalled frame does not skip
    /// a whole animation clip in one step.
    pub max_delta: Duration,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Creates a new timer starting from now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            max_delta: Duration::from_millis(250),
        }
    }

    /// Advances the timer and returns the clamped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = (now - self.last_update).min(self.max_delta);
        self.elapsed = now - self.start_time;
        self.last_update = now;
        self.frame_count += 1;
        self.dt_seconds()
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
