//! Tick-driven one-shot timers.
//!
//! Time only advances through [`Scheduler::advance`], so delayed actions
//! fire on the frame that crosses their due time and never in between.

use std::time::Duration;

use crate::utils::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TaskId(u64);

#[derive(Debug)]
struct ScheduledTask<T> {
    id: TaskId,
    stage: Symbol,
    due: Duration,
    payload: T,
}

/// One-shot tasks tagged with the stage that scheduled them.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    tasks: Vec<ScheduledTask<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    /// Time accumulated through `advance`.
    #[inline]
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queues `payload` to come due `delay` after the current time. Due times
    /// saturate at `Duration::MAX`.
    pub fn schedule(&mut self, stage: Symbol, delay: Duration, payload: T) {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            stage,
            due: self.now.saturating_add(delay),
            payload,
        });
    }

    /// Cancels every task not scheduled by `stage`. Returns how many were
    /// dropped.
    pub fn cancel_except(&mut self, stage: Symbol) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.stage == stage);
        before - self.tasks.len()
    }

    /// Advances the clock by `dt` seconds and returns the payloads that came
    /// due, ordered by due time, then by scheduling order. Negative,
    /// non-finite or unrepresentable steps leave the clock where it is.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        if dt > 0.0
            && let Ok(step) = Duration::try_from_secs_f32(dt)
        {
            self.now = self.now.saturating_add(step);
        }

        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| t.due <= now);
        self.tasks = pending;

        due.sort_by_key(|t| (t.due, t.id));
        due.into_iter().map(|t| t.payload).collect()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::interner::intern;

    #[test]
    fn fires_in_due_order() {
        let stage = intern("sched_stage");
        let mut s = Scheduler::new();
        s.schedule(stage, Duration::from_millis(200), "late");
        s.schedule(stage, Duration::from_millis(100), "early");
        s.schedule(stage, Duration::from_millis(100), "early_second");

        assert!(s.advance(0.05).is_empty());
        assert_eq!(s.advance(0.1), vec!["early", "early_second"]);
        assert_eq!(s.advance(0.1), vec!["late"]);
        assert!(s.is_idle());
    }

    #[test]
    fn cancel_except_keeps_current_stage() {
        let a = intern("sched_a");
        let b = intern("sched_b");
        let mut s = Scheduler::new();
        s.schedule(a, Duration::from_millis(10), 1);
        s.schedule(b, Duration::from_millis(10), 2);
        s.schedule(b, Duration::from_millis(10), 3);

        assert_eq!(s.cancel_except(b), 1);
        assert_eq!(s.cancel_except(b), 0);
        assert_eq!(s.advance(1.0), vec![2, 3]);
    }

    #[test]
    fn huge_steps_and_delays_saturate() {
        let stage = intern("sched_huge");
        let mut s = Scheduler::new();

        // Above Duration::MAX as seconds: ignored.
        assert!(s.advance(f32::MAX).is_empty());
        assert_eq!(s.now(), Duration::ZERO);
        assert!(s.advance(f32::INFINITY).is_empty());
        assert!(s.advance(f32::NAN).is_empty());
        assert!(s.advance(-1.0).is_empty());
        assert_eq!(s.now(), Duration::ZERO);

        s.schedule(stage, Duration::from_millis(u64::MAX), "far");
        assert!(s.advance(1.0e18).is_empty());
        assert_eq!(s.pending(), 1);

        // Representable steps pile up to Duration::MAX without overflowing.
        s.advance(1.8e19);
        s.advance(1.8e19);
        assert_eq!(s.now(), Duration::MAX);
        s.schedule(stage, Duration::MAX, "saturated");
        assert_eq!(s.advance(1.0), vec!["far", "saturated"]);
    }
}
