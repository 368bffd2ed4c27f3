//! Fixed-interval timer driven by simulation time

/// Fires once every `interval_ms` of accumulated step time
///
/// # Example
///
/// ```rust
/// use terrarium_nav::Scheduler;
///
/// let mut scheduler = Scheduler::new(500.0);
/// assert!(!scheduler.update(300.0));
/// assert!(scheduler.update(300.0));
/// assert!(!scheduler.update(300.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scheduler {
    interval_ms: f32,
    current_ms: f32,
    last_fire_ms: f32,
}

impl Scheduler {
    /// Create a scheduler that first fires after `interval_ms`
    pub fn new(interval_ms: f32) -> Self {
        Self {
            interval_ms,
            current_ms: 0.0,
            last_fire_ms: 0.0,
        }
    }

    #[inline]
    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    /// Advance by `dt_ms`; returns true when the interval has elapsed
    ///
    /// Fires at most once per call however large the step.
    pub fn update(&mut self, dt_ms: f32) -> bool {
        self.current_ms += dt_ms;
        if self.current_ms - self.last_fire_ms > self.interval_ms {
            self.last_fire_ms = self.current_ms;
            true
        } else {
            false
        }
    }
}
