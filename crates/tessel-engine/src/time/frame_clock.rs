use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous tick, in seconds.
    pub dt: f32,

    /// Sum of all clamped deltas so far. Used as the input replay timestamp.
    pub elapsed: Duration,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

#[derive(Debug, Clone)]
enum Source {
    Wall { last: Instant, dt_min: Duration, dt_max: Duration },
    Fixed(Duration),
}

/// Produces `FrameTime` snapshots, one per `tick()`.
///
/// A wall clock clamps its delta so a debugger pause or a stall does not feed
/// a huge step into the particle update. A fixed clock advances by the same
/// step every tick, which keeps recorded input and particle runs reproducible.
#[derive(Debug, Clone)]
pub struct FrameClock {
    source: Source,
    elapsed: Duration,
    frame_index: u64,
}

impl FrameClock {
    /// Wall clock with clamps of 0.1 ms and 250 ms.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self::from_source(Source::Wall { last: Instant::now(), dt_min, dt_max })
    }

    /// Deterministic clock stepping `step` per tick.
    pub fn fixed(step: Duration) -> Self {
        Self::from_source(Source::Fixed(step))
    }

    fn from_source(source: Source) -> Self {
        Self { source, elapsed: Duration::ZERO, frame_index: 0 }
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self.source, Source::Fixed(_))
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Resets the wall baseline, e.g. after resuming from a pause.
    pub fn reset(&mut self) {
        if let Source::Wall { last, .. } = &mut self.source {
            *last = Instant::now();
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let dt = match &mut self.source {
            Source::Wall { last, dt_min, dt_max } => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(*last).clamp(*dt_min, *dt_max);
                *last = now;
                dt
            }
            Source::Fixed(step) => *step,
        };

        self.elapsed += dt;
        let ft = FrameTime { dt: dt.as_secs_f32(), elapsed: self.elapsed, frame_index: self.frame_index };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_deterministic() {
        let mut c = FrameClock::fixed(Duration::from_millis(20));
        let a = c.tick();
        let b = c.tick();
        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
        assert_eq!(a.dt, 0.02);
        assert_eq!(b.elapsed, Duration::from_millis(40));
        assert!(c.is_fixed());
    }

    #[test]
    fn wall_clock_clamps_to_minimum() {
        // two back to back ticks are far below a 5 ms floor
        let mut c = FrameClock::with_clamps(Duration::from_millis(5), Duration::from_millis(10));
        let ft = c.tick();
        assert!(ft.dt >= 0.005 && ft.dt <= 0.010);
    }

    #[test]
    fn wall_clock_clamps_to_maximum() {
        let mut c = FrameClock::with_clamps(Duration::ZERO, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(c.tick().dt, 0.001);
    }
}
