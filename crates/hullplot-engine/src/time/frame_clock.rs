use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    pub now: Instant,

    pub frame_index: u64,
}

/// Produces clamped `FrameTime` snapshots.
///
/// Clamping keeps a stalled or minimized window from turning one keypress
/// into a full revolution of the camera.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub const DEFAULT_DT_MIN: Duration = Duration::from_micros(100);
    pub const DEFAULT_DT_MAX: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_clamps(Self::DEFAULT_DT_MIN, Self::DEFAULT_DT_MAX)
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline, e.g. after the window was resumed.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
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
    fn dt_is_clamped_to_maximum() {
        let mut clock = FrameClock::new();
        let later = clock.last + Duration::from_secs(5);
        let ft = clock.tick_at(later);
        assert_eq!(ft.dt, FrameClock::DEFAULT_DT_MAX.as_secs_f32());
    }

    #[test]
    fn dt_is_clamped_to_minimum() {
        let mut clock = FrameClock::new();
        let same = clock.last;
        let ft = clock.tick_at(same);
        assert_eq!(ft.dt, FrameClock::DEFAULT_DT_MIN.as_secs_f32());
    }

    #[test]
    fn frame_index_increments() {
        let mut clock = FrameClock::new();
        let base = clock.last;
        let a = clock.tick_at(base + Duration::from_millis(16));
        let b = clock.tick_at(base + Duration::from_millis(32));
        assert_eq!((a.frame_index, b.frame_index), (0, 1));
        assert!((b.dt - 0.016).abs() < 1e-6);
    }
}
