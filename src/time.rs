//! Game clock.
//!
//! `draw_web()` runs at the browser's frame rate with a variable delta.
//! [`GameTime`] turns that into a fixed number of ticks so countdowns
//! (auto-advance, observation pace) are counted in whole ticks.

/// Ticks per real-time second.
pub const TICKS_PER_SEC: u32 = 10;

/// Longest frame delta honoured, so a backgrounded tab does not fire a burst
/// of auto-advances when it comes back.
const MAX_FRAME_MS: f64 = 500.0;

pub struct GameTime {
    ms_per_tick: f64,
    /// Milliseconds not yet consumed as ticks.
    accumulator: f64,
    pub total_ticks: u64,
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec as f64,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed a `performance.now()` timestamp; returns ticks to run this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}

pub fn secs_to_ticks(secs: u32) -> u32 {
    secs.saturating_mul(TICKS_PER_SEC)
}

/// Wall-clock milliseconds since the epoch, for history timestamps.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    0.0
}

/// `performance.now()`, for frame pacing.
pub fn frame_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_returns_zero_ticks() {
        let mut gt = GameTime::new(TICKS_PER_SEC);
        assert_eq!(gt.update(1234.0), 0);
    }

    #[test]
    fn ticks_accumulate_with_remainder() {
        let mut gt = GameTime::new(TICKS_PER_SEC);
        gt.update(0.0);
        assert_eq!(gt.update(150.0), 1);
        assert_eq!(gt.update(200.0), 1);
        assert_eq!(gt.total_ticks, 2);
    }

    #[test]
    fn sixty_fps_for_a_second_is_about_ten_ticks() {
        let mut gt = GameTime::new(TICKS_PER_SEC);
        gt.update(0.0);
        let total: u32 = (1..=60).map(|i| gt.update(i as f64 * 16.667)).sum();
        assert!((9..=11).contains(&total), "got {total}");
    }

    #[test]
    fn backgrounded_tab_is_clamped() {
        let mut gt = GameTime::new(TICKS_PER_SEC);
        gt.update(0.0);
        assert_eq!(gt.update(60_000.0), 5);
    }

    #[test]
    fn clock_going_backwards_yields_nothing() {
        let mut gt = GameTime::new(TICKS_PER_SEC);
        gt.update(1000.0);
        assert_eq!(gt.update(500.0), 0);
    }

    #[test]
    fn seconds_convert_to_ticks() {
        assert_eq!(secs_to_ticks(0), 0);
        assert_eq!(secs_to_ticks(3), 30);
        assert_eq!(secs_to_ticks(u32::MAX), u32::MAX);
    }
}
