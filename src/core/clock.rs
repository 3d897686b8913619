//! Frame clock feeding delta time into the tween driver.

#[cfg(all(feature = "web", target_arch = "wasm32"))]
use web_sys::window;

#[cfg(not(all(feature = "web", target_arch = "wasm32")))]
use std::time::Instant;

/// A clock for measuring elapsed and per-frame time, in seconds.
pub struct Clock {
    running: bool,
    /// Timestamp of the last `delta` call.
    old_time: f64,
    /// Total elapsed time while running.
    elapsed_time: f64,

    #[cfg(not(all(feature = "web", target_arch = "wasm32")))]
    instant: Option<Instant>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a new clock (not started).
    pub fn new() -> Self {
        Self {
            running: false,
            old_time: 0.0,
            elapsed_time: 0.0,
            #[cfg(not(all(feature = "web", target_arch = "wasm32")))]
            instant: None,
        }
    }

    /// Create and start a new clock.
    pub fn start_new() -> Self {
        let mut clock = Self::new();
        clock.start();
        clock
    }

    /// Current time in seconds, from `performance.now()` on the web.
    fn now(&self) -> f64 {
        #[cfg(all(feature = "web", target_arch = "wasm32"))]
        {
            window()
                .and_then(|w| w.performance())
                .map(|p| p.now() / 1000.0)
                .unwrap_or(0.0)
        }

        #[cfg(not(all(feature = "web", target_arch = "wasm32")))]
        {
            self.instant
                .map(|i| i.elapsed().as_secs_f64())
                .unwrap_or(0.0)
        }
    }

    /// Start (or restart) the clock.
    pub fn start(&mut self) {
        #[cfg(not(all(feature = "web", target_arch = "wasm32")))]
        {
            self.instant = Some(Instant::now());
        }

        self.old_time = self.now();
        self.elapsed_time = 0.0;
        self.running = true;
    }

    /// Stop the clock, folding in the time since the last delta.
    pub fn stop(&mut self) {
        self.delta();
        self.running = false;
    }

    /// Seconds since the clock started.
    pub fn elapsed(&mut self) -> f64 {
        self.delta();
        self.elapsed_time
    }

    /// Seconds since the previous call. Starts the clock on first use.
    pub fn delta(&mut self) -> f64 {
        if !self.running {
            self.start();
            return 0.0;
        }

        let new_time = self.now();
        let diff = (new_time - self.old_time).max(0.0);
        self.old_time = new_time;
        self.elapsed_time += diff;

        diff
    }

    /// Seconds since the previous frame, as the tween driver consumes them.
    pub fn frame_delta(&mut self) -> f32 {
        self.delta() as f32
    }

    /// Check if the clock is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_stopped() {
        let clock = Clock::new();
        assert!(!clock.is_running());
    }

    #[test]
    fn test_first_delta_starts_clock() {
        let mut clock = Clock::new();
        assert_eq!(clock.delta(), 0.0);
        assert!(clock.is_running());
    }

    #[test]
    fn test_frame_delta_tracks_elapsed() {
        let mut clock = Clock::new();
        assert_eq!(clock.frame_delta(), 0.0);
        std::thread::sleep(std::time::Duration::from_millis(5));
        let delta = clock.frame_delta();
        assert!(delta >= 0.004);
        assert!((clock.elapsed_time as f32 - delta).abs() < 1e-4);
    }

    #[test]
    fn test_elapsed_never_decreases() {
        let mut clock = Clock::start_new();
        let a = clock.elapsed();
        let b = clock.elapsed();
        assert!(b >= a);
    }
}
