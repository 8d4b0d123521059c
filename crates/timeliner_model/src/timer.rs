// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transport timer driven by the host main loop.

use crate::ruler::Ruler;
use serde::{Deserialize, Serialize};

/// Playback clock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    /// Current time in seconds
    pub time: f32,
    /// Whether the clock advances on update
    pub is_running: bool,
}

impl Timer {
    /// Create a stopped timer at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta_time` when running.
    ///
    /// Crossing the loop end wraps back into the loop region.
    pub fn update(&mut self, delta_time: f32, ruler: &Ruler) {
        if !self.is_running {
            return;
        }

        let end = ruler.loop_end();
        let was_inside = self.time <= end;
        self.time += delta_time;

        let length = ruler.loop_length();
        if was_inside && self.time > end {
            if length > 0.0 {
                let over = (self.time - end) % length;
                self.time = ruler.loop_start() + over;
            } else {
                self.time = ruler.loop_start();
            }
        }
    }

    /// Toggle between running and paused
    pub fn toggle(&mut self) {
        self.is_running = !self.is_running;
    }

    /// Stop and rewind to zero
    pub fn stop(&mut self) {
        self.is_running = false;
        self.time = 0.0;
    }

    /// Seek to a specific time
    pub fn seek(&mut self, time: f32) {
        self.time = time.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_timer_does_not_advance() {
        let mut timer = Timer::new();
        timer.update(1.0, &Ruler::default());
        assert_eq!(timer.time, 0.0);
    }

    #[test]
    fn test_wraps_inside_loop() {
        let mut ruler = Ruler::default();
        ruler.set_loop_range(1.0, 3.0);
        let mut timer = Timer { time: 2.5, is_running: true };
        timer.update(1.0, &ruler);
        assert!((timer.time - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_playing_past_loop_end_from_outside_keeps_going() {
        let mut ruler = Ruler::default();
        ruler.set_loop_range(1.0, 3.0);
        let mut timer = Timer { time: 5.0, is_running: true };
        timer.update(1.0, &ruler);
        assert_eq!(timer.time, 6.0);
    }

    #[test]
    fn test_toggle_and_stop() {
        let mut timer = Timer::new();
        timer.toggle();
        assert!(timer.is_running);
        timer.seek(4.0);
        timer.stop();
        assert!(!timer.is_running);
        assert_eq!(timer.time, 0.0);
    }
}
