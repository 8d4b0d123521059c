// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ruler model: loop region and horizontal viewport.

use serde::{Deserialize, Deserializer, Serialize};

/// Smallest allowed zoom (pixels per second)
pub const MIN_ZOOM: f32 = 5.0;
/// Largest allowed zoom (pixels per second)
pub const MAX_ZOOM: f32 = 2000.0;

/// One edge of the loop region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopEdge {
    /// Loop start marker
    Start,
    /// Loop end marker
    End,
}

/// Ruler state shared by all tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruler {
    /// Loop start in seconds
    loop_start: f32,
    /// Loop end in seconds
    loop_end: f32,
    /// Time at the left edge of the view
    pub view_start: f32,
    /// Horizontal zoom level
    #[serde(deserialize_with = "deserialize_zoom")]
    pixels_per_second: f32,
}

/// Clamp a zoom level into `MIN_ZOOM..=MAX_ZOOM`; NaN falls back to `MIN_ZOOM`
fn clamp_zoom(pixels_per_second: f32) -> f32 {
    if pixels_per_second.is_nan() {
        MIN_ZOOM
    } else {
        pixels_per_second.clamp(MIN_ZOOM, MAX_ZOOM)
    }
}

fn deserialize_zoom<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    f32::deserialize(deserializer).map(clamp_zoom)
}

impl Ruler {
    /// Create a ruler with a loop over the first ten seconds
    pub fn new(pixels_per_second: f32) -> Self {
        Self {
            loop_start: 0.0,
            loop_end: 10.0,
            view_start: 0.0,
            pixels_per_second: clamp_zoom(pixels_per_second),
        }
    }

    /// Horizontal zoom in pixels per second
    pub fn pixels_per_second(&self) -> f32 {
        self.pixels_per_second
    }

    /// Set the zoom, clamped to `MIN_ZOOM..=MAX_ZOOM`
    pub fn set_pixels_per_second(&mut self, pixels_per_second: f32) {
        self.pixels_per_second = clamp_zoom(pixels_per_second);
    }

    /// Loop start in seconds
    pub fn loop_start(&self) -> f32 {
        self.loop_start
    }

    /// Loop end in seconds
    pub fn loop_end(&self) -> f32 {
        self.loop_end
    }

    /// Time of one loop edge
    pub fn loop_edge(&self, edge: LoopEdge) -> f32 {
        match edge {
            LoopEdge::Start => self.loop_start,
            LoopEdge::End => self.loop_end,
        }
    }

    /// Move one loop edge. The edges never cross and never go below zero.
    pub fn set_loop_edge(&mut self, edge: LoopEdge, time: f32) {
        let time = time.max(0.0);
        match edge {
            LoopEdge::Start => self.loop_start = time.min(self.loop_end),
            LoopEdge::End => self.loop_end = time.max(self.loop_start),
        }
    }

    /// Set both loop edges
    pub fn set_loop_range(&mut self, start: f32, end: f32) {
        let start = start.max(0.0);
        self.loop_start = start;
        self.loop_end = end.max(start);
    }

    /// Length of the loop region
    pub fn loop_length(&self) -> f32 {
        self.loop_end - self.loop_start
    }

    /// Convert time to x position
    pub fn time_to_x(&self, time: f32) -> f32 {
        (time - self.view_start) * self.pixels_per_second
    }

    /// Convert x position to time
    pub fn x_to_time(&self, x: f32) -> f32 {
        x / self.pixels_per_second + self.view_start
    }

    /// Convert a horizontal pixel distance to a duration
    pub fn x_to_duration(&self, dx: f32) -> f32 {
        dx / self.pixels_per_second
    }

    /// Shift the view by a pixel delta (dragging right moves back in time)
    pub fn pan(&mut self, dx: f32) {
        self.view_start -= self.x_to_duration(dx);
    }
}

impl Default for Ruler {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_edges_never_cross() {
        let mut ruler = Ruler::default();
        ruler.set_loop_range(2.0, 4.0);
        ruler.set_loop_edge(LoopEdge::Start, 6.0);
        assert_eq!(ruler.loop_start(), 4.0);
        ruler.set_loop_edge(LoopEdge::End, 1.0);
        assert_eq!(ruler.loop_end(), 4.0);
        ruler.set_loop_edge(LoopEdge::Start, -3.0);
        assert_eq!(ruler.loop_start(), 0.0);
    }

    #[test]
    fn test_time_x_conversion() {
        let mut ruler = Ruler::new(50.0);
        assert_eq!(ruler.time_to_x(2.0), 100.0);
        ruler.pan(-100.0);
        assert_eq!(ruler.view_start, 2.0);
        assert_eq!(ruler.x_to_time(0.0), 2.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut ruler = Ruler::new(0.0);
        assert_eq!(ruler.pixels_per_second(), MIN_ZOOM);

        ruler.set_pixels_per_second(f32::NAN);
        assert_eq!(ruler.pixels_per_second(), MIN_ZOOM);
        ruler.set_pixels_per_second(f32::INFINITY);
        assert_eq!(ruler.pixels_per_second(), MAX_ZOOM);
        ruler.set_pixels_per_second(-20.0);
        assert_eq!(ruler.pixels_per_second(), MIN_ZOOM);
        assert!(ruler.x_to_time(100.0).is_finite());
    }

    #[test]
    fn test_deserialized_zoom_is_clamped() {
        let ruler: Ruler =
            ron::from_str("(loop_start: 0.0, loop_end: 10.0, view_start: 0.0, pixels_per_second: 0.0)").unwrap();
        assert_eq!(ruler.pixels_per_second(), MIN_ZOOM);
    }
}
