//! Straight multi-lane road running along the `y` axis.

use geo::{Coord, Line};

use super::geometry::Segment;

/// A vertical road with a left and a right border.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    /// Horizontal center of the road.
    pub x: f32,
    /// Total width between the borders.
    pub width: f32,
    /// Number of lanes.
    pub lane_count: usize,
    /// `x` of the left border.
    pub left: f32,
    /// `x` of the right border.
    pub right: f32,
    /// `y` where the road starts (far ahead).
    pub top: f32,
    /// `y` where the road ends (far behind).
    pub bottom: f32,
    borders: Vec<Segment>,
}

impl Road {
    /// Creates a road centered on `x` that extends `length` in both `y`
    /// directions.
    pub fn new(x: f32, width: f32, lane_count: usize, length: f32) -> Self {
        let left = x - width / 2.0;
        let right = x + width / 2.0;
        let top = -length;
        let bottom = length;

        let borders = vec![
            Line::new(Coord { x: left, y: top }, Coord { x: left, y: bottom }),
            Line::new(Coord { x: right, y: top }, Coord { x: right, y: bottom }),
        ];

        Self {
            x,
            width,
            lane_count,
            left,
            right,
            top,
            bottom,
            borders,
        }
    }

    /// Border segments, left then right.
    pub fn borders(&self) -> &[Segment] {
        &self.borders
    }

    /// Width of a single lane.
    pub fn lane_width(&self) -> f32 {
        self.width / self.lane_count as f32
    }

    /// `x` at the center of lane `index`; indices past the last lane map to
    /// the last lane.
    pub fn lane_center(&self, index: usize) -> f32 {
        let last = self.lane_count.saturating_sub(1);
        self.left + self.lane_width() / 2.0 + index.min(last) as f32 * self.lane_width()
    }
}
