//! Ray fan sensor - reports the nearest obstacle along each ray.
//!
//! Rays start at the vehicle center and spread symmetrically around its
//! heading. Each reading is the closest hit on a road border or on an edge of
//! another vehicle's footprint.

use geo::{Coord, Line};
use ndarray::Array1;

use super::super::error::{Result, SimulationError};
use super::super::geometry::{Point, Polygon, Segment, Touch, intersect_lines, lerp};

/// Ray fan attached to a single vehicle.
#[derive(Debug, Clone)]
pub struct Sensor {
    ray_count: usize,
    ray_length: f32,
    ray_spread: f32,
    rays: Vec<Segment>,
    readings: Vec<Option<Touch>>,
}

impl Sensor {
    /// Creates a sensor with `ray_count` rays of `ray_length` fanned over
    /// `ray_spread` radians.
    pub fn new(ray_count: usize, ray_length: f32, ray_spread: f32) -> Result<Self> {
        if ray_count == 0 {
            return Err(SimulationError::InvalidSensor("at least one ray is required"));
        }
        if ray_length.is_nan() || ray_length <= 0.0 {
            return Err(SimulationError::InvalidSensor("ray length must be positive"));
        }

        Ok(Self {
            ray_count,
            ray_length,
            ray_spread,
            rays: Vec::with_capacity(ray_count),
            readings: Vec::with_capacity(ray_count),
        })
    }

    /// Number of rays.
    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    /// Length of every ray.
    pub fn ray_length(&self) -> f32 {
        self.ray_length
    }

    /// Total fan width in radians.
    pub fn ray_spread(&self) -> f32 {
        self.ray_spread
    }

    /// Rays cast on the last update.
    pub fn rays(&self) -> &[Segment] {
        &self.rays
    }

    /// Nearest hit per ray on the last update.
    pub fn readings(&self) -> &[Option<Touch>] {
        &self.readings
    }

    /// Builds the ray fan for a vehicle at `origin` facing `heading`.
    ///
    /// Ray `i` points at `lerp(spread / 2, -spread / 2, i / (count - 1))`
    /// relative to the heading; a single ray points straight ahead.
    pub fn cast_rays(&self, origin: Point, heading: f32) -> Vec<Segment> {
        (0..self.ray_count)
            .map(|i| {
                let t = if self.ray_count == 1 {
                    0.5
                } else {
                    i as f32 / (self.ray_count - 1) as f32
                };
                let angle = lerp(self.ray_spread / 2.0, -self.ray_spread / 2.0, t) + heading;
                let end = Coord {
                    x: origin.x - angle.sin() * self.ray_length,
                    y: origin.y - angle.cos() * self.ray_length,
                };
                Line::new(origin, end)
            })
            .collect()
    }

    /// Nearest hit of every ray against borders and obstacle edges.
    pub fn read_all(
        rays: &[Segment],
        borders: &[Segment],
        obstacles: &[&Polygon],
    ) -> Vec<Option<Touch>> {
        rays.iter()
            .map(|ray| Self::read(ray, borders, obstacles))
            .collect()
    }

    /// Nearest hit of a single ray; the first candidate wins on equal offsets.
    pub fn read(ray: &Segment, borders: &[Segment], obstacles: &[&Polygon]) -> Option<Touch> {
        let border_hits = borders.iter().filter_map(|border| intersect_lines(ray, border));
        let obstacle_hits = obstacles
            .iter()
            .flat_map(|polygon| polygon.edges())
            .filter_map(|edge| intersect_lines(ray, &edge));

        border_hits
            .chain(obstacle_hits)
            .fold(None, |nearest: Option<Touch>, touch| match nearest {
                Some(best) if best.offset <= touch.offset => Some(best),
                _ => Some(touch),
            })
    }

    /// Re-casts the rays from the current pose and stores fresh readings.
    pub fn update(
        &mut self,
        origin: Point,
        heading: f32,
        borders: &[Segment],
        obstacles: &[&Polygon],
    ) {
        self.rays = self.cast_rays(origin, heading);
        self.readings = Self::read_all(&self.rays, borders, obstacles);
    }

    /// Network inputs: `1 - offset` per ray, so nearer obstacles give larger
    /// signals, and `0` where nothing was hit.
    pub fn signals(&self) -> Array1<f32> {
        let mut signals = Array1::zeros(self.ray_count);
        for (signal, reading) in signals.iter_mut().zip(&self.readings) {
            if let Some(touch) = reading {
                *signal = 1.0 - touch.offset;
            }
        }
        signals
    }
}
