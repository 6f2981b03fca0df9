//! Geometric primitives and intersection tests for sensing and collision.
//!
//! Coordinates follow screen conventions: `y` grows downwards, so a vehicle
//! with heading `0` faces `-y`.

use geo::{Coord, Line};

use super::error::{Result, SimulationError};

/// A point in the plane.
pub type Point = Coord<f32>;

/// A directed line segment, used for rays, road borders and polygon edges.
pub type Segment = Line<f32>;

/// Intersection of two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    /// Exact intersection point.
    pub point: Point,
    /// Normalized position of `point` along the first segment, in `[0, 1]`.
    pub offset: f32,
}

/// A closed polygon; the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon from at least three vertices.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() < 3 {
            return Err(SimulationError::DegeneratePolygon(points.len()));
        }
        Ok(Self { points })
    }

    /// Creates a quadrilateral. Always valid.
    pub fn quad(corners: [Point; 4]) -> Self {
        Self {
            points: corners.to_vec(),
        }
    }

    /// Vertices in order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Edges in vertex order, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Line::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Mean of the vertices.
    pub fn centroid(&self) -> Point {
        let n = self.points.len() as f32;
        let sum = self
            .points
            .iter()
            .fold(Coord { x: 0.0, y: 0.0 }, |acc, &p| acc + p);
        Coord {
            x: sum.x / n,
            y: sum.y / n,
        }
    }

    /// Largest distance from the centroid to any vertex.
    pub fn bounding_radius(&self) -> f32 {
        let c = self.centroid();
        self.points
            .iter()
            .map(|p| (p.x - c.x).hypot(p.y - c.y))
            .fold(0.0, f32::max)
    }
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn cross(a: Point, b: Point) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Intersects segment `a → b` with segment `c → d`.
///
/// Returns `None` for parallel segments or when the crossing lies outside
/// either segment. The returned offset is measured along `a → b`, so callers
/// can rank several hits on one ray without computing distances.
///
/// Whether a hit is reported does not depend on argument order: swapping the
/// two segments negates the denominator and swaps the numerators exactly.
pub fn intersect_segments(a: Point, b: Point, c: Point, d: Point) -> Option<Touch> {
    let r = b - a;
    let s = d - c;
    let denom = cross(r, s);
    if denom == 0.0 {
        return None;
    }

    let qp = c - a;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Touch {
            point: Coord {
                x: lerp(a.x, b.x, t),
                y: lerp(a.y, b.y, t),
            },
            offset: t,
        })
    } else {
        None
    }
}

/// Intersects two [`Segment`]s, offset measured along `first`.
#[inline]
pub fn intersect_lines(first: &Segment, second: &Segment) -> Option<Touch> {
    intersect_segments(first.start, first.end, second.start, second.end)
}

/// Even-odd ray casting test.
///
/// A point lying exactly on an edge may be reported either inside or outside.
pub fn point_in_polygon(point: Point, polygon: &Polygon) -> bool {
    let pts = polygon.points();
    let mut inside = false;
    let mut j = pts.len() - 1;

    for i in 0..pts.len() {
        let pi = pts[i];
        let pj = pts[j];
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Returns `true` if any pair of edges crosses, or if either polygon's first
/// vertex lies inside the other.
///
/// The containment check catches one polygon fully enclosed by the other,
/// where no edges cross.
pub fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool {
    let edges_cross = a
        .edges()
        .any(|ea| b.edges().any(|eb| intersect_lines(&ea, &eb).is_some()));

    edges_cross || point_in_polygon(a.points()[0], b) || point_in_polygon(b.points()[0], a)
}

/// Returns `true` if the segment crosses an edge of the polygon or starts
/// inside it.
pub fn polygon_intersects_segment(polygon: &Polygon, segment: &Segment) -> bool {
    polygon
        .edges()
        .any(|edge| intersect_lines(&edge, segment).is_some())
        || point_in_polygon(segment.start, polygon)
}
