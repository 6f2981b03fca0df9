#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::f32::consts::PI;

use evo_drive::simulation::error::SimulationError;
use evo_drive::simulation::geometry::{Point, Polygon, Segment};
use evo_drive::simulation::vehicle::Sensor;
use geo::{Coord, Line};

fn pt(x: f32, y: f32) -> Point {
    Coord { x, y }
}

/// Horizontal wall at `y`, wide enough to cross any ray fired up the `y` axis.
fn wall(y: f32) -> Segment {
    Line::new(pt(-50.0, y), pt(50.0, y))
}

fn square(cx: f32, cy: f32, half: f32) -> Polygon {
    Polygon::quad([
        pt(cx - half, cy - half),
        pt(cx + half, cy - half),
        pt(cx + half, cy + half),
        pt(cx - half, cy + half),
    ])
}

#[test]
fn test_single_ray_points_along_heading() {
    let sensor = Sensor::new(1, 100.0, PI / 2.0).unwrap();
    let rays = sensor.cast_rays(pt(0.0, 0.0), 0.0);

    assert_eq!(rays.len(), 1);
    assert_eq!(rays[0].start, pt(0.0, 0.0));
    assert_eq!(rays[0].end, pt(0.0, -100.0));
}

#[test]
fn test_heading_rotates_the_fan() {
    let sensor = Sensor::new(1, 100.0, PI / 2.0).unwrap();
    let ray = sensor.cast_rays(pt(10.0, 10.0), PI / 2.0)[0];

    // heading pi/2 faces -x
    assert!((ray.end.x - (10.0 - 100.0)).abs() < 1e-3);
    assert!((ray.end.y - 10.0).abs() < 1e-3);
}

#[test]
fn test_fan_runs_from_left_to_right() {
    let sensor = Sensor::new(3, 100.0, PI / 2.0).unwrap();
    let rays = sensor.cast_rays(pt(0.0, 0.0), 0.0);
    let side = 100.0 * (PI / 4.0).sin();

    assert!((rays[0].end.x + side).abs() < 1e-3);
    assert_eq!(rays[1].end, pt(0.0, -100.0));
    assert!((rays[2].end.x - side).abs() < 1e-3);
    assert!((rays[0].end.y - rays[2].end.y).abs() < 1e-4);
}

#[test]
fn test_border_ahead_reads_distance_over_length() {
    let mut sensor = Sensor::new(1, 100.0, PI / 2.0).unwrap();
    let d = 40.0;
    sensor.update(pt(0.0, 0.0), 0.0, &[wall(-d)], &[]);

    let touch = sensor.readings()[0].expect("wall is within reach");
    assert!((touch.offset - d / 100.0).abs() < 1e-6);
    assert!((touch.point.y + d).abs() < 1e-4);
    assert!((sensor.signals()[0] - 0.6).abs() < 1e-6);
}

#[test]
fn test_nearest_hit_wins() {
    let mut sensor = Sensor::new(1, 100.0, 0.0).unwrap();
    sensor.update(pt(0.0, 0.0), 0.0, &[wall(-80.0), wall(-30.0)], &[]);

    let touch = sensor.readings()[0].unwrap();
    assert!((touch.offset - 0.3).abs() < 1e-6);
}

#[test]
fn test_obstacle_edges_are_sensed() {
    let mut sensor = Sensor::new(1, 100.0, 0.0).unwrap();
    let car = square(0.0, -60.0, 10.0);
    sensor.update(pt(0.0, 0.0), 0.0, &[wall(-90.0)], &[&car]);

    // near edge of the square at y = -50
    let touch = sensor.readings()[0].unwrap();
    assert!((touch.offset - 0.5).abs() < 1e-6);
}

#[test]
fn test_nothing_in_reach_gives_zero_signal() {
    let mut sensor = Sensor::new(3, 100.0, PI / 2.0).unwrap();
    sensor.update(pt(0.0, 0.0), 0.0, &[wall(-500.0)], &[]);

    assert_eq!(sensor.rays().len(), 3);
    assert!(sensor.readings().iter().all(Option::is_none));
    assert!(sensor.signals().iter().all(|&s| s == 0.0));
}

#[test]
fn test_closer_obstacle_gives_larger_signal() {
    let mut near = Sensor::new(1, 100.0, 0.0).unwrap();
    let mut far = near.clone();
    near.update(pt(0.0, 0.0), 0.0, &[wall(-10.0)], &[]);
    far.update(pt(0.0, 0.0), 0.0, &[wall(-90.0)], &[]);

    assert!(near.signals()[0] > far.signals()[0]);
    assert!(far.signals()[0] > 0.0);
}

#[test]
fn test_readings_are_deterministic() {
    let sensor = Sensor::new(5, 100.0, PI / 2.0).unwrap();
    let rays = sensor.cast_rays(pt(0.0, 0.0), 0.3);
    let borders = [wall(-40.0), wall(-40.0)];
    let car = square(20.0, -40.0, 15.0);

    let first = Sensor::read_all(&rays, &borders, &[&car]);
    let second = Sensor::read_all(&rays, &borders, &[&car]);
    assert_eq!(first, second);
}

#[test]
fn test_invalid_configuration() {
    assert!(matches!(
        Sensor::new(0, 100.0, 1.0),
        Err(SimulationError::InvalidSensor(_))
    ));
    assert!(matches!(
        Sensor::new(3, 0.0, 1.0),
        Err(SimulationError::InvalidSensor(_))
    ));
    assert!(matches!(
        Sensor::new(3, f32::NAN, 1.0),
        Err(SimulationError::InvalidSensor(_))
    ));
}
