#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evo_drive::simulation::geometry::Polygon;
use evo_drive::simulation::road::Road;
use evo_drive::simulation::spatial::ObstacleIndex;
use evo_drive::simulation::stats::{FitnessHistory, GenerationRecord};
use geo::Coord;

fn square(cx: f32, cy: f32, half: f32) -> Polygon {
    Polygon::quad([
        Coord {
            x: cx - half,
            y: cy - half,
        },
        Coord {
            x: cx + half,
            y: cy - half,
        },
        Coord {
            x: cx + half,
            y: cy + half,
        },
        Coord {
            x: cx - half,
            y: cy + half,
        },
    ])
}

#[test]
fn test_road_layout() {
    let road = Road::new(200.0, 300.0, 3, 1000.0);

    assert_eq!(road.left, 50.0);
    assert_eq!(road.right, 350.0);
    assert_eq!(road.top, -1000.0);
    assert_eq!(road.bottom, 1000.0);
    assert_eq!(road.lane_width(), 100.0);
    assert_eq!(road.lane_center(0), 100.0);
    assert_eq!(road.lane_center(1), 200.0);
    assert_eq!(road.lane_center(2), 300.0);
    // past the last lane
    assert_eq!(road.lane_center(7), 300.0);

    let borders = road.borders();
    assert_eq!(borders.len(), 2);
    assert_eq!(borders[0].start.x, 50.0);
    assert_eq!(borders[1].end.x, 350.0);
    assert_eq!(borders[0].start.y, -1000.0);
    assert_eq!(borders[0].end.y, 1000.0);
}

#[test]
fn test_nearby_obstacles() {
    let footprints = vec![
        square(0.0, 0.0, 10.0),
        square(500.0, 0.0, 10.0),
        square(0.0, -90.0, 10.0),
    ];
    let index = ObstacleIndex::build(&footprints);

    let near = index.nearby(Coord { x: 0.0, y: 0.0 }, 100.0);
    assert_eq!(near.len(), 2);
    // snapshot order is kept
    assert_eq!(near[0], &footprints[0]);
    assert_eq!(near[1], &footprints[2]);

    let far = index.nearby(Coord { x: 1000.0, y: 1000.0 }, 100.0);
    assert!(far.is_empty());
    assert_eq!(index.footprints().len(), 3);
}

#[test]
fn test_reach_covers_obstacle_extent() {
    // centroid is 105 away, but the near edge is within 100
    let footprints = vec![square(0.0, -105.0, 10.0)];
    let index = ObstacleIndex::build(&footprints);

    assert_eq!(index.nearby(Coord { x: 0.0, y: 0.0 }, 100.0).len(), 1);
}

#[test]
fn test_empty_snapshot() {
    let footprints: Vec<Polygon> = Vec::new();
    let index = ObstacleIndex::build(&footprints);

    assert!(index.nearby(Coord { x: 0.0, y: 0.0 }, 100.0).is_empty());
}

#[test]
fn test_fitness_history() {
    let mut history = FitnessHistory {
        max_history: 3,
        ..FitnessHistory::default()
    };
    assert!(history.is_empty());
    assert_eq!(history.best_fitness(), None);
    assert_eq!(history.recent_mean_best(5), 0.0);

    for (generation, best) in [10.0, 40.0, 20.0, 30.0].into_iter().enumerate() {
        history.record(GenerationRecord {
            generation: generation as u32,
            best_fitness: best,
            mean_fitness: best / 2.0,
        });
    }

    assert_eq!(history.len(), 3);
    assert_eq!(history.latest().unwrap().generation, 3);
    assert_eq!(history.best_fitness(), Some(40.0));
    assert_eq!(history.recent_mean_best(2), 25.0);
}
