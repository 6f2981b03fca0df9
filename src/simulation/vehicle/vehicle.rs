//! Vehicle state, kinematics and collision.
//!
//! A vehicle integrates a simple friction/acceleration model, derives its
//! rectangular footprint from its pose and becomes permanently damaged as soon
//! as that footprint touches a road border or another vehicle.

use std::f32::consts::PI;

use geo::Coord;
use serde::{Deserialize, Serialize};

use super::super::brain::{Brain, COMMAND_WIDTH};
use super::super::error::{Result, SimulationError};
use super::super::geometry::{
    Point, Polygon, Segment, polygon_intersects_segment, polygons_intersect,
};
use super::controls::{ControlMode, Controls};
use super::sensor::Sensor;

/// Physical extent of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Extent across the heading.
    pub width: f32,
    /// Extent along the heading.
    pub height: f32,
}

impl Body {
    /// Distance from the center to any corner.
    pub fn half_diagonal(&self) -> f32 {
        self.width.hypot(self.height) / 2.0
    }
}

/// Per-tick motion constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    /// Speed gained per tick of throttle.
    pub acceleration: f32,
    /// Speed lost per tick toward zero.
    pub friction: f32,
    /// Forward speed cap; reverse is capped at half of it.
    pub max_speed: f32,
    /// Heading change per tick of steering, in radians.
    pub turn_rate: f32,
}

/// A simulated vehicle.
///
/// The pose and score fields are public for renderers and tests. Writing to
/// them bypasses the kinematics; callers must not touch a damaged vehicle,
/// which is otherwise frozen.
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Index within its cohort or traffic list.
    pub id: usize,
    /// Center position.
    pub pos: Point,
    /// Heading in radians; `0` faces `-y`.
    pub angle: f32,
    /// Signed scalar speed; negative when reversing.
    pub speed: f32,
    /// Distance driven so far (sum of `|speed|` per tick).
    pub fitness: f32,
    body: Body,
    kinematics: Kinematics,
    control: ControlMode,
    damaged: bool,
    polygon: Polygon,
}

impl Vehicle {
    /// Creates a vehicle facing `-y` at rest.
    ///
    /// Learned control is rejected unless the network reads one input per
    /// sensor ray and produces one output per command.
    pub fn new(
        id: usize,
        pos: Point,
        body: Body,
        kinematics: Kinematics,
        control: ControlMode,
    ) -> Result<Self> {
        if !(body.width > 0.0 && body.height > 0.0) {
            return Err(SimulationError::InvalidParam {
                name: "vehicle_width/vehicle_height",
                reason: "must be positive",
            });
        }
        if let ControlMode::Learned { sensor, brain, .. } = &control {
            if brain.input_size() != sensor.ray_count() {
                return Err(SimulationError::SensorMismatch {
                    expected: brain.input_size(),
                    found: sensor.ray_count(),
                });
            }
            if brain.output_size() != COMMAND_WIDTH {
                return Err(SimulationError::OutputWidth {
                    expected: COMMAND_WIDTH,
                    found: brain.output_size(),
                });
            }
        }

        Ok(Self::assemble(id, pos, body, kinematics, control))
    }

    /// Creates a network-driven vehicle.
    pub fn learned(
        id: usize,
        pos: Point,
        body: Body,
        kinematics: Kinematics,
        sensor: Sensor,
        brain: Brain,
    ) -> Result<Self> {
        Self::new(
            id,
            pos,
            body,
            kinematics,
            ControlMode::Learned {
                sensor,
                brain,
                commands: Controls::default(),
            },
        )
    }

    /// Creates a sensorless vehicle that always drives forward.
    pub fn dummy(id: usize, pos: Point, body: Body, kinematics: Kinematics) -> Result<Self> {
        Self::new(id, pos, body, kinematics, ControlMode::Fixed(Controls::FORWARD))
    }

    /// Builds a vehicle whose sensor and network shapes are already known to
    /// agree, e.g. offspring of a validated parent.
    pub(crate) fn assemble(
        id: usize,
        pos: Point,
        body: Body,
        kinematics: Kinematics,
        control: ControlMode,
    ) -> Self {
        let mut vehicle = Self {
            id,
            pos,
            angle: 0.0,
            speed: 0.0,
            fitness: 0.0,
            body,
            kinematics,
            control,
            damaged: false,
            polygon: Polygon::quad([pos; 4]),
        };
        vehicle.polygon = vehicle.footprint();
        vehicle
    }

    /// Whether the vehicle has crashed. Terminal once `true`.
    pub fn is_damaged(&self) -> bool {
        self.damaged
    }

    /// Footprint computed on the last update.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Physical extent.
    pub fn body(&self) -> Body {
        self.body
    }

    /// Motion constants.
    pub fn kinematics(&self) -> Kinematics {
        self.kinematics
    }

    /// Control source.
    pub fn control(&self) -> &ControlMode {
        &self.control
    }

    /// Commands applied on the last update (or preset for manual/fixed control).
    pub fn controls(&self) -> Controls {
        self.control.commands()
    }

    /// Sensor, present only for learned control.
    pub fn sensor(&self) -> Option<&Sensor> {
        match &self.control {
            ControlMode::Learned { sensor, .. } => Some(sensor),
            _ => None,
        }
    }

    /// Network, present only for learned control.
    pub fn brain(&self) -> Option<&Brain> {
        match &self.control {
            ControlMode::Learned { brain, .. } => Some(brain),
            _ => None,
        }
    }

    /// Replaces the commands of a manually driven vehicle.
    ///
    /// Returns `false` and changes nothing for any other control mode.
    pub fn set_controls(&mut self, controls: Controls) -> bool {
        match &mut self.control {
            ControlMode::Manual(current) => {
                *current = controls;
                true
            }
            _ => false,
        }
    }

    /// How far from its current center this vehicle can sense or touch
    /// anything during the next [`Vehicle::update`].
    ///
    /// Rays are cast before moving, while damage is assessed after moving at
    /// most `max_speed`, so the footprint term includes one tick of travel.
    pub fn reach(&self) -> f32 {
        let sight = self.sensor().map_or(0.0, Sensor::ray_length);
        sight.max(self.body.half_diagonal() + self.kinematics.max_speed)
    }

    /// Advances the vehicle by one tick.
    ///
    /// `obstacles` are other vehicles' footprints from the previous tick. A
    /// damaged vehicle is left untouched.
    pub fn update(&mut self, borders: &[Segment], obstacles: &[&Polygon]) {
        if self.damaged {
            return;
        }

        let controls = self.decide(borders, obstacles);
        self.apply_motion(controls);
        self.polygon = self.footprint();
        self.damaged = self.assess_damage(borders, obstacles);
    }

    fn decide(&mut self, borders: &[Segment], obstacles: &[&Polygon]) -> Controls {
        let (pos, angle) = (self.pos, self.angle);
        match &mut self.control {
            ControlMode::Learned {
                sensor,
                brain,
                commands,
            } => {
                sensor.update(pos, angle, borders, obstacles);
                *commands = Controls::from_outputs(&brain.feed_forward(&sensor.signals()));
                *commands
            }
            mode => mode.commands(),
        }
    }

    fn apply_motion(&mut self, controls: Controls) {
        let k = self.kinematics;

        if controls.forward {
            self.speed += k.acceleration;
        }
        if controls.reverse {
            self.speed -= k.acceleration;
        }

        if self.speed > k.max_speed {
            self.speed = k.max_speed;
        }
        if self.speed < -k.max_speed / 2.0 {
            self.speed = -k.max_speed / 2.0;
        }

        if self.speed > 0.0 {
            self.speed -= k.friction;
        } else if self.speed < 0.0 {
            self.speed += k.friction;
        }
        if self.speed.abs() < k.friction {
            self.speed = 0.0;
        }

        // reversing inverts the steering sense
        if self.speed != 0.0 {
            let flip = if self.speed > 0.0 { 1.0 } else { -1.0 };
            if controls.left {
                self.angle += k.turn_rate * flip;
            }
            if controls.right {
                self.angle -= k.turn_rate * flip;
            }
        }

        self.pos.x -= self.angle.sin() * self.speed;
        self.pos.y -= self.angle.cos() * self.speed;
        self.fitness += self.speed.abs();
    }

    /// Oriented rectangle for the current pose.
    pub fn footprint(&self) -> Polygon {
        let rad = self.body.half_diagonal();
        let alpha = self.body.width.atan2(self.body.height);
        let corner = |theta: f32| Coord {
            x: self.pos.x - theta.sin() * rad,
            y: self.pos.y - theta.cos() * rad,
        };

        Polygon::quad([
            corner(self.angle - alpha),
            corner(self.angle + alpha),
            corner(PI + self.angle - alpha),
            corner(PI + self.angle + alpha),
        ])
    }

    fn assess_damage(&self, borders: &[Segment], obstacles: &[&Polygon]) -> bool {
        borders
            .iter()
            .any(|border| polygon_intersects_segment(&self.polygon, border))
            || obstacles
                .iter()
                .any(|other| polygons_intersect(&self.polygon, other))
    }
}
