use anyhow::Result;
use nalgebra::{Point3, Vector3};

use crate::config::SceneConfig;
use crate::road::RoadPath;

pub mod day;
pub mod race;
pub mod signals;
pub mod vehicles;

pub use day::*;
pub use race::*;
pub use signals::*;
pub use vehicles::*;

pub type Vec3 = Vector3<f32>;
pub type Point = Point3<f32>;

/// Current color of one signal axis at an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalColor {
    Red,
    Yellow,
    Green,
}

/// One of the two perpendicular travel directions controlled independently at
/// an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalAxis {
    NorthSouth,
    EastWest,
}

/// Axis-aligned travel direction. North is -Z, east is +X, matching the
/// renderer's ground-plane convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelDirection {
    North,
    South,
    East,
    West,
}

impl TravelDirection {
    pub fn unit(self) -> Vec3 {
        match self {
            TravelDirection::North => Vector3::new(0.0, 0.0, -1.0),
            TravelDirection::South => Vector3::new(0.0, 0.0, 1.0),
            TravelDirection::East => Vector3::new(1.0, 0.0, 0.0),
            TravelDirection::West => Vector3::new(-1.0, 0.0, 0.0),
        }
    }

    pub fn signal_axis(self) -> SignalAxis {
        match self {
            TravelDirection::North | TravelDirection::South => SignalAxis::NorthSouth,
            TravelDirection::East | TravelDirection::West => SignalAxis::EastWest,
        }
    }

    /// Sign of motion along the travel axis coordinate.
    pub fn sign(self) -> f32 {
        match self {
            TravelDirection::South | TravelDirection::East => 1.0,
            TravelDirection::North | TravelDirection::West => -1.0,
        }
    }

    /// Dominant axis-aligned direction of an arbitrary heading, used to pick
    /// the relevant signal axis for path-following vehicles.
    pub fn dominant(heading: &Vec3) -> Self {
        if heading.x.abs() >= heading.z.abs() {
            if heading.x >= 0.0 {
                TravelDirection::East
            } else {
                TravelDirection::West
            }
        } else if heading.z >= 0.0 {
            TravelDirection::South
        } else {
            TravelDirection::North
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleId(pub usize);

/// Mutable per-frame simulation state, owned by the caller and updated once
/// per tick. The rendering layer reads it after the tick completes.
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    pub vehicles: Vec<Vehicle>,
    pub time: f32,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicles.push(vehicle);
    }

    pub fn get_vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn stopped_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.stopped_at_signal).count()
    }
}

/// Frame-driven simulation driver. Signal clocks are always advanced before
/// vehicles read them, so stop/go decisions see the current frame's colors.
pub struct SimulationEngine {
    registry: IntersectionRegistry,
    simulator: VehicleSimulator,
    day: DayCycle,
    road: Option<RoadPath>,
    max_dt: f32,
    pub speed_multiplier: f32,
}

impl SimulationEngine {
    pub fn new(config: &SceneConfig, road: Option<RoadPath>) -> Self {
        let traffic = &config.traffic;

        Self {
            registry: IntersectionRegistry::new(traffic),
            simulator: VehicleSimulator::new(traffic, config.terrain.width, config.terrain.depth),
            day: DayCycle::new(traffic.day_cycle_seconds),
            road,
            max_dt: traffic.max_dt,
            speed_multiplier: traffic.speed_multiplier,
        }
    }

    pub fn registry(&self) -> &IntersectionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut IntersectionRegistry {
        &mut self.registry
    }

    pub fn day(&self) -> &DayCycle {
        &self.day
    }

    pub fn road(&self) -> Option<&RoadPath> {
        self.road.as_ref()
    }

    /// Advance the whole simulation by one frame. The delta is clamped to the
    /// configured maximum so a stalled host loop cannot blow up the
    /// integration.
    pub fn update(&mut self, state: &mut SimulationState, dt: f32) -> Result<()> {
        let dt = dt.clamp(0.0, self.max_dt);

        self.day.advance(dt);
        self.registry.tick(dt);
        self.simulator.tick(
            state,
            self.road.as_ref(),
            &self.registry,
            dt,
            self.speed_multiplier,
        );

        state.time += dt;
        Ok(())
    }
}
