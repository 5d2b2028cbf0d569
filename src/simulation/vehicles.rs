use nalgebra::Vector3;

use super::{
    IntersectionRegistry, Point, SignalColor, SimulationState, TravelDirection, Vec3, VehicleId,
};
use crate::config::TrafficConfig;
use crate::error::SimError;
use crate::road::RoadPath;

/// How a vehicle decides where to go next.
#[derive(Debug, Clone, Copy)]
pub enum Guidance {
    /// Straight travel along one of the four axis directions, with toroidal
    /// wraparound at the domain edges.
    Axis(TravelDirection),
    /// Waypoint-following along the road loop, by path point index.
    Route { index: usize },
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub position: Point,
    /// Unit direction of travel. For axis guidance this is fixed; for route
    /// guidance it is refreshed every tick from the current path segment.
    pub heading: Vec3,
    pub guidance: Guidance,
    pub speed: f32,
    pub cruise_speed: f32,
    pub stopped_at_signal: bool,
    /// Stable styling index for the renderer.
    pub color_index: usize,
}

impl Vehicle {
    /// Axis-bound vehicle for the grid traffic variant.
    pub fn axis_bound(
        id: VehicleId,
        position: Point,
        direction: TravelDirection,
        cruise_speed: f32,
        color_index: usize,
    ) -> Result<Self, SimError> {
        Self::with_heading(
            id,
            position,
            direction.unit(),
            Guidance::Axis(direction),
            cruise_speed,
            color_index,
        )
    }

    /// Route-bound vehicle starting at a path point index.
    pub fn route_bound(
        id: VehicleId,
        road: &RoadPath,
        start_index: usize,
        cruise_speed: f32,
        color_index: usize,
    ) -> Result<Self, SimError> {
        let points = road.points();
        let index = start_index % points.len();
        let next = (index + 1) % points.len();
        let heading = points[next].position - points[index].position;

        Self::with_heading(
            id,
            points[index].position,
            heading,
            Guidance::Route { index },
            cruise_speed,
            color_index,
        )
    }

    fn with_heading(
        id: VehicleId,
        position: Point,
        heading: Vec3,
        guidance: Guidance,
        cruise_speed: f32,
        color_index: usize,
    ) -> Result<Self, SimError> {
        let norm = heading.norm();
        if norm < 1e-6 {
            return Err(SimError::configuration(format!(
                "vehicle {} has a zero-length direction vector",
                id.0
            )));
        }

        if cruise_speed <= 0.0 {
            return Err(SimError::configuration(format!(
                "vehicle {} cruise speed must be positive",
                id.0
            )));
        }

        Ok(Self {
            id,
            position,
            heading: heading / norm,
            guidance,
            speed: cruise_speed,
            cruise_speed,
            stopped_at_signal: false,
            color_index,
        })
    }

    /// Yaw around +Y toward the heading, renderer convention.
    pub fn yaw(&self) -> f32 {
        self.heading.x.atan2(self.heading.z)
    }

    /// Pitch from the terrain slope the vehicle is climbing.
    pub fn pitch(&self) -> f32 {
        let up = Vector3::y();
        self.heading.dot(&up).clamp(-1.0, 1.0).acos() - std::f32::consts::FRAC_PI_2
    }
}

/// Advances vehicles along their guidance, applying stop/slow behavior near
/// signals. Must run after `IntersectionRegistry::tick` within a frame so the
/// colors it reads are current.
pub struct VehicleSimulator {
    stop_distance: f32,
    yellow_slowdown_distance: f32,
    red_slowdown_distance: f32,
    restart_factor: f32,
    half_width: f32,
    half_depth: f32,
}

impl VehicleSimulator {
    pub fn new(config: &TrafficConfig, domain_width: f32, domain_depth: f32) -> Self {
        Self {
            stop_distance: config.stop_distance,
            yellow_slowdown_distance: config.yellow_slowdown_distance,
            red_slowdown_distance: config.red_slowdown_distance,
            restart_factor: config.restart_factor,
            half_width: domain_width / 2.0,
            half_depth: domain_depth / 2.0,
        }
    }

    pub fn tick(
        &self,
        state: &mut SimulationState,
        road: Option<&RoadPath>,
        registry: &IntersectionRegistry,
        dt: f32,
        speed_multiplier: f32,
    ) {
        for vehicle in &mut state.vehicles {
            self.update_vehicle(vehicle, road, registry, dt, speed_multiplier);
        }
    }

    fn update_vehicle(
        &self,
        vehicle: &mut Vehicle,
        road: Option<&RoadPath>,
        registry: &IntersectionRegistry,
        dt: f32,
        speed_multiplier: f32,
    ) {
        // Refresh the heading first so route vehicles query the signal axis
        // they are actually traveling on.
        if let Guidance::Route { index } = vehicle.guidance {
            if let Some(road) = road {
                let points = road.points();
                let next = (index + 1) % points.len();
                let segment = points[next].position - vehicle.position;
                let norm = segment.norm();
                if norm > 1e-6 {
                    vehicle.heading = segment / norm;
                }
            }
        }

        vehicle.speed = self.resolve_speed(vehicle, registry, speed_multiplier);

        match vehicle.guidance {
            Guidance::Axis(direction) => {
                vehicle.position += direction.unit() * vehicle.speed * dt;
                self.wrap_position(&mut vehicle.position);
            }
            Guidance::Route { index } => {
                if let Some(road) = road {
                    let points = road.points();
                    let next = (index + 1) % points.len();

                    let step = vehicle.speed * dt;
                    vehicle.position += vehicle.heading * step;

                    // Waypoint arrival: advance the index once the remaining
                    // distance is smaller than this tick's movement.
                    let remaining = (points[next].position - vehicle.position).norm();
                    if remaining < step {
                        vehicle.guidance = Guidance::Route { index: next };
                    }
                }
            }
        }
    }

    fn resolve_speed(
        &self,
        vehicle: &mut Vehicle,
        registry: &IntersectionRegistry,
        speed_multiplier: f32,
    ) -> f32 {
        let travel = match vehicle.guidance {
            Guidance::Axis(direction) => direction,
            Guidance::Route { .. } => TravelDirection::dominant(&vehicle.heading),
        };

        let query = registry.nearest_signal(&vehicle.position, travel);
        let approaching = query.map(|q| q.approaching).unwrap_or(false);

        if approaching {
            let query = query.unwrap();
            match query.color {
                SignalColor::Red => {
                    if query.distance < self.stop_distance {
                        vehicle.stopped_at_signal = true;
                        return 0.0;
                    }
                    if query.distance < self.red_slowdown_distance {
                        let factor = (query.distance / self.red_slowdown_distance).clamp(0.0, 1.0);
                        return vehicle.cruise_speed * factor;
                    }
                }
                SignalColor::Yellow => {
                    if query.distance < self.yellow_slowdown_distance {
                        let factor =
                            (query.distance / self.yellow_slowdown_distance).clamp(0.0, 1.0);
                        return vehicle.cruise_speed * factor;
                    }
                }
                SignalColor::Green => {
                    if vehicle.stopped_at_signal {
                        // Soft restart from a standstill
                        vehicle.stopped_at_signal = false;
                        return self.restart_factor * vehicle.cruise_speed;
                    }
                }
            }
        } else if vehicle.stopped_at_signal {
            // Signal left behind or unregistered; release the stop.
            vehicle.stopped_at_signal = false;
        }

        vehicle.cruise_speed * speed_multiplier
    }

    /// Toroidal wraparound: leaving one domain edge re-enters from the
    /// opposite edge, avoiding despawn/respawn bookkeeping.
    fn wrap_position(&self, position: &mut Point) {
        if position.x > self.half_width {
            position.x = -self.half_width;
        } else if position.x < -self.half_width {
            position.x = self.half_width;
        }

        if position.z > self.half_depth {
            position.z = -self.half_depth;
        } else if position.z < -self.half_depth {
            position.z = self.half_depth;
        }
    }
}
