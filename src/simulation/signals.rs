use std::collections::HashMap;

use super::{Point, SignalAxis, SignalColor, TravelDirection};
use crate::config::TrafficConfig;

/// Intersection grouping key: world coordinates rounded to the nearest
/// multiple of the intersection grid spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey(pub i32, pub i32);

impl GridKey {
    pub fn from_world(x: f32, z: f32, spacing: f32) -> Self {
        GridKey((x / spacing).round() as i32, (z / spacing).round() as i32)
    }
}

/// One traffic light head at an intersection corner. Color is rewritten by
/// the registry every tick; rendering binds it to visuals at draw time.
#[derive(Debug, Clone)]
pub struct TrafficLightFixture {
    pub position: Point,
    /// Yaw the housing faces, radians.
    pub rotation: f32,
    pub axis: SignalAxis,
    pub color: SignalColor,
    pub intersection: GridKey,
}

impl TrafficLightFixture {
    pub fn new(position: Point, rotation: f32, axis: SignalAxis, spacing: f32) -> Self {
        Self {
            intersection: GridKey::from_world(position.x, position.z, spacing),
            position,
            rotation,
            axis,
            color: SignalColor::Red,
        }
    }
}

/// Signal phase clock for one intersection. At any instant exactly one axis
/// runs the green/yellow progression while the other is held red; the tail
/// of every cycle is all-red.
#[derive(Debug, Clone)]
pub struct Intersection {
    pub key: GridKey,
    pub cycle_period: f32,
    pub elapsed: f32,
    pub ns_has_right_of_way: bool,
    /// Indices into the registry fixture list.
    members: Vec<usize>,
}

impl Intersection {
    fn new(key: GridKey, cycle_period: f32) -> Self {
        Self {
            key,
            cycle_period,
            elapsed: 0.0,
            ns_has_right_of_way: true,
            members: Vec::new(),
        }
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        // Carry the overshoot instead of resetting to zero so long-run phase
        // accounting stays exact under a fixed tick size.
        while self.elapsed >= self.cycle_period {
            self.elapsed -= self.cycle_period;
            self.ns_has_right_of_way = !self.ns_has_right_of_way;
        }
    }

    pub fn color_for(&self, axis: SignalAxis, green_fraction: f32, yellow_fraction: f32) -> SignalColor {
        let right_of_way = if self.ns_has_right_of_way {
            SignalAxis::NorthSouth
        } else {
            SignalAxis::EastWest
        };

        if axis != right_of_way {
            return SignalColor::Red;
        }

        let fraction = self.elapsed / self.cycle_period;
        if fraction < green_fraction {
            SignalColor::Green
        } else if fraction < yellow_fraction {
            SignalColor::Yellow
        } else {
            SignalColor::Red
        }
    }
}

/// Result of a nearest-signal approach test.
#[derive(Debug, Clone, Copy)]
pub struct SignalQuery {
    pub color: SignalColor,
    pub axis: SignalAxis,
    /// Ahead-distance along the travel axis to the intersection line.
    pub distance: f32,
    pub approaching: bool,
    pub intersection: GridKey,
}

/// Groups traffic light fixtures into grid-keyed intersections and evolves
/// each intersection's phase clock independently.
///
/// Nearest-signal lookups resolve through the grid key in O(1), so the
/// per-vehicle result cache the original recomputation cost would have
/// justified is deliberately absent.
pub struct IntersectionRegistry {
    grid_spacing: f32,
    cycle_period: f32,
    green_fraction: f32,
    yellow_fraction: f32,
    approach_distance: f32,
    fixtures: Vec<TrafficLightFixture>,
    intersections: HashMap<GridKey, Intersection>,
}

impl IntersectionRegistry {
    pub fn new(config: &TrafficConfig) -> Self {
        Self {
            grid_spacing: config.grid_spacing,
            cycle_period: config.cycle_period,
            green_fraction: config.green_fraction,
            yellow_fraction: config.yellow_fraction,
            approach_distance: config.approach_distance,
            fixtures: Vec::new(),
            intersections: HashMap::new(),
        }
    }

    /// Group fixtures into intersections by rounded grid coordinate.
    pub fn register(&mut self, fixtures: Vec<TrafficLightFixture>) {
        for mut fixture in fixtures {
            fixture.intersection =
                GridKey::from_world(fixture.position.x, fixture.position.z, self.grid_spacing);

            let index = self.fixtures.len();
            let intersection = self
                .intersections
                .entry(fixture.intersection)
                .or_insert_with(|| Intersection::new(fixture.intersection, self.cycle_period));
            intersection.members.push(index);

            self.fixtures.push(fixture);
        }

        log::debug!(
            "Registered {} fixtures across {} intersections",
            self.fixtures.len(),
            self.intersections.len()
        );
    }

    pub fn fixtures(&self) -> &[TrafficLightFixture] {
        &self.fixtures
    }

    pub fn intersections(&self) -> impl Iterator<Item = &Intersection> {
        self.intersections.values()
    }

    /// Current color of one axis at an intersection, if registered.
    pub fn color_at(&self, key: GridKey, axis: SignalAxis) -> Option<SignalColor> {
        self.intersections
            .get(&key)
            .map(|i| i.color_for(axis, self.green_fraction, self.yellow_fraction))
    }

    /// Advance every intersection clock and rewrite member fixture colors.
    pub fn tick(&mut self, dt: f32) {
        for intersection in self.intersections.values_mut() {
            intersection.advance(dt);

            for &index in &intersection.members {
                let fixture = &mut self.fixtures[index];
                fixture.color = intersection.color_for(
                    fixture.axis,
                    self.green_fraction,
                    self.yellow_fraction,
                );
            }
        }
    }

    /// Approach test for a vehicle traveling along an axis direction. Returns
    /// the representative signal for the relevant axis at the next
    /// grid-aligned intersection ahead, or None when no intersection is
    /// registered there or it carries no fixture on that axis.
    pub fn nearest_signal(&self, position: &Point, travel: TravelDirection) -> Option<SignalQuery> {
        let along = match travel.signal_axis() {
            SignalAxis::EastWest => position.x,
            SignalAxis::NorthSouth => position.z,
        };

        let line = (along / self.grid_spacing).round() * self.grid_spacing;
        let distance = (line - along) * travel.sign();
        if distance < 0.0 {
            // Nearest intersection line is behind the vehicle
            return None;
        }

        let key = GridKey::from_world(position.x, position.z, self.grid_spacing);
        let intersection = self.intersections.get(&key)?;

        let axis = travel.signal_axis();
        // All fixtures on the same axis share state; the first is enough.
        intersection
            .members
            .iter()
            .find(|&&i| self.fixtures[i].axis == axis)?;

        Some(SignalQuery {
            color: intersection.color_for(axis, self.green_fraction, self.yellow_fraction),
            axis,
            distance,
            approaching: distance < self.approach_distance,
            intersection: key,
        })
    }
}
