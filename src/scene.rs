use anyhow::Result;
use nalgebra::{Point3, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{SceneConfig, Validate};
use crate::road::RoadPath;
use crate::simulation::{
    SignalAxis, SimulationEngine, SimulationState, TrafficLightFixture, Vehicle, VehicleId,
};
use crate::terrain::HeightField;

const TREE_COUNT: usize = 20;
const STREET_LIGHT_COUNT: usize = 10;
/// Trees are rejected closer than this to any road point.
const MIN_TREE_ROAD_DISTANCE: f32 = 5.0;
/// Street lights sit this far from the road centerline.
const STREET_LIGHT_OFFSET: f32 = 3.0;
/// Fixture offset from the intersection center to its corners.
const FIXTURE_OFFSET: f32 = 3.0;

/// Decorative prop placement for the renderer. Positions are terrain-sampled
/// at build time; the props have no simulation behavior.
#[derive(Debug, Clone)]
pub struct PropPlacement {
    pub kind: PropKind,
    pub position: Point3<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Tree,
    StreetLight,
}

/// A fully assembled city scene: terrain, road loop, signal-controlled
/// intersection, vehicles, and decorative props.
pub struct Scene {
    pub terrain: HeightField,
    pub road: RoadPath,
    pub engine: SimulationEngine,
    pub state: SimulationState,
    pub props: Vec<PropPlacement>,
}

impl Scene {
    pub fn build(config: &SceneConfig) -> Result<Scene> {
        // Programmatic configs get the same checks as file-loaded ones; a bad
        // traffic parameter must fail here, not misbehave mid-tick.
        config.validate()?;

        let terrain = HeightField::generate(&config.terrain)?;
        let road = RoadPath::generate(&terrain, &config.road)?;

        let mut rng = match config.traffic.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut engine = SimulationEngine::new(config, Some(road.clone()));
        engine
            .registry_mut()
            .register(intersection_fixtures(&road, config.traffic.grid_spacing));

        let mut state = SimulationState::new();
        for id in 0..config.traffic.vehicle_count {
            let start_index = rng.gen_range(0..road.points().len());
            let cruise_speed =
                rng.gen_range(config.traffic.cruise_speed_min..=config.traffic.cruise_speed_max);
            let color_index = rng.gen_range(0..8);

            let vehicle =
                Vehicle::route_bound(VehicleId(id), &road, start_index, cruise_speed, color_index)?;
            state.add_vehicle(vehicle);
        }

        let mut props = scatter_trees(&terrain, &road, &mut rng);
        props.extend(place_street_lights(&road, &mut rng));

        log::info!(
            "Built scene: {} road points, {} vehicles, {} props",
            road.points().len(),
            state.vehicles.len(),
            props.len()
        );

        Ok(Scene {
            terrain,
            road,
            engine,
            state,
            props,
        })
    }

    /// Advance the scene by one frame.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        self.engine.update(&mut self.state, dt)
    }
}

/// Four corner fixtures at the road's central intersection, one axis per
/// diagonal pair.
fn intersection_fixtures(road: &RoadPath, grid_spacing: f32) -> Vec<TrafficLightFixture> {
    let center = road.intersection();
    let d = FIXTURE_OFFSET;

    let corners = [
        (d, d, SignalAxis::NorthSouth, 0.0),
        (-d, -d, SignalAxis::NorthSouth, std::f32::consts::PI),
        (d, -d, SignalAxis::EastWest, std::f32::consts::FRAC_PI_2),
        (-d, d, SignalAxis::EastWest, -std::f32::consts::FRAC_PI_2),
    ];

    corners
        .iter()
        .map(|&(dx, dz, axis, rotation)| {
            TrafficLightFixture::new(
                Point3::new(center.x + dx, center.y, center.z + dz),
                rotation,
                axis,
                grid_spacing,
            )
        })
        .collect()
}

/// Scatter trees on the terrain, rejecting spots too close to the road.
fn scatter_trees(terrain: &HeightField, road: &RoadPath, rng: &mut StdRng) -> Vec<PropPlacement> {
    let mut props = Vec::new();

    for _ in 0..TREE_COUNT {
        let x = rng.gen_range(-40.0..40.0);
        let z = rng.gen_range(-40.0..40.0);

        let near_road = road.points().iter().any(|point| {
            let dx = point.position.x - x;
            let dz = point.position.z - z;
            (dx * dx + dz * dz).sqrt() < MIN_TREE_ROAD_DISTANCE
        });

        if !near_road {
            let y = terrain.height_at(x, z);
            props.push(PropPlacement {
                kind: PropKind::Tree,
                position: Point3::new(x, y, z),
            });
        }
    }

    props
}

/// Street lights beside random road points, offset perpendicular to the road
/// direction.
fn place_street_lights(road: &RoadPath, rng: &mut StdRng) -> Vec<PropPlacement> {
    let points = road.points();
    let mut props = Vec::new();

    for _ in 0..STREET_LIGHT_COUNT {
        let index = rng.gen_range(0..points.len());
        let point = &points[index];
        let next = &points[(index + 1) % points.len()];

        let direction = Vector2::new(
            next.position.x - point.position.x,
            next.position.z - point.position.z,
        )
        .normalize();
        let perpendicular = Vector2::new(-direction.y, direction.x);

        props.push(PropPlacement {
            kind: PropKind::StreetLight,
            position: Point3::new(
                point.position.x + perpendicular.x * STREET_LIGHT_OFFSET,
                point.position.y,
                point.position.z + perpendicular.y * STREET_LIGHT_OFFSET,
            ),
        });
    }

    props
}
