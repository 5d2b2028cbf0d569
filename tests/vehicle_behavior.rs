use nalgebra::Point3;

use cityscape_sim::config::TrafficConfig;
use cityscape_sim::error::SimError;
use cityscape_sim::road::{PathPoint, RoadPath};
use cityscape_sim::simulation::{
    Guidance, IntersectionRegistry, SignalAxis, SimulationState, TrafficLightFixture,
    TravelDirection, Vehicle, VehicleId, VehicleSimulator,
};

fn corner_fixtures(spacing: f32) -> Vec<TrafficLightFixture> {
    vec![
        TrafficLightFixture::new(
            Point3::new(3.0, 0.0, 3.0),
            0.0,
            SignalAxis::NorthSouth,
            spacing,
        ),
        TrafficLightFixture::new(
            Point3::new(-3.0, 0.0, -3.0),
            std::f32::consts::PI,
            SignalAxis::NorthSouth,
            spacing,
        ),
        TrafficLightFixture::new(
            Point3::new(3.0, 0.0, -3.0),
            std::f32::consts::FRAC_PI_2,
            SignalAxis::EastWest,
            spacing,
        ),
        TrafficLightFixture::new(
            Point3::new(-3.0, 0.0, 3.0),
            -std::f32::consts::FRAC_PI_2,
            SignalAxis::EastWest,
            spacing,
        ),
    ]
}

/// Registry with one intersection at the origin. With a very long cycle the
/// north-south axis holds green (right of way) and east-west holds red.
fn setup(cycle_period: f32) -> (TrafficConfig, IntersectionRegistry, VehicleSimulator) {
    let config = TrafficConfig {
        cycle_period,
        cruise_speed_min: 1.0,
        cruise_speed_max: 6.0,
        ..TrafficConfig::default()
    };

    let mut registry = IntersectionRegistry::new(&config);
    registry.register(corner_fixtures(config.grid_spacing));

    let simulator = VehicleSimulator::new(&config, 100.0, 100.0);
    (config, registry, simulator)
}

#[test]
fn red_axis_vehicle_stops_before_the_stop_line() {
    let (config, registry, simulator) = setup(1000.0);

    let mut state = SimulationState::new();
    // Eastbound toward the red east-west signal
    state.add_vehicle(
        Vehicle::axis_bound(
            VehicleId(0),
            Point3::new(-3.9, 0.0, 0.0),
            TravelDirection::East,
            6.0,
            0,
        )
        .unwrap(),
    );
    // Northbound on the green north-south axis
    state.add_vehicle(
        Vehicle::axis_bound(
            VehicleId(1),
            Point3::new(0.0, 0.0, 3.9),
            TravelDirection::North,
            6.0,
            1,
        )
        .unwrap(),
    );

    let dt = 0.05;
    for _ in 0..200 {
        simulator.tick(&mut state, None, &registry, dt, 1.0);

        // The green-axis vehicle never slows below cruise
        let green_vehicle = state.get_vehicle(VehicleId(1)).unwrap();
        assert_eq!(green_vehicle.speed, 6.0);
        assert!(!green_vehicle.stopped_at_signal);
    }

    let stopped = state.get_vehicle(VehicleId(0)).unwrap();
    assert!(stopped.stopped_at_signal);
    assert_eq!(stopped.speed, 0.0);

    // Came to rest between the slowdown window and the stop line
    let distance_to_line = -stopped.position.x;
    assert!(
        distance_to_line > 0.0 && distance_to_line <= config.stop_distance,
        "vehicle rested {} from the line",
        distance_to_line
    );
}

#[test]
fn stopped_vehicle_resumes_softly_on_green() {
    let (config, mut registry, simulator) = setup(10.0);

    let mut state = SimulationState::new();
    state.add_vehicle(
        Vehicle::axis_bound(
            VehicleId(0),
            Point3::new(-3.9, 0.0, 0.0),
            TravelDirection::East,
            6.0,
            0,
        )
        .unwrap(),
    );

    // Run up to the red light and stop
    let dt = 0.05;
    for _ in 0..100 {
        simulator.tick(&mut state, None, &registry, dt, 1.0);
    }
    assert!(state.vehicles[0].stopped_at_signal);
    assert_eq!(state.vehicles[0].speed, 0.0);

    // Advance the signal clock past the wrap: east-west takes right of way
    registry.tick(10.0);

    simulator.tick(&mut state, None, &registry, dt, 1.0);
    let vehicle = &state.vehicles[0];
    assert!(!vehicle.stopped_at_signal);
    assert!((vehicle.speed - config.restart_factor * 6.0).abs() < 1e-5);
}

#[test]
fn speed_stays_within_bounds() {
    let (_, mut registry, simulator) = setup(10.0);

    let mut state = SimulationState::new();
    state.add_vehicle(
        Vehicle::axis_bound(
            VehicleId(0),
            Point3::new(-40.0, 0.0, 0.0),
            TravelDirection::East,
            4.0,
            0,
        )
        .unwrap(),
    );

    let multiplier = 1.5;
    let dt = 0.05;
    for _ in 0..2000 {
        registry.tick(dt);
        simulator.tick(&mut state, None, &registry, dt, multiplier);

        let speed = state.vehicles[0].speed;
        assert!(speed >= 0.0, "negative speed {}", speed);
        assert!(speed <= 4.0 * multiplier + 1e-5, "speed {} over bound", speed);
    }
}

#[test]
fn vehicles_wrap_around_the_domain() {
    let (_, registry, simulator) = setup(1000.0);

    let mut state = SimulationState::new();
    state.add_vehicle(
        Vehicle::axis_bound(
            VehicleId(0),
            Point3::new(49.9, 0.0, 20.0),
            TravelDirection::East,
            5.0,
            0,
        )
        .unwrap(),
    );

    simulator.tick(&mut state, None, &registry, 0.1, 1.0);
    assert!(
        (state.vehicles[0].position.x - (-50.0)).abs() < 1e-4,
        "expected wrap to the west edge, got x = {}",
        state.vehicles[0].position.x
    );
}

#[test]
fn route_vehicles_advance_their_waypoint_index() {
    let (_, registry, simulator) = setup(1000.0);

    let points = vec![
        PathPoint::at(Point3::new(20.0, 0.0, 20.0)),
        PathPoint::at(Point3::new(30.0, 0.0, 20.0)),
        PathPoint::at(Point3::new(30.0, 0.0, 30.0)),
        PathPoint::at(Point3::new(20.0, 0.0, 30.0)),
    ];
    let road = RoadPath::from_points(points, Point3::new(25.0, 0.0, 25.0)).unwrap();

    let mut state = SimulationState::new();
    state.add_vehicle(Vehicle::route_bound(VehicleId(0), &road, 0, 2.0, 0).unwrap());

    let dt = 0.25;
    for _ in 0..30 {
        simulator.tick(&mut state, Some(&road), &registry, dt, 1.0);
    }

    // 15 units of travel passes the first waypoint and turns the corner
    let vehicle = &state.vehicles[0];
    match vehicle.guidance {
        Guidance::Route { index } => assert!(index >= 1, "index still {}", index),
        _ => panic!("route vehicle lost its guidance"),
    }
    assert!(vehicle.position.z > 20.0, "vehicle never turned the corner");
}

#[test]
fn orientation_follows_the_heading() {
    let vehicle = Vehicle::axis_bound(
        VehicleId(0),
        Point3::new(0.0, 0.0, 0.0),
        TravelDirection::East,
        1.0,
        0,
    )
    .unwrap();

    // East is +X, so yaw is a quarter turn; level ground means zero pitch
    assert!((vehicle.yaw() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    assert!(vehicle.pitch().abs() < 1e-5);
}

#[test]
fn degenerate_direction_is_rejected_at_creation() {
    let points = vec![
        PathPoint::at(Point3::new(0.0, 0.0, 0.0)),
        PathPoint::at(Point3::new(0.0, 0.0, 0.0)),
        PathPoint::at(Point3::new(10.0, 0.0, 0.0)),
        PathPoint::at(Point3::new(10.0, 0.0, 10.0)),
        PathPoint::at(Point3::new(0.0, 0.0, 10.0)),
    ];
    let road = RoadPath::from_points(points, Point3::origin()).unwrap();

    // Starting on the zero-length segment yields a degenerate heading
    assert!(matches!(
        Vehicle::route_bound(VehicleId(0), &road, 0, 1.0, 0),
        Err(SimError::Configuration(_))
    ));
}
