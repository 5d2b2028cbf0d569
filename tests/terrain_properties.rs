use cityscape_sim::config::TerrainConfig;
use cityscape_sim::error::SimError;
use cityscape_sim::terrain::HeightField;

fn seeded_config(seed: u64) -> TerrainConfig {
    TerrainConfig {
        seed: Some(seed),
        ..TerrainConfig::default()
    }
}

#[test]
fn height_is_deterministic_for_a_fixed_seed() {
    let config = seeded_config(42);

    let a = HeightField::generate(&config).unwrap();
    let b = HeightField::generate(&config).unwrap();

    assert_eq!(a.height_at(0.0, 0.0), b.height_at(0.0, 0.0));
    assert_eq!(a.height_at(17.3, -22.8), b.height_at(17.3, -22.8));

    // Different seed, different terrain
    let c = HeightField::generate(&seeded_config(43)).unwrap();
    assert_ne!(a.height_at(17.3, -22.8), c.height_at(17.3, -22.8));
}

#[test]
fn center_height_stays_within_vertical_scale() {
    // 100x100, scale 15, resolution 64
    let field = HeightField::generate(&seeded_config(42)).unwrap();

    let h = field.height_at(0.0, 0.0);
    assert!(h > -15.0 && h < 15.0, "height at origin out of range: {}", h);
}

#[test]
fn height_is_continuous_across_cell_boundaries() {
    let config = seeded_config(7);
    let field = HeightField::generate(&config).unwrap();

    let span = (config.resolution - 1) as f32;
    let cell = config.width / span;

    // Exact per-cell slope along X at a fixed grid row: bilinear
    // interpolation is linear between nodes, so adjacent node differences
    // bound any step across the cell edge.
    let row_z = 0.0;
    let node_x = |ix: usize| (ix as f32 / span - 0.5) * config.width;

    let mut max_slope = 0.0f32;
    for ix in 0..config.resolution - 1 {
        let dh = (field.height_at(node_x(ix + 1), row_z) - field.height_at(node_x(ix), row_z)).abs();
        max_slope = max_slope.max(dh / cell);
    }

    let eps = cell * 0.01;
    for ix in 1..config.resolution - 1 {
        let edge = node_x(ix);
        let before = field.height_at(edge - eps, row_z);
        let after = field.height_at(edge + eps, row_z);

        let bound = max_slope * 2.0 * eps + 1e-4;
        assert!(
            (after - before).abs() <= bound,
            "discontinuity at cell edge x={}: |{} - {}| > {}",
            edge,
            after,
            before,
            bound
        );
    }
}

#[test]
fn out_of_domain_queries_clamp_to_the_edge() {
    let field = HeightField::generate(&seeded_config(42)).unwrap();

    // Everything past the last cell resolves to the clamped corner sample
    assert_eq!(field.height_at(1000.0, 0.0), field.height_at(100.0, 0.0));
    assert_eq!(field.height_at(-1000.0, -1000.0), field.height_at(-100.0, -100.0));
}

#[test]
fn normals_are_unit_length_and_up_facing() {
    let field = HeightField::generate(&seeded_config(42)).unwrap();

    for &(x, z) in &[(0.0, 0.0), (10.0, -5.0), (-30.0, 20.0), (45.0, 45.0)] {
        let n = field.normal_at(x, z);
        assert!((n.norm() - 1.0).abs() < 1e-4);
        assert!(n.y > 0.0, "normal at ({}, {}) points down: {:?}", x, z, n);
    }
}

#[test]
fn invalid_construction_parameters_are_rejected() {
    let zero_width = TerrainConfig {
        width: 0.0,
        ..seeded_config(1)
    };
    assert!(matches!(
        HeightField::generate(&zero_width),
        Err(SimError::Configuration(_))
    ));

    let negative_depth = TerrainConfig {
        depth: -10.0,
        ..seeded_config(1)
    };
    assert!(matches!(
        HeightField::generate(&negative_depth),
        Err(SimError::Configuration(_))
    ));

    let coarse = TerrainConfig {
        resolution: 1,
        ..seeded_config(1)
    };
    assert!(matches!(
        HeightField::generate(&coarse),
        Err(SimError::Configuration(_))
    ));
}
