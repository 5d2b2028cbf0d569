use nalgebra::{Point3, Vector3};

use crate::config::RoadConfig;
use crate::error::SimError;
use crate::terrain::HeightField;

/// Positions closer than this are considered coincident when checking for
/// degenerate paths.
const DISTINCT_EPSILON: f32 = 1e-4;

/// One sample of the closed road loop.
#[derive(Debug, Clone)]
pub struct PathPoint {
    pub position: Point3<f32>,
    /// Unit tangent, averaged from the forward and backward differences so
    /// interpolation stays smooth through sharp curvature.
    pub tangent: Vector3<f32>,
    /// Terrain surface normal under the point, for road banking.
    pub normal: Vector3<f32>,
    /// Signed turn angle between the incoming and outgoing segments;
    /// positive for right turns, negative for left.
    pub curvature: f32,
    pub is_intersection: bool,
}

impl PathPoint {
    /// Bare point with no precomputed frame, for literal path construction.
    pub fn at(position: Point3<f32>) -> Self {
        Self {
            position,
            tangent: Vector3::zeros(),
            normal: Vector3::y(),
            curvature: 0.0,
            is_intersection: false,
        }
    }
}

/// Interpolated result of an arc-length query.
#[derive(Debug, Clone)]
pub struct PathSample {
    pub position: Point3<f32>,
    pub tangent: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub curvature: f32,
}

/// Closed parametric road path over a height field. The point sequence is
/// cyclic: the segment from the last sample back to sample 0 is part of the
/// loop for both generation and arc-length accumulation.
#[derive(Debug, Clone)]
pub struct RoadPath {
    points: Vec<PathPoint>,
    intersection: Point3<f32>,
    /// cumulative[i] is the arc length from point 0 to point i; one extra
    /// entry holds the total closed length.
    cumulative: Vec<f32>,
    total_length: f32,
}

impl RoadPath {
    /// Sample a figure-eight loop over the terrain.
    pub fn generate(terrain: &HeightField, config: &RoadConfig) -> Result<Self, SimError> {
        if config.samples < 3 {
            return Err(SimError::configuration(format!(
                "road needs at least 3 samples, got {}",
                config.samples
            )));
        }

        let intersection_y = terrain.height_at(0.0, 0.0) + config.clearance;
        let intersection = Point3::new(0.0, intersection_y, 0.0);
        let half_extent = config.intersection_half_extent;

        let n = config.samples;
        let mut positions = Vec::with_capacity(n);
        let mut normals = Vec::with_capacity(n);
        let mut intersection_flags = Vec::with_capacity(n);

        for i in 0..n {
            let t = (i as f32 / n as f32) * std::f32::consts::TAU;

            let x = t.sin() * config.major_radius * config.radius_scale;
            let z = (2.0 * t).sin() * config.minor_radius * config.radius_scale;

            let is_intersection = x.abs() < half_extent && z.abs() < half_extent;

            // Inside the flattened intersection region the road is pinned to
            // the intersection elevation instead of following the terrain.
            let y = if is_intersection {
                intersection_y
            } else {
                terrain.height_at(x, z) + config.clearance
            };

            positions.push(Point3::new(x, y, z));
            normals.push(terrain.normal_at(x, z));
            intersection_flags.push(is_intersection);
        }

        let tangents = compute_tangents(&positions);
        let curvatures = compute_curvatures(&positions);

        let points = (0..n)
            .map(|i| PathPoint {
                position: positions[i],
                tangent: tangents[i],
                normal: normals[i],
                curvature: curvatures[i],
                is_intersection: intersection_flags[i],
            })
            .collect();

        Self::from_points(points, intersection)
    }

    /// Build a path from an explicit point sequence, validating that the
    /// geometry is usable for arc-length queries.
    pub fn from_points(points: Vec<PathPoint>, intersection: Point3<f32>) -> Result<Self, SimError> {
        let distinct = count_distinct(&points);
        if distinct < 3 {
            return Err(SimError::degenerate(format!(
                "path has {} distinct points, need at least 3",
                distinct
            )));
        }

        let n = points.len();
        let mut cumulative = Vec::with_capacity(n + 1);
        let mut total = 0.0f32;
        cumulative.push(0.0);

        for i in 0..n {
            let next = (i + 1) % n;
            let segment = (points[next].position - points[i].position).norm();
            total += segment;
            cumulative.push(total);
        }

        if total <= DISTINCT_EPSILON {
            return Err(SimError::degenerate("path has zero total arc length"));
        }

        Ok(Self {
            points,
            intersection,
            cumulative,
            total_length: total,
        })
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn intersection(&self) -> Point3<f32> {
        self.intersection
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Interpolated sample at an arc-length distance from point 0. The
    /// distance wraps modulo the total closed length, so any finite input is
    /// valid.
    pub fn point_at_distance(&self, distance: f32) -> PathSample {
        let target = distance.rem_euclid(self.total_length);
        let n = self.points.len();

        for i in 0..n {
            let segment_start = self.cumulative[i];
            let segment_end = self.cumulative[i + 1];

            if segment_end >= target {
                let segment_length = segment_end - segment_start;
                let factor = if segment_length > 0.0 {
                    (target - segment_start) / segment_length
                } else {
                    0.0
                };

                let a = &self.points[i];
                let b = &self.points[(i + 1) % n];
                return lerp_sample(a, b, factor);
            }
        }

        // Unreachable for target < total_length; cover rounding at the seam.
        sample_of(&self.points[0])
    }
}

fn compute_tangents(positions: &[Point3<f32>]) -> Vec<Vector3<f32>> {
    let n = positions.len();
    let mut tangents = Vec::with_capacity(n);

    for i in 0..n {
        let next = (i + 1) % n;
        let prev = (i + n - 1) % n;

        let forward = (positions[next] - positions[i]).normalize();
        let backward = (positions[i] - positions[prev]).normalize();

        tangents.push((forward + backward).normalize());
    }

    tangents
}

fn compute_curvatures(positions: &[Point3<f32>]) -> Vec<f32> {
    let n = positions.len();
    let mut curvatures = Vec::with_capacity(n);

    for i in 0..n {
        let next = (i + 1) % n;
        let prev = (i + n - 1) % n;

        let incoming = positions[i] - positions[prev];
        let outgoing = positions[next] - positions[i];

        let angle = incoming.angle(&outgoing);
        let cross = incoming.cross(&outgoing);

        // The vertical cross component gives the turn direction
        curvatures.push(angle * cross.y.signum());
    }

    curvatures
}

fn count_distinct(points: &[PathPoint]) -> usize {
    let mut distinct: Vec<Point3<f32>> = Vec::new();

    for point in points {
        let known = distinct
            .iter()
            .any(|p| (point.position - p).norm() < DISTINCT_EPSILON);
        if !known {
            distinct.push(point.position);
        }
    }

    distinct.len()
}

fn lerp_sample(a: &PathPoint, b: &PathPoint, factor: f32) -> PathSample {
    PathSample {
        position: a.position + (b.position - a.position) * factor,
        tangent: a.tangent + (b.tangent - a.tangent) * factor,
        normal: a.normal + (b.normal - a.normal) * factor,
        curvature: a.curvature + (b.curvature - a.curvature) * factor,
    }
}

fn sample_of(point: &PathPoint) -> PathSample {
    PathSample {
        position: point.position,
        tangent: point.tangent,
        normal: point.normal,
        curvature: point.curvature,
    }
}
