use nalgebra::Vector3;
use noise::{NoiseFn, Perlin};

use crate::config::{HillConfig, TerrainConfig};
use crate::error::SimError;

/// Sampling step for forward-difference normal estimation, world units.
const NORMAL_DELTA: f32 = 0.5;

/// Procedural height field over a bounded rectangular domain. Heights are
/// seeded once at construction and immutable afterwards; queries outside the
/// domain clamp to the nearest edge sample.
#[derive(Debug, Clone)]
pub struct HeightField {
    width: f32,
    depth: f32,
    vertical_scale: f32,
    resolution: usize,
    samples: Vec<f32>,
    seed: u32,
}

impl HeightField {
    pub fn generate(config: &TerrainConfig) -> Result<Self, SimError> {
        if config.width <= 0.0 || config.depth <= 0.0 {
            return Err(SimError::configuration(format!(
                "terrain extents must be positive, got {}x{}",
                config.width, config.depth
            )));
        }

        if config.vertical_scale <= 0.0 {
            return Err(SimError::configuration(
                "terrain vertical scale must be positive",
            ));
        }

        if config.resolution < 2 {
            return Err(SimError::configuration(format!(
                "terrain resolution must be at least 2, got {}",
                config.resolution
            )));
        }

        let seed = config
            .seed
            .map(|s| s as u32)
            .unwrap_or_else(rand::random::<u32>);
        let perlin = Perlin::new(seed);

        let resolution = config.resolution;
        let mut samples = vec![0.0f32; resolution * resolution];

        for iz in 0..resolution {
            for ix in 0..resolution {
                // Normalize coordinates to -0.5 .. 0.5
                let nx = ix as f32 / resolution as f32 - 0.5;
                let nz = iz as f32 / resolution as f32 - 0.5;

                // Three octaves at increasing frequency, decreasing amplitude
                let mut h = octave(&perlin, nx, nz, 1.5) * 0.5
                    + octave(&perlin, nx, nz, 3.0) * 0.25
                    + octave(&perlin, nx, nz, 6.0) * 0.125;

                for hill in &config.hills {
                    h += hill_bump(nx, nz, hill);
                }

                // Flatten a corridor along the road centerline
                h = flatten_corridor(h, nx, nz, config);

                samples[iz * resolution + ix] = h * config.vertical_scale;
            }
        }

        log::debug!(
            "Generated {}x{} height field (seed {})",
            resolution,
            resolution,
            seed
        );

        Ok(Self {
            width: config.width,
            depth: config.depth,
            vertical_scale: config.vertical_scale,
            resolution,
            samples,
            seed,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn vertical_scale(&self) -> f32 {
        self.vertical_scale
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Bilinearly interpolated height at world coordinates. Out-of-domain
    /// queries clamp to the nearest grid cell rather than fail.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let span = (self.resolution - 1) as f32;
        let gx = ((x / self.width) + 0.5) * span;
        let gz = ((z / self.depth) + 0.5) * span;

        // Clamp the base cell so the +1 neighbor stays in range
        let ix0 = (gx.floor() as isize).clamp(0, self.resolution as isize - 2) as usize;
        let iz0 = (gz.floor() as isize).clamp(0, self.resolution as isize - 2) as usize;
        let ix1 = ix0 + 1;
        let iz1 = iz0 + 1;

        let wx = (gx - ix0 as f32).clamp(0.0, 1.0);
        let wz = (gz - iz0 as f32).clamp(0.0, 1.0);

        let h00 = self.sample(ix0, iz0);
        let h10 = self.sample(ix1, iz0);
        let h01 = self.sample(ix0, iz1);
        let h11 = self.sample(ix1, iz1);

        let h0 = h00 * (1.0 - wx) + h10 * wx;
        let h1 = h01 * (1.0 - wx) + h11 * wx;

        h0 * (1.0 - wz) + h1 * wz
    }

    /// Unit surface normal from forward-difference tangents. Up-facing for
    /// flat terrain, matching the renderer's unrotated ground plane.
    pub fn normal_at(&self, x: f32, z: f32) -> Vector3<f32> {
        let h_center = self.height_at(x, z);
        let h_right = self.height_at(x + NORMAL_DELTA, z);
        let h_forward = self.height_at(x, z + NORMAL_DELTA);

        let tangent_x = Vector3::new(NORMAL_DELTA, h_right - h_center, 0.0).normalize();
        let tangent_z = Vector3::new(0.0, h_forward - h_center, NORMAL_DELTA).normalize();

        tangent_z.cross(&tangent_x).normalize()
    }

    fn sample(&self, ix: usize, iz: usize) -> f32 {
        self.samples[iz * self.resolution + ix]
    }
}

fn octave(perlin: &Perlin, nx: f32, nz: f32, frequency: f32) -> f32 {
    perlin.get([(nx * frequency) as f64, (nz * frequency) as f64]) as f32
}

/// Radially symmetric bump with a raised-cosine falloff inside the radius.
fn hill_bump(nx: f32, nz: f32, hill: &HillConfig) -> f32 {
    let dx = nx - hill.center_x;
    let dz = nz - hill.center_z;
    let distance = (dx * dx + dz * dz).sqrt();

    if distance < hill.radius {
        let falloff = 0.5 * (1.0 + (std::f32::consts::PI * distance / hill.radius).cos());
        falloff * hill.height
    } else {
        0.0
    }
}

/// Blend the height toward a flat road surface near the figure-eight
/// centerline, full strength at the center, fading to zero at the corridor
/// edge.
fn flatten_corridor(h: f32, nx: f32, nz: f32, config: &TerrainConfig) -> f32 {
    let corridor = &config.corridor;

    let t = nz.atan2(nx);
    let path_x = t.sin() * corridor.major_radius;
    let path_z = (2.0 * t).sin() * corridor.minor_radius;

    let dx = nx - path_x;
    let dz = nz - path_z;
    let distance = (dx * dx + dz * dz).sqrt();

    if distance < corridor.width {
        let smooth = 1.0 - distance / corridor.width;
        let blend = smooth * corridor.strength;
        h * (1.0 - blend) // road target height is 0
    } else {
        h
    }
}
