use super::Validate;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoadConfig {
    /// Number of samples around the closed figure-eight loop.
    pub samples: usize,
    /// Main figure-eight radius, world units.
    pub major_radius: f32,
    /// Secondary (crossing) radius, world units.
    pub minor_radius: f32,
    /// Scale applied to both radii to keep the loop inside the terrain domain.
    pub radius_scale: f32,
    /// Height offset of the road surface above the terrain.
    pub clearance: f32,
    /// Half extent of the box around the intersection center within which
    /// path points are flagged and pinned to the intersection elevation.
    pub intersection_half_extent: f32,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            samples: 100,
            major_radius: 35.0,
            minor_radius: 15.0,
            radius_scale: 0.6,
            clearance: 0.1,
            intersection_half_extent: 5.0,
        }
    }
}

impl Validate for RoadConfig {
    fn validate(&self) -> Result<()> {
        if self.samples < 3 {
            return Err(anyhow!(
                "Road needs at least 3 samples, got {}",
                self.samples
            ));
        }

        if self.major_radius <= 0.0 || self.minor_radius <= 0.0 {
            return Err(anyhow!("Road radii must be positive"));
        }

        if self.radius_scale <= 0.0 {
            return Err(anyhow!("Radius scale must be positive"));
        }

        if self.intersection_half_extent <= 0.0 {
            return Err(anyhow!("Intersection half extent must be positive"));
        }

        Ok(())
    }
}
