use super::Validate;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Domain extent along X, world units.
    pub width: f32,
    /// Domain extent along Z, world units.
    pub depth: f32,
    /// Multiplier applied to the combined noise/hill signal.
    pub vertical_scale: f32,
    /// Grid sample count per axis.
    pub resolution: usize,
    /// Seed for the noise generator. None means a random seed per session;
    /// tests must set this for deterministic height maps.
    pub seed: Option<u64>,
    /// Additive hill bumps in normalized [-0.5, 0.5] terrain coordinates.
    pub hills: Vec<HillConfig>,
    /// Road corridor flattening along the figure-eight centerline.
    pub corridor: CorridorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HillConfig {
    pub center_x: f32,
    pub center_z: f32,
    pub radius: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorridorConfig {
    /// Corridor half-width in normalized coordinates.
    pub width: f32,
    /// Blend strength toward the flattened height, in (0, 1].
    pub strength: f32,
    /// Figure-eight radii of the centerline, normalized coordinates.
    pub major_radius: f32,
    pub minor_radius: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            depth: 100.0,
            vertical_scale: 15.0,
            resolution: 64,
            seed: None,
            hills: vec![
                HillConfig {
                    center_x: -0.3,
                    center_z: -0.2,
                    radius: 0.2,
                    height: 1.0,
                },
                HillConfig {
                    center_x: 0.3,
                    center_z: 0.2,
                    radius: 0.25,
                    height: 0.8,
                },
            ],
            corridor: CorridorConfig::default(),
        }
    }
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            width: 0.07,
            strength: 0.8,
            major_radius: 0.3,
            minor_radius: 0.2,
        }
    }
}

impl Validate for TerrainConfig {
    fn validate(&self) -> Result<()> {
        if self.width <= 0.0 || self.depth <= 0.0 {
            return Err(anyhow!("Terrain domain extents must be positive"));
        }

        if self.vertical_scale <= 0.0 {
            return Err(anyhow!("Vertical scale must be positive"));
        }

        if self.resolution < 2 {
            return Err(anyhow!(
                "Terrain resolution must be at least 2, got {}",
                self.resolution
            ));
        }

        for hill in &self.hills {
            if hill.radius <= 0.0 {
                return Err(anyhow!("Hill radius must be positive"));
            }
        }

        let corridor = &self.corridor;
        if corridor.width <= 0.0 {
            return Err(anyhow!("Corridor width must be positive"));
        }

        if corridor.strength <= 0.0 || corridor.strength > 1.0 {
            return Err(anyhow!("Corridor strength must be in range (0, 1]"));
        }

        Ok(())
    }
}
