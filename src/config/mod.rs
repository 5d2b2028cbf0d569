use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod road;
pub mod terrain;
pub mod traffic;

pub use road::*;
pub use terrain::*;
pub use traffic::*;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub road: RoadConfig,
    #[serde(default)]
    pub traffic: TrafficConfig,
}

impl SceneConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SceneConfig = toml::from_str(&content)?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }
}

impl Validate for SceneConfig {
    fn validate(&self) -> Result<()> {
        self.terrain.validate()?;
        self.road.validate()?;
        self.traffic.validate()?;
        Ok(())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}
