use super::Validate;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Spacing of the intersection grid; fixture positions are rounded to the
    /// nearest multiple of this when grouped into intersections.
    pub grid_spacing: f32,
    /// Full signal cycle period T, seconds.
    pub cycle_period: f32,
    /// Fraction of the cycle the right-of-way axis shows green.
    pub green_fraction: f32,
    /// Fraction of the cycle after which the right-of-way axis drops from
    /// yellow to red (all-red tail until the cycle wraps).
    pub yellow_fraction: f32,
    /// A vehicle is approaching an intersection when its ahead-distance along
    /// the travel axis is below this, world units.
    pub approach_distance: f32,
    /// Hard stop line distance for a red signal.
    pub stop_distance: f32,
    /// Deceleration window for a yellow signal.
    pub yellow_slowdown_distance: f32,
    /// Deceleration window for a red signal.
    pub red_slowdown_distance: f32,
    /// Fraction of cruise speed used when restarting from a stop on green.
    pub restart_factor: f32,
    /// Cruise speed range sampled per vehicle at creation, world units/s.
    pub cruise_speed_min: f32,
    pub cruise_speed_max: f32,
    /// Number of vehicles placed on the road loop at scene setup.
    pub vehicle_count: usize,
    /// Upper bound on the per-frame delta fed to the simulation, seconds.
    /// Prevents blow-up after a long stall (e.g. a backgrounded tab).
    pub max_dt: f32,
    /// Global speed multiplier applied to cruising vehicles.
    pub speed_multiplier: f32,
    /// Length of a full day/night cycle, seconds.
    pub day_cycle_seconds: f32,
    /// Seed for vehicle placement and styling. None means entropy-seeded.
    pub seed: Option<u64>,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            grid_spacing: 8.0,
            cycle_period: 20.0,
            green_fraction: 0.75,
            yellow_fraction: 0.85,
            approach_distance: 4.0,
            stop_distance: 1.5,
            yellow_slowdown_distance: 2.0,
            red_slowdown_distance: 3.0,
            restart_factor: 0.7,
            cruise_speed_min: 0.1,
            cruise_speed_max: 0.3,
            vehicle_count: 5,
            max_dt: 0.1,
            speed_multiplier: 1.0,
            day_cycle_seconds: 60.0,
            seed: None,
        }
    }
}

impl Validate for TrafficConfig {
    fn validate(&self) -> Result<()> {
        if self.grid_spacing <= 0.0 {
            return Err(anyhow!("Grid spacing must be positive"));
        }

        if self.cycle_period <= 0.0 {
            return Err(anyhow!("Cycle period must be positive"));
        }

        if self.green_fraction <= 0.0 || self.green_fraction >= 1.0 {
            return Err(anyhow!("Green fraction must be in range (0, 1)"));
        }

        if self.yellow_fraction <= self.green_fraction || self.yellow_fraction > 1.0 {
            return Err(anyhow!(
                "Yellow fraction must be in range (green_fraction, 1]"
            ));
        }

        if self.stop_distance <= 0.0 {
            return Err(anyhow!("Stop distance must be positive"));
        }

        if self.yellow_slowdown_distance <= self.stop_distance {
            return Err(anyhow!(
                "Yellow slowdown distance must exceed the stop distance"
            ));
        }

        if self.red_slowdown_distance <= self.yellow_slowdown_distance {
            return Err(anyhow!(
                "Red slowdown distance must exceed the yellow slowdown distance"
            ));
        }

        if self.approach_distance <= self.stop_distance {
            return Err(anyhow!(
                "Approach distance must exceed the stop distance"
            ));
        }

        if self.restart_factor <= 0.0 || self.restart_factor > 1.0 {
            return Err(anyhow!("Restart factor must be in range (0, 1]"));
        }

        if self.cruise_speed_min <= 0.0 || self.cruise_speed_max < self.cruise_speed_min {
            return Err(anyhow!(
                "Cruise speed range must be positive with min <= max"
            ));
        }

        if self.max_dt <= 0.0 {
            return Err(anyhow!("Max dt must be positive"));
        }

        if self.speed_multiplier <= 0.0 {
            return Err(anyhow!("Speed multiplier must be positive"));
        }

        if self.day_cycle_seconds <= 0.0 {
            return Err(anyhow!("Day cycle length must be positive"));
        }

        Ok(())
    }
}
