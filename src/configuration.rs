use config::Config;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::*;

use crate::{
    covariance::MotionCovariance, driving::SquarePathConfig, laser::LaserConfig, pose::Pose2d,
    trials::TrialsConfig,
};

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub path: SquarePathConfig,
    #[serde(default)]
    pub trials: Option<TrialsConfig>,
    #[serde(default)]
    pub laser: Option<LaserScenarioConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SimulationConfig {
    #[serde(default)]
    pub initial_pose: Pose2d,
    /// Diagonal of the motion noise covariance.
    #[serde(default)]
    pub covariance: MotionCovariance,
    /// Fixed seed for reproducible runs. Entropy seeded when missing.
    #[serde(default)]
    pub seed: Option<u64>,
    pub steps: usize,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LaserScenarioConfig {
    pub sensor: LaserConfig,
    /// Map polyline as a list of [x, y] vertices.
    pub map: Vec<[f64; 2]>,
}

impl LaserScenarioConfig {
    pub fn map_points(&self) -> Vec<nalgebra::Point2<f64>> {
        self.map
            .iter()
            .map(|[x, y]| nalgebra::Point2::new(*x, *y))
            .collect()
    }
}

/// `APP_SIMULATION__STEPS=20` overrides `simulation.steps`.
fn environment_overrides() -> config::Environment {
    config::Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}

impl AppConfig {
    pub fn load_config(config: &Option<PathBuf>) -> anyhow::Result<Self> {
        let settings = if let Some(config) = config {
            info!("Using configuration from {:?}", config);
            Config::builder()
                .add_source(config::File::with_name(
                    config
                        .to_str()
                        .ok_or_else(|| anyhow::anyhow!("Failed to convert path"))?,
                ))
                .add_source(environment_overrides())
                .build()?
        } else {
            info!("Using default configuration");
            Config::builder()
                .add_source(config::File::with_name("config/settings"))
                .add_source(environment_overrides())
                .build()?
        };

        Ok(settings.try_deserialize()?)
    }
}
