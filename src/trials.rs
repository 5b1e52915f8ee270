use crate::covariance::{estimate_covariance, MotionCovariance};
use crate::pose::{Increment, Pose2d};
use crate::simulator::{MotionModel, NoisyMotionSimulator};
use anyhow::Result;
use futures::future::try_join_all;
use serde::Deserialize;
use std::sync::Arc;
use tokio::task;
use tracing::info;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TrialsConfig {
    pub count: usize,
    #[serde(default)]
    pub base_seed: u64,
}

/// Repeated execution of one command sequence under motion noise.
#[derive(Debug, Clone)]
pub struct TrialRun {
    pub initial: Pose2d,
    pub increments: Vec<Increment>,
    pub covariance: MotionCovariance,
    pub trials: TrialsConfig,
}

fn run_single(
    initial: Pose2d,
    increments: &[Increment],
    covariance: MotionCovariance,
    seed: u64,
) -> Pose2d {
    let mut simulator = NoisyMotionSimulator::with_seed(initial, covariance, seed);
    for increment in increments {
        simulator.step(increment);
    }
    simulator.true_pose()
}

/// Runs every trial on its own blocking task and returns the final true poses
/// ordered by trial index. Trial `i` is seeded with `base_seed + i`.
pub async fn run_trials(run: TrialRun) -> Result<Vec<Pose2d>> {
    let increments: Arc<[Increment]> = run.increments.into();
    let handles = (0..run.trials.count).map(|trial| {
        let increments = Arc::clone(&increments);
        let seed = run.trials.base_seed.wrapping_add(trial as u64);
        let initial = run.initial;
        let covariance = run.covariance;
        task::spawn_blocking(move || run_single(initial, &increments, covariance, seed))
    });
    let endpoints = try_join_all(handles).await?;
    info!(trials = endpoints.len(), "Finished repeated trials");
    Ok(endpoints)
}

/// Runs the trials and estimates the covariance of their end poses.
pub async fn estimate_from_trials(run: TrialRun) -> Result<MotionCovariance> {
    let endpoints = run_trials(run).await?;
    Ok(estimate_covariance(&endpoints)?)
}
