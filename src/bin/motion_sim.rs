use anyhow::Result;
use clap::Parser;
use robot_motion::{
    configuration::AppConfig,
    driving::{drive, SquarePath},
    laser::Laser2d,
    logging,
    noise::NoiseGenerator,
    simulator::{MotionModel, NoisyMotionSimulator},
    trials::{estimate_from_trials, TrialRun, TrialsConfig},
    visualization::JsonLinesSink,
};
use std::{io, path::PathBuf};
use tracing::*;

#[derive(Parser, Debug)]
#[command(version, about = "Noisy square path motion simulator")]
struct Args {
    /// path to config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sets the level of verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbosity: u8,

    /// overrides the configured noise seed
    #[arg(long)]
    seed: Option<u64>,

    /// overrides the configured number of steps
    #[arg(long)]
    steps: Option<usize>,

    /// number of repeated trials used to estimate motion covariance
    #[arg(long)]
    trials: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::setup_tracing(args.verbosity);

    let app_config = AppConfig::load_config(&args.config)?;
    let simulation = &app_config.simulation;
    let steps = args.steps.unwrap_or(simulation.steps);

    let seed = args.seed.or(simulation.seed);
    let noise = match seed {
        Some(seed) => {
            info!(seed, "Using seeded motion noise");
            NoiseGenerator::seeded(seed)
        }
        None => NoiseGenerator::from_entropy(),
    };
    let mut robot =
        NoisyMotionSimulator::new(simulation.initial_pose, simulation.covariance, noise);
    let increments: Vec<_> = SquarePath::new(app_config.path).take(steps).collect();

    {
        let stdout = io::stdout();
        let mut sink = JsonLinesSink::new(stdout.lock());
        drive(&mut robot, increments.iter().copied(), &mut sink)?;
    }
    info!(
        "Finished {} steps, expected {} true {}",
        steps,
        robot.expected_pose(),
        robot.true_pose()
    );

    let trials = args
        .trials
        .map(|count| TrialsConfig {
            count,
            base_seed: app_config.trials.map(|t| t.base_seed).unwrap_or_default(),
        })
        .or(app_config.trials);
    if let Some(trials) = trials {
        let run = TrialRun {
            initial: simulation.initial_pose,
            increments,
            covariance: simulation.covariance,
            trials,
        };
        let estimate = estimate_from_trials(run).await?;
        let variances = estimate.variances();
        info!(
            trials = trials.count,
            var_x = variances.x,
            var_y = variances.y,
            var_theta = variances.z,
            "Estimated end pose covariance"
        );
    }

    if let Some(scenario) = &app_config.laser {
        let mut laser = Laser2d::new(&scenario.sensor)?;
        laser.follow(&robot.true_pose());
        let mut sensor_noise = seed
            .map(NoiseGenerator::seeded)
            .unwrap_or_else(NoiseGenerator::from_entropy);
        let readings = laser.take_observation(&scenario.map_points(), &mut sensor_noise);
        for reading in &readings {
            let point = reading.to_world(&laser.pose());
            debug!(
                range = reading.range,
                angle = reading.angle,
                x = point.x,
                y = point.y,
                "Laser reading"
            );
        }
        info!(beams = readings.len(), pose = %laser.pose(), "Took laser observation");
    }

    Ok(())
}
