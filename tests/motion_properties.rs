use approx::{assert_abs_diff_eq, assert_relative_eq};
use robot_motion::{
    driving::{drive, SquarePath},
    estimate_covariance,
    visualization::TrajectoryRecorder,
    Increment, MotionCovariance, MotionError, MotionModel, MotionSimulator, NoisyMotionSimulator,
    Pose2d,
};
use std::f64::consts::{FRAC_PI_2, PI};

/// End poses of 20 executions of the same 3 m forward command.
///
/// Synthetic: generated around (3, 0, 0) and fitted so the per-axis population
/// variances equal diag(0.02342594, 0.03246639, 0.00212976).
const REPEATED_MOTION: [[f64; 3]; 20] = [
    [2.9777647288, 0.0512256307, -0.0357830333],
    [3.1146968215, -0.0367538438, 0.0155920483],
    [2.9830799115, 0.1051937627, 0.0244624773],
    [2.9672021974, -0.1860722806, -0.0690567002],
    [2.8574601622, 0.0520412183, 0.0060127979],
    [2.9853631280, 0.0734381093, 0.0673956037],
    [3.2218576738, -0.1908054642, -0.0946597193],
    [3.0991202408, 0.4048095396, -0.0120476096],
    [3.2084665703, 0.1141165802, -0.0015327930],
    [3.0678467459, 0.2744707993, -0.0362375775],
    [3.0938777033, -0.1805880922, 0.0279211905],
    [3.0565011574, -0.2104313415, 0.0006076675],
    [2.7261079649, -0.1114064114, -0.0678324070],
    [3.1760537791, -0.0519053619, 0.0440484002],
    [3.1137962090, 0.1330140080, 0.0363126409],
    [3.1124458599, 0.0369482196, 0.0498069448],
    [2.7215926435, -0.1372746419, 0.0739524615],
    [2.7122194503, -0.2648670955, 0.0213256551],
    [2.8646703292, -0.1556126857, 0.0094680342],
    [2.9398767231, 0.2804593510, -0.0597560822],
];

#[test]
fn identity_increment() {
    let pose = Pose2d::new(-3.5, 12.25, 2.0);
    assert_eq!(pose.compose(&Increment::zero()), pose);
}

#[test]
fn frame_relative_rotation() {
    let step = Increment::new(1.0, 0.0, FRAC_PI_2);
    let once = Pose2d::origin().compose(&step);
    assert_eq!(once, Pose2d::new(1.0, 0.0, FRAC_PI_2));
    let twice = once.compose(&step);
    assert_abs_diff_eq!(twice.x, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(twice.y, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(twice.theta, PI, epsilon = 1e-12);
}

#[test]
fn square_path_closes() {
    let start = Pose2d::new(0.0, 0.0, FRAC_PI_2);
    let mut robot = MotionSimulator::new(start);
    let path = SquarePath::default();
    let loop_length = path.loop_length();
    let mut recorder = TrajectoryRecorder::new();
    drive(&mut robot, path.take(loop_length), &mut recorder).unwrap();

    let end = robot.expected_pose();
    assert_abs_diff_eq!(end.x, start.x, epsilon = 1e-9);
    assert_abs_diff_eq!(end.y, start.y, epsilon = 1e-9);
    let rotation = (end.theta - start.theta) / FRAC_PI_2;
    assert_abs_diff_eq!(rotation, rotation.round(), epsilon = 1e-9);
    assert!(recorder
        .expected()
        .iter()
        .all(|pose| (-1e-9..=8.0 + 1e-9).contains(&pose.x)
            && (-1e-9..=8.0 + 1e-9).contains(&pose.y)));
}

#[test]
fn zero_covariance_is_deterministic_for_any_seed() {
    for seed in [0_u64, 7, 12345, 987654321] {
        let mut robot = NoisyMotionSimulator::with_seed(
            Pose2d::new(0.0, 0.0, FRAC_PI_2),
            MotionCovariance::zeros(),
            seed,
        );
        let mut recorder = TrajectoryRecorder::new();
        drive(&mut robot, SquarePath::default().take(15), &mut recorder).unwrap();
        assert_eq!(robot.true_pose(), robot.expected_pose());
        assert_eq!(recorder.true_poses(), recorder.expected());
    }
}

#[test]
fn covariance_worked_example() {
    let samples: Vec<Pose2d> = REPEATED_MOTION
        .iter()
        .map(|[x, y, theta]| Pose2d::new(*x, *y, *theta))
        .collect();
    let covariance = estimate_covariance(&samples).unwrap();
    let matrix = covariance.matrix();
    assert_abs_diff_eq!(matrix[(0, 0)], 0.02342594, epsilon = 1e-6);
    assert_abs_diff_eq!(matrix[(1, 1)], 0.03246639, epsilon = 1e-6);
    assert_abs_diff_eq!(matrix[(2, 2)], 0.00212976, epsilon = 1e-6);
    for row in 0..3 {
        for col in 0..3 {
            if row != col {
                assert_eq!(matrix[(row, col)], 0.0);
            }
        }
    }
}

#[test]
fn negative_variance_rejected() {
    assert!(matches!(
        MotionCovariance::new(-0.01, 0.04, 0.01),
        Err(MotionError::InvalidCovariance(_))
    ));
    assert!(matches!(
        NoisyMotionSimulator::from_variances(Pose2d::origin(), [-0.01, 0.04, 0.01], 1),
        Err(MotionError::InvalidCovariance(_))
    ));
}

#[test]
fn estimated_covariance_drives_simulator() {
    let samples: Vec<Pose2d> = REPEATED_MOTION
        .iter()
        .map(|[x, y, theta]| Pose2d::new(*x, *y, *theta))
        .collect();
    let covariance = estimate_covariance(&samples).unwrap();
    let mut robot = NoisyMotionSimulator::with_seed(Pose2d::origin(), covariance, 3);
    robot.step(&Increment::straight(3.0));
    assert_eq!(robot.expected_pose(), Pose2d::new(3.0, 0.0, 0.0));
    assert_relative_eq!(robot.true_pose().x, 3.0, epsilon = 1.0);
    assert_ne!(robot.true_pose(), robot.expected_pose());
}
