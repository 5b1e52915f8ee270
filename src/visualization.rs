use crate::pose::Pose2d;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseStyle {
    Expected,
    True,
}

impl PoseStyle {
    pub fn color(&self) -> &'static str {
        match self {
            PoseStyle::Expected => "red",
            PoseStyle::True => "blue",
        }
    }
}

/// Drawing surface for robot poses. Rendering is left to the implementor.
pub trait PoseSink {
    fn draw(&mut self, pose: &Pose2d, style: PoseStyle) -> Result<()>;
}

/// Keeps every drawn pose in memory.
#[derive(Debug, Default, Clone)]
pub struct TrajectoryRecorder {
    expected: Vec<Pose2d>,
    true_poses: Vec<Pose2d>,
}

impl TrajectoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected(&self) -> &[Pose2d] {
        &self.expected
    }

    pub fn true_poses(&self) -> &[Pose2d] {
        &self.true_poses
    }
}

impl PoseSink for TrajectoryRecorder {
    fn draw(&mut self, pose: &Pose2d, style: PoseStyle) -> Result<()> {
        match style {
            PoseStyle::Expected => self.expected.push(*pose),
            PoseStyle::True => self.true_poses.push(*pose),
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct PoseRecord<'a> {
    style: PoseStyle,
    color: &'static str,
    #[serde(flatten)]
    pose: &'a Pose2d,
}

/// Writes one JSON object per pose so an external plotter can pick them up.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PoseSink for JsonLinesSink<W> {
    fn draw(&mut self, pose: &Pose2d, style: PoseStyle) -> Result<()> {
        let record = PoseRecord {
            style,
            color: style.color(),
            pose,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
