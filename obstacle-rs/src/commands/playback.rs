//! Playback command implementations

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use obstacle_anim::animation::{Interpolation, KinematicModel, Pose, PoseAnimation, Scene};
use obstacle_anim::ObstacleRegistry;
use serde::Serialize;

use super::load_registry;
use crate::utils::{add_table_row, create_table, format_degrees};

#[derive(Subcommand)]
pub enum PlaybackCommands {
    /// Print the interpolated pose of one obstacle at given times
    Sample {
        /// Obstacle id
        id: String,

        /// Elapsed simulation times in seconds
        #[arg(short, long, required = true, num_args = 1.., allow_hyphen_values = true)]
        time: Vec<f64>,

        /// Override the record's interpolation (step, linear, spline)
        #[arg(short, long)]
        interpolation: Option<Interpolation>,
    },

    /// Step a scene of obstacles and print every pose per tick
    Simulate {
        /// Obstacle ids (all when omitted)
        ids: Vec<String>,

        /// Simulated time span in seconds
        #[arg(short, long, default_value = "10.0")]
        duration: f64,

        /// Tick length in seconds
        #[arg(short, long, default_value = "0.1")]
        step: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: SimulateFormat,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SimulateFormat {
    Table,
    Csv,
    Json,
}

pub fn execute(cmd: PlaybackCommands, data_dir: Option<&Path>) -> Result<()> {
    match cmd {
        PlaybackCommands::Sample {
            id,
            time,
            interpolation,
        } => handle_sample(data_dir, &id, &time, interpolation),
        PlaybackCommands::Simulate {
            ids,
            duration,
            step,
            format,
        } => handle_simulate(data_dir, &ids, duration, step, format),
    }
}

/// One obstacle pose at one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseRow {
    pub time: f64,
    pub obstacle: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
}

impl PoseRow {
    fn new(time: f64, obstacle: &str, pose: &Pose) -> Self {
        Self {
            time,
            obstacle: obstacle.to_string(),
            x: pose.position.x,
            y: pose.position.y,
            z: pose.position.z,
            // Adding zero folds -0.0 into 0.0
            yaw: pose.yaw() + 0.0,
        }
    }
}

/// Stand-in host model that remembers the last pose it was given
#[derive(Debug, Clone)]
pub struct RecordingModel {
    name: String,
    pose: Pose,
}

impl RecordingModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pose: Pose::IDENTITY,
        }
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }
}

impl KinematicModel for RecordingModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_world_pose(&mut self, pose: &Pose) {
        self.pose = *pose;
    }
}

fn handle_sample(
    data_dir: Option<&Path>,
    id: &str,
    times: &[f64],
    interpolation: Option<Interpolation>,
) -> Result<()> {
    let registry = load_registry(data_dir)?;
    let animation = registry
        .build(id)
        .with_context(|| format!("Failed to build trajectory '{id}'"))?;
    let mode = interpolation.unwrap_or_else(|| animation.interpolation());

    let mut table = create_table(&["Time", "Local", "X", "Y", "Z", "Yaw"]);
    for &time in times {
        let pose = animation.sample_with(time, mode);
        add_table_row(
            &mut table,
            vec![
                format!("{time:.3}"),
                format!("{:.3}", animation.local_time(time)),
                format!("{:.4}", pose.position.x),
                format!("{:.4}", pose.position.y),
                format!("{:.4}", pose.position.z),
                format_degrees(pose.yaw()),
            ],
        );
    }

    println!("{} ({} interpolation)", animation.name(), mode);
    table.printstd();
    Ok(())
}

/// Upper bound on simulated ticks per run
pub const MAX_TICKS: usize = 1_000_000;

/// Number of ticks after t = 0 needed to cover `duration` at `step` per tick
pub fn tick_count(duration: f64, step: f64) -> Result<usize> {
    if !step.is_finite() || step <= 0.0 {
        anyhow::bail!("Tick length must be positive, got {step}");
    }
    if !duration.is_finite() || duration < 0.0 {
        anyhow::bail!("Duration must be non-negative, got {duration}");
    }

    let ticks = (duration / step).round();
    if ticks > MAX_TICKS as f64 {
        anyhow::bail!(
            "Simulating {duration} s at {step} s per tick needs {ticks} ticks \
             (limit {MAX_TICKS})"
        );
    }
    Ok(ticks as usize)
}

/// Build the requested animations, leaving malformed obstacles out
fn select_animations(registry: &ObstacleRegistry, ids: &[String]) -> Result<Vec<PoseAnimation>> {
    if ids.is_empty() {
        return Ok(registry.build_all().animations);
    }

    let mut animations = Vec::with_capacity(ids.len());
    for id in ids {
        if !registry.contains(id) {
            anyhow::bail!("Unknown obstacle id: {id}");
        }
        match registry.build(id) {
            Ok(animation) => animations.push(animation),
            Err(e) => log::warn!("Obstacle '{id}' rejected, it will not be animated: {e}"),
        }
    }
    Ok(animations)
}

/// Drive a scene through `ticks + 1` ticks starting at t = 0, handing one
/// row per obstacle per tick to `emit`
///
/// Each tick seeks to the absolute time `tick * step`, so every row matches
/// [`PoseAnimation::sample`] at the time it reports.
pub fn simulate<F>(
    animations: Vec<PoseAnimation>,
    ticks: usize,
    step: f64,
    mut emit: F,
) -> Result<()>
where
    F: FnMut(PoseRow) -> Result<()>,
{
    let mut scene = Scene::new();
    for animation in animations {
        let model = RecordingModel::new(animation.name());
        scene.attach(model, animation);
    }

    for tick in 0..=ticks {
        let time = tick as f64 * step;

        #[cfg(feature = "parallel")]
        scene.set_time_parallel(time);
        #[cfg(not(feature = "parallel"))]
        scene.set_time(time);

        for model in scene.models() {
            emit(PoseRow::new(time, model.name(), model.pose()))?;
        }
    }

    Ok(())
}

fn handle_simulate(
    data_dir: Option<&Path>,
    ids: &[String],
    duration: f64,
    step: f64,
    format: SimulateFormat,
) -> Result<()> {
    let ticks = tick_count(duration, step)?;

    let registry = load_registry(data_dir)?;
    let animations = select_animations(&registry, ids)?;
    if animations.is_empty() {
        anyhow::bail!("No valid obstacles to simulate");
    }

    log::info!(
        "Simulating {} obstacle(s) for {duration} s at {step} s per tick",
        animations.len()
    );

    match format {
        SimulateFormat::Table => {
            let mut table = create_table(&["Time", "Obstacle", "X", "Y", "Yaw"]);
            simulate(animations, ticks, step, |row| {
                add_table_row(
                    &mut table,
                    vec![
                        format!("{:.3}", row.time),
                        row.obstacle,
                        format!("{:.4}", row.x),
                        format!("{:.4}", row.y),
                        format_degrees(row.yaw),
                    ],
                );
                Ok(())
            })?;
            table.printstd();
        }
        SimulateFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout().lock());
            simulate(animations, ticks, step, |row| Ok(writer.serialize(row)?))?;
            writer.flush()?;
        }
        SimulateFormat::Json => {
            let mut out = io::BufWriter::new(io::stdout().lock());
            let mut first = true;
            out.write_all(b"[")?;
            simulate(animations, ticks, step, |row| {
                let separator: &[u8] = if first { b"\n" } else { b",\n" };
                out.write_all(separator)?;
                first = false;
                serde_json::to_writer_pretty(&mut out, &row)?;
                Ok(())
            })?;
            out.write_all(b"\n]\n")?;
            out.flush()?;
        }
    }

    Ok(())
}
