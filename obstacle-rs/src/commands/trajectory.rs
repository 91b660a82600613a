//! Trajectory table command implementations

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use obstacle_anim::TrajectoryRecord;
use obstacle_anim::animation::{Bounds2, PoseAnimation};
use obstacle_anim::trajectory::TrajectoryFormat;

use super::load_registry;
use crate::utils::{
    add_table_row, create_table, format_bounds, format_degrees, format_seconds, format_xy,
    parse_offset,
};

/// Poses closer than this are treated as equal when checking loop seams
const SEAM_EPSILON: f64 = 1e-6;

#[derive(Subcommand)]
pub enum TrajectoryCommands {
    /// List every known obstacle trajectory
    List,

    /// Display information about one obstacle trajectory
    Info {
        /// Obstacle id
        id: String,

        /// Show the keyframe table
        #[arg(short, long)]
        detailed: bool,
    },

    /// Validate trajectory files
    Validate {
        /// Trajectory files (.yaml, .yml or .json)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Write an obstacle trajectory record
    Export {
        /// Obstacle id
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: ExportFormat,

        /// Ground-plane offset applied to every keyframe
        #[arg(long, value_name = "DX,DY", value_parser = parse_offset, allow_hyphen_values = true)]
        offset: Option<(f64, f64)>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Yaml,
    Json,
}

impl From<ExportFormat> for TrajectoryFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Yaml => Self::Yaml,
            ExportFormat::Json => Self::Json,
        }
    }
}

pub fn execute(cmd: TrajectoryCommands, data_dir: Option<&Path>) -> Result<()> {
    match cmd {
        TrajectoryCommands::List => handle_list(data_dir),
        TrajectoryCommands::Info { id, detailed } => handle_info(data_dir, &id, detailed),
        TrajectoryCommands::Validate { files } => handle_validate(&files),
        TrajectoryCommands::Export {
            id,
            format,
            offset,
            output,
        } => handle_export(data_dir, &id, format, offset, output.as_deref()),
    }
}

fn handle_list(data_dir: Option<&Path>) -> Result<()> {
    let registry = load_registry(data_dir)?;

    let mut table = create_table(&[
        "ID", "Duration", "Loop", "Interp", "Keys", "Bounds", "Seamless",
    ]);
    let mut combined: Option<Bounds2> = None;

    for record in registry.records() {
        if let Some(bounds) = record.bounds() {
            combined = Some(combined.map_or(bounds, |total| total.union(&bounds)));
        }
        let seamless = match record.to_animation() {
            Ok(animation) => yes_no(animation.is_seamless(SEAM_EPSILON)).to_string(),
            Err(e) => format!("INVALID: {e}"),
        };
        add_table_row(
            &mut table,
            vec![
                record.id.clone(),
                format_seconds(record.duration),
                yes_no(record.looping).to_string(),
                record.interpolation.to_string(),
                record.keyframes.len().to_string(),
                format_bounds(record.bounds()),
                seamless,
            ],
        );
    }

    table.printstd();
    println!("\n{} obstacle(s)", registry.len());
    println!("Combined bounds: {}", format_bounds(combined));
    Ok(())
}

fn handle_info(data_dir: Option<&Path>, id: &str, detailed: bool) -> Result<()> {
    let registry = load_registry(data_dir)?;
    let animation = registry
        .build(id)
        .with_context(|| format!("Failed to build trajectory '{id}'"))?;

    let stats = PathStats::from_animation(&animation);
    let start = animation.start_pose().position;
    let end = animation.end_pose().position;

    println!("=== Trajectory: {} ===", animation.name());
    println!("Duration:       {}", format_seconds(animation.duration()));
    println!("Loop:           {}", yes_no(animation.is_looping()));
    println!("Interpolation:  {}", animation.interpolation());
    println!("Keyframes:      {}", animation.key_frame_count());
    let bounds = animation.bounds();
    println!("Bounds:         {bounds}");
    println!(
        "Extent:         {:.2} m x {:.2} m",
        bounds.width(),
        bounds.height()
    );
    let (cx, cy) = bounds.center();
    println!("Center:         {}", format_xy(cx, cy));
    println!("Start:          {}", format_xy(start.x, start.y));
    println!("End:            {}", format_xy(end.x, end.y));
    println!("Path length:    {:.2} m", stats.length);
    println!("Mean speed:     {:.3} m/s", stats.mean_speed);
    println!("Max speed:      {:.3} m/s", stats.max_speed);

    if animation.is_looping() && !animation.is_seamless(SEAM_EPSILON) {
        println!(
            "Loop seam:      jumps {:.2} m back to the start",
            start.distance(end)
        );
    }

    if detailed {
        println!();
        let mut table = create_table(&["#", "Time", "X", "Y", "Z", "Yaw", "Speed to next"]);
        let key_frames = animation.key_frames().as_slice();
        for (i, kf) in key_frames.iter().enumerate() {
            let speed = key_frames.get(i + 1).map_or_else(
                || "-".to_string(),
                |next| {
                    format!(
                        "{:.3} m/s",
                        kf.translation.distance(next.translation) / (next.time - kf.time)
                    )
                },
            );
            add_table_row(
                &mut table,
                vec![
                    i.to_string(),
                    format!("{:.2}", kf.time),
                    format!("{:.2}", kf.translation.x),
                    format!("{:.2}", kf.translation.y),
                    format!("{:.2}", kf.translation.z),
                    format_degrees(kf.pose().yaw()),
                    speed,
                ],
            );
        }
        table.printstd();
    }

    Ok(())
}

fn handle_validate(files: &[PathBuf]) -> Result<()> {
    let mut failures = 0usize;

    for path in files {
        match validate_file(path) {
            Ok(animation) => println!(
                "✓ {}: '{}' ({} keyframes, {})",
                path.display(),
                animation.name(),
                animation.key_frame_count(),
                format_seconds(animation.duration())
            ),
            Err(e) => {
                failures += 1;
                println!("✗ {}: {e:#}", path.display());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!(
            "{failures} of {} trajectory file(s) failed validation",
            files.len()
        );
    }

    println!("\nAll {} trajectory file(s) are valid", files.len());
    Ok(())
}

fn validate_file(path: &Path) -> Result<PoseAnimation> {
    let record = TrajectoryRecord::from_path(path).context("unreadable record")?;
    Ok(record.to_animation()?)
}

fn handle_export(
    data_dir: Option<&Path>,
    id: &str,
    format: ExportFormat,
    offset: Option<(f64, f64)>,
    output: Option<&Path>,
) -> Result<()> {
    let registry = load_registry(data_dir)?;
    let mut record = registry
        .get(id)
        .cloned()
        .with_context(|| format!("Unknown obstacle id: {id}"))?;

    if let Some((dx, dy)) = offset {
        log::info!("Shifting '{id}' by ({dx}, {dy})");
        record = record.translated(dx, dy);
    }

    let text = record
        .to_string_as(format.into())
        .with_context(|| format!("Failed to serialize trajectory '{id}'"))?;

    match output {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote '{id}' to {}", path.display());
        }
        None => print!("{text}"),
    }

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Distance and speed figures for a keyframe path
#[derive(Debug, Clone, Copy, PartialEq)]
struct PathStats {
    length: f64,
    mean_speed: f64,
    max_speed: f64,
}

impl PathStats {
    fn from_animation(animation: &PoseAnimation) -> Self {
        let key_frames = animation.key_frames().as_slice();
        let mut length = 0.0;
        let mut max_speed: f64 = 0.0;

        for pair in key_frames.windows(2) {
            let distance = pair[0].translation.distance(pair[1].translation);
            let dt = pair[1].time - pair[0].time;
            length += distance;
            if dt > 0.0 {
                max_speed = max_speed.max(distance / dt);
            }
        }

        Self {
            length,
            mean_speed: length / animation.duration(),
            max_speed,
        }
    }
}
