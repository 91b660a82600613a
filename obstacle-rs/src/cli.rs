//! Root CLI structure for obstacle-rs

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "obstacle-rs")]
#[command(about = "Command-line tools for kinematic obstacle trajectory tables", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory of trajectory files to use instead of the built-in tables
    #[arg(long, global = true, env = "OBSTACLE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trajectory table operations
    Trajectory {
        #[command(subcommand)]
        command: crate::commands::trajectory::TrajectoryCommands,
    },

    /// Pose sampling and scene playback
    Playback {
        #[command(subcommand)]
        command: crate::commands::playback::PlaybackCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
