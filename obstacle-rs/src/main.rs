//! Main entry point for the obstacle-rs CLI

use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::{Generator, generate};
use std::io;

use obstacle_rs::cli::{Cli, Commands};
use obstacle_rs::commands;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still takes precedence
    let default_filter = match (cli.verbose, cli.quiet) {
        (0, true) => "error",
        (0, false) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    log::debug!("obstacle-anim {}", obstacle_anim::VERSION);

    let data_dir = cli.data_dir.as_deref();

    // Execute command
    match cli.command {
        Commands::Trajectory { command } => commands::trajectory::execute(command, data_dir),

        Commands::Playback { command } => commands::playback::execute(command, data_dir),

        Commands::Completions { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
