//! Command implementations

pub mod playback;
pub mod trajectory;

use std::path::Path;

use anyhow::{Context, Result};
use obstacle_anim::ObstacleRegistry;

/// Load trajectories from `data_dir`, or the built-in tables when absent
pub fn load_registry(data_dir: Option<&Path>) -> Result<ObstacleRegistry> {
    match data_dir {
        Some(dir) => {
            let (registry, skipped) = ObstacleRegistry::from_dir(dir)
                .with_context(|| format!("Failed to read trajectory directory {}", dir.display()))?;
            for file in &skipped {
                log::warn!("Ignored {}: {}", file.path.display(), file.error);
            }
            if registry.is_empty() {
                anyhow::bail!("No trajectory files found in {}", dir.display());
            }
            Ok(registry)
        }
        None => ObstacleRegistry::builtin().context("Failed to load built-in trajectory tables"),
    }
}
