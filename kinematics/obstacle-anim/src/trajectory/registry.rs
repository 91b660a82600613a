//! Obstacle id → trajectory record table

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::record::{TrajectoryFormat, TrajectoryRecord};
use crate::animation::PoseAnimation;
use crate::error::{AnimError, Result};

/// Trajectory tables compiled into the library, as (file name, YAML text)
pub const BUILTIN_TABLES: &[(&str, &str)] = &[
    ("obs_7.yaml", include_str!("../../data/obs_7.yaml")),
    ("obs_32.yaml", include_str!("../../data/obs_32.yaml")),
    ("obs_98.yaml", include_str!("../../data/obs_98.yaml")),
    ("obs_99.yaml", include_str!("../../data/obs_99.yaml")),
    ("obs_180.yaml", include_str!("../../data/obs_180.yaml")),
];

/// Obstacle that failed validation
#[derive(Debug)]
pub struct RejectedObstacle {
    pub id: String,
    pub error: AnimError,
}

/// Trajectory file that could not be read or registered
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: AnimError,
}

/// Result of building every obstacle in a registry
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Animations that passed validation, in id order
    pub animations: Vec<PoseAnimation>,
    /// Obstacles left static because their table is malformed
    pub rejected: Vec<RejectedObstacle>,
}

impl LoadReport {
    /// Whether every obstacle was built
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Table mapping obstacle ids to their trajectory records
#[derive(Debug, Clone, Default)]
pub struct ObstacleRegistry {
    records: BTreeMap<String, TrajectoryRecord>,
}

impl ObstacleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the embedded trajectory tables
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        for (file_name, yaml) in BUILTIN_TABLES {
            log::trace!("Parsing built-in table {file_name}");
            registry.register(TrajectoryRecord::from_yaml_str(yaml)?)?;
        }
        Ok(registry)
    }

    /// Load every trajectory file in a directory (non-recursive)
    ///
    /// Files with an unsupported extension are ignored. Files that fail to
    /// parse or repeat an id are skipped and returned alongside the registry.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<(Self, Vec<SkippedFile>)> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && TrajectoryFormat::from_path(&path).is_ok() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut registry = Self::new();
        let mut skipped = Vec::new();
        for path in paths {
            let result =
                TrajectoryRecord::from_path(&path).and_then(|record| registry.register(record));
            if let Err(error) = result {
                log::warn!("Skipping trajectory file {}: {}", path.display(), error);
                skipped.push(SkippedFile { path, error });
            }
        }

        log::info!(
            "Loaded {} trajectories from {} ({} skipped)",
            registry.len(),
            dir.display(),
            skipped.len()
        );
        Ok((registry, skipped))
    }

    /// Add a record; ids must be unique
    pub fn register(&mut self, record: TrajectoryRecord) -> Result<()> {
        if self.records.contains_key(&record.id) {
            return Err(AnimError::DuplicateObstacle(record.id));
        }
        log::debug!("Registered obstacle '{}'", record.id);
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&TrajectoryRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Obstacle ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &TrajectoryRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build the animation for one obstacle
    pub fn build(&self, id: &str) -> Result<PoseAnimation> {
        self.records
            .get(id)
            .ok_or_else(|| AnimError::UnknownObstacle(id.to_string()))?
            .to_animation()
    }

    /// Build every obstacle, rejecting malformed ones individually
    pub fn build_all(&self) -> LoadReport {
        let mut report = LoadReport::default();
        for record in self.records.values() {
            match record.to_animation() {
                Ok(animation) => report.animations.push(animation),
                Err(error) => {
                    log::warn!(
                        "Obstacle '{}' rejected, it will not be animated: {}",
                        record.id,
                        error
                    );
                    report.rejected.push(RejectedObstacle {
                        id: record.id.clone(),
                        error,
                    });
                }
            }
        }
        report
    }
}

impl Extend<TrajectoryRecord> for ObstacleRegistry {
    /// Later records replace earlier ones with the same id
    fn extend<I: IntoIterator<Item = TrajectoryRecord>>(&mut self, iter: I) {
        for record in iter {
            self.records.insert(record.id.clone(), record);
        }
    }
}
