//! Trajectory tables: the authoring data behind each obstacle
//!
//! Every obstacle is a [`TrajectoryRecord`] (id, duration, loop flag and
//! keyframes) stored as YAML or JSON. An [`ObstacleRegistry`] maps ids to
//! records and builds validated animations from them at load time.

mod record;
mod registry;

pub use record::{KeyFrameRecord, KeyFrameSpec, TrajectoryFormat, TrajectoryRecord};
pub use registry::{BUILTIN_TABLES, LoadReport, ObstacleRegistry, RejectedObstacle, SkippedFile};
