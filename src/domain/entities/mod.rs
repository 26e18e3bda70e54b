//! Domain entities - pure data structures with behavior, no I/O

mod manifest;
mod plan;

pub use manifest::{ArtifactRecord, Manifest, ManifestKey};
pub use plan::{resolve_args, ArgSpec, ArtifactSpec, DeployPlan, PlanError, WiringCall};
