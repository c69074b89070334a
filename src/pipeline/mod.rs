// file: src/pipeline/mod.rs
// description: per-file publishing pipeline exports
// reference: internal module structure

mod archive;
mod publisher;
mod stats;

pub use archive::{ArchiveEntry, Archiver};
pub use publisher::{PublishedPost, Publisher};
pub use stats::{PipelineStats, StatsTracker};
