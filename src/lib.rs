// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod publishing;
pub mod utils;
pub mod watcher;

#[cfg(test)]
mod test_helpers;

pub use config::{ApiConfig, Config, WatchConfig};
pub use error::{ApiError, PipelineError, Result, Stage};
pub use models::{Category, CreatedPost, Document, NewPost, PostDraft, PostStatus};
pub use parser::{CmarkRenderer, Frontmatter, FrontmatterParser, MarkdownRenderer, MetaValue};
pub use pipeline::{ArchiveEntry, Archiver, PipelineStats, PublishedPost, Publisher};
pub use publishing::{CategoryResolver, ConnectionStatus, PublishingApi, WordPressClient};
pub use utils::Validator;
pub use watcher::{ReadinessDetector, SubmissionTracker, WatchLoop};
