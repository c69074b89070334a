// file: src/parser/mod.rs
// description: markdown parsing module exports
// reference: internal module structure

pub mod fields;
pub mod frontmatter;
pub mod markdown;

pub use fields::{ResolvedTitle, resolve_date, resolve_status, resolve_title};
pub use frontmatter::{Frontmatter, FrontmatterParser, MetaValue};
pub use markdown::{CmarkRenderer, MarkdownRenderer};
