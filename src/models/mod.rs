// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod post;

pub use document::{Document, display_name};
pub use post::{Category, CreatedPost, NewPost, PostDraft, PostStatus};
