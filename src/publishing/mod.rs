// file: src/publishing/mod.rs
// description: publishing api seam and its WordPress implementation
// reference: internal module structure

pub mod categories;
pub mod client;

pub use categories::CategoryResolver;
pub use client::{ConnectionStatus, WordPressClient};

use crate::error::ApiError;
use crate::models::{Category, CreatedPost, NewPost};
use std::future::Future;

/// Remote document store the pipeline publishes into.
pub trait PublishingApi: Send + Sync + 'static {
    /// Up to 100 categories ordered by name.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send;

    /// Creates a post; only an HTTP 201 counts as success.
    fn create_post(
        &self,
        post: &NewPost,
    ) -> impl Future<Output = Result<CreatedPost, ApiError>> + Send;
}
