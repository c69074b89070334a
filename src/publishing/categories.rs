// file: src/publishing/categories.rs
// description: resolves a frontmatter category name to a remote category id
// reference: https://developer.wordpress.org/rest-api/reference/categories/

use crate::publishing::PublishingApi;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Exact, case-insensitive category lookup. Every call reads the remote list.
pub struct CategoryResolver<A> {
    api: Arc<A>,
}

impl<A: PublishingApi> CategoryResolver<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Category id for `name`, `None` when blank, unmatched or the lookup failed.
    pub async fn resolve(&self, name: Option<&str>) -> Option<u64> {
        let name = name.map(str::trim).filter(|n| !n.is_empty())?;

        let categories = match self.api.list_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                error!("Category lookup failed for '{}': {}", name, e);
                return None;
            }
        };

        let wanted = name.to_lowercase();
        let found = categories
            .iter()
            .find(|category| category.name.to_lowercase() == wanted)
            .map(|category| category.id);

        match found {
            Some(id) => debug!("Category '{}' resolved to id {}", name, id),
            None => warn!("Category '{}' not found, posting uncategorized", name),
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::test_helpers::FakeApi;

    fn resolver(api: FakeApi) -> (CategoryResolver<FakeApi>, Arc<FakeApi>) {
        let api = Arc::new(api);
        (CategoryResolver::new(Arc::clone(&api)), api)
    }

    #[tokio::test]
    async fn test_case_insensitive_exact_match() {
        let (resolver, _) = resolver(FakeApi::new().with_categories(&[(3, "Rust"), (5, "Travel")]));

        assert_eq!(resolver.resolve(Some("rust")).await, Some(3));
        assert_eq!(resolver.resolve(Some("TRAVEL")).await, Some(5));
    }

    #[tokio::test]
    async fn test_no_partial_match() {
        let (resolver, _) = resolver(FakeApi::new().with_categories(&[(3, "Rustacean")]));

        assert_eq!(resolver.resolve(Some("Rust")).await, None);
    }

    #[tokio::test]
    async fn test_blank_name_skips_remote_call() {
        let (resolver, api) = resolver(FakeApi::new().with_categories(&[(1, "")]));

        assert_eq!(resolver.resolve(None).await, None);
        assert_eq!(resolver.resolve(Some("  ")).await, None);
        assert_eq!(api.category_calls(), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_no_match() {
        let (resolver, api) = resolver(FakeApi::new().with_category_error(ApiError::Timeout));

        assert_eq!(resolver.resolve(Some("Rust")).await, None);
        assert_eq!(api.category_calls(), 1);
    }

    #[tokio::test]
    async fn test_every_call_queries_remote() {
        let (resolver, api) = resolver(FakeApi::new().with_categories(&[(3, "Rust")]));

        resolver.resolve(Some("Rust")).await;
        resolver.resolve(Some("Rust")).await;
        assert_eq!(api.category_calls(), 2);
    }
}
