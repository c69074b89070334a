// file: src/pipeline/publisher.rs
// description: turns one markdown file into a published post and archives it
// reference: read, parse, resolve, render, submit, archive

use crate::error::{PipelineError, Result, Stage};
use crate::models::{Document, PostDraft, PostStatus};
use crate::parser::{
    FrontmatterParser, MarkdownRenderer, resolve_date, resolve_status, resolve_title,
};
use crate::pipeline::archive::{ArchiveEntry, Archiver};
use crate::pipeline::stats::StatsTracker;
use crate::publishing::{CategoryResolver, PublishingApi};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, error, info, warn};

/// Result of an attempt that reached the remote API successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedPost {
    pub title: String,
    pub status: PostStatus,
    pub link: String,
    pub scheduled_at: Option<String>,
    pub category: Option<String>,
    /// `None` when the local move failed after publishing.
    pub archive: Option<ArchiveEntry>,
}

pub struct Publisher<A, R> {
    api: Arc<A>,
    renderer: R,
    categories: CategoryResolver<A>,
    parser: FrontmatterParser,
    archiver: Archiver,
    stats: Arc<StatsTracker>,
}

impl<A, R> Publisher<A, R>
where
    A: PublishingApi,
    R: MarkdownRenderer,
{
    pub fn new(api: Arc<A>, renderer: R, archiver: Archiver, stats: Arc<StatsTracker>) -> Self {
        Self {
            categories: CategoryResolver::new(Arc::clone(&api)),
            api,
            renderer,
            parser: FrontmatterParser::new(),
            archiver,
            stats,
        }
    }

    /// One attempt. `Ok` means the post exists remotely, whether or not the
    /// file could be archived afterwards.
    pub async fn publish(&self, path: &Path) -> Result<PublishedPost> {
        let result = self.attempt(path).await;

        match &result {
            Ok(_) => self.stats.inc_published(),
            Err(e) if e.is_skip() => {
                warn!("Ignoring empty file: {}", path.display());
                self.stats.inc_skipped();
            }
            Err(e) => {
                let stage = e.stage().map(|s| s.to_string()).unwrap_or_default();
                error!("Publishing {} failed at {}: {}", path.display(), stage, e);
                self.stats.inc_failed();
            }
        }

        result
    }

    async fn attempt(&self, path: &Path) -> Result<PublishedPost> {
        let document = self.read(path).await?;
        info!("Processing new file: {}", document.file_name());

        let (frontmatter, body) = self.parser.parse(&document.content);
        debug!("{}: {} complete", document.file_name(), Stage::Parsed);

        let resolved = resolve_title(&frontmatter, &body, &document.stem());
        let status = resolve_status(&frontmatter);
        let scheduled_at = resolve_date(&frontmatter);
        let category = frontmatter.get_text("category");
        let category_id = self.categories.resolve(category.as_deref()).await;
        debug!("{}: {} complete", document.file_name(), Stage::FieldsResolved);

        let body_html = self
            .renderer
            .render(&resolved.body)
            .map_err(|e| PipelineError::Render {
                file: document.file_name(),
                message: match e {
                    PipelineError::Render { message, .. } => message,
                    other => other.to_string(),
                },
            })?;

        let draft = PostDraft {
            title: resolved.title,
            body_html,
            status,
            scheduled_at,
            category_id,
        };

        let created = self.api.create_post(&draft.to_request()).await?;
        let category = category.filter(|_| draft.category_id.is_some());

        info!("Post {}: {}", draft.status.describe(), draft.title);
        if let Some(name) = &category {
            info!("  category: {}", name);
        }
        if let (PostStatus::Future, Some(date)) = (draft.status, &draft.scheduled_at) {
            info!("  scheduled for: {}", date);
        }
        if created.link.is_empty() {
            info!("  url: not returned by the server");
        } else {
            info!("  url: {}", created.link);
        }

        let archive = self.archive(path).await;

        Ok(PublishedPost {
            title: draft.title,
            status: draft.status,
            link: created.link,
            scheduled_at: draft.scheduled_at,
            category,
            archive,
        })
    }

    async fn read(&self, path: &Path) -> Result<Document> {
        let content =
            fs::read_to_string(path)
                .await
                .map_err(|source| PipelineError::FileOperation {
                    path: path.to_path_buf(),
                    source,
                })?;

        let document = Document::new(path.to_path_buf(), content);
        if document.is_blank() {
            return Err(PipelineError::EmptyDocument(path.to_path_buf()));
        }
        Ok(document)
    }

    async fn archive(&self, path: &Path) -> Option<ArchiveEntry> {
        let archiver = self.archiver.clone();
        let source = path.to_path_buf();
        let moved = tokio::task::spawn_blocking(move || archiver.archive(&source))
            .await
            .map_err(|e| PipelineError::Archive {
                path: path.to_path_buf(),
                message: format!("archive task failed: {}", e),
            })
            .and_then(|result| result);

        match moved {
            Ok(entry) => {
                info!("  archived to: {}", entry.destination.display());
                Some(entry)
            }
            Err(e) => {
                error!(
                    "Post was published but {} could not be archived, move it manually: {}",
                    path.display(),
                    e
                );
                self.stats.inc_archive_failures();
                None
            }
        }
    }
}
