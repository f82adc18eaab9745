use crate::record::RawRecord;
use crate::types::{DocumentFilter, Page, QueryOptions, Result};
use async_trait::async_trait;

/// Source of raw documents (the headless content API, or a fake in tests).
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Run a filtered, ordered query and return its first page.
    async fn query(
        &self,
        filter: &DocumentFilter,
        options: &QueryOptions,
    ) -> Result<Page<RawRecord>>;

    /// Follow an opaque cursor previously returned as `next_page`.
    async fn fetch_page(&self, cursor: &str) -> Result<Page<RawRecord>>;

    /// Look a single document up by its uid.
    ///
    /// Fails with `BlogError::NotFound` when nothing matches.
    async fn get_by_uid(
        &self,
        document_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<RawRecord>;
}

/// Capability for embedding a comments widget into a rendered post page.
///
/// Mounting is best-effort: a widget that cannot mount returns `None` and the
/// page renders without comments.
pub trait CommentWidget: Send + Sync {
    fn widget_name(&self) -> &str;

    /// Markup to inject for the page at `page_path`.
    fn mount(&self, page_path: &str) -> Option<String>;
}
