use crate::projector;
use crate::record::RawRecord;
use crate::traits::ContentFetcher;
use crate::types::{Page, Post, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Posts loaded so far for the listing page, in fetch order.
///
/// A listing is a value: `load_more` never mutates it and instead returns the
/// next listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostListing {
    posts: Vec<Post>,
    next_cursor: Option<String>,
}

impl PostListing {
    pub fn initialize(first_page: Page<Post>) -> Self {
        let next_cursor = first_page.cursor().map(str::to_string);
        Self {
            posts: first_page.results,
            next_cursor,
        }
    }

    /// Projects a raw first page and starts a listing from it.
    pub fn from_records(first_page: &Page<RawRecord>) -> Result<Self> {
        Ok(Self::initialize(projector::project_page(first_page)?))
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_cursor.is_none()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Fetches the page at the current cursor and returns the extended listing.
    ///
    /// An exhausted listing is returned as-is without touching the fetcher.
    /// Errors are handed back to the caller and `self` stays valid.
    pub async fn load_more<F>(&self, fetcher: &F) -> Result<PostListing>
    where
        F: ContentFetcher + ?Sized,
    {
        let Some(cursor) = self.next_cursor.as_deref() else {
            debug!("Listing exhausted after {} posts, nothing to load", self.posts.len());
            return Ok(self.clone());
        };

        let page = fetcher.fetch_page(cursor).await.map_err(|e| {
            warn!("Failed to load page {}: {}", cursor, e);
            e
        })?;
        let page = projector::project_page(&page)?;

        let next_cursor = page.cursor().map(str::to_string);
        let loaded = page.results.len();

        let mut posts = Vec::with_capacity(self.posts.len() + loaded);
        posts.extend_from_slice(&self.posts);
        posts.extend(page.results);

        let next = Self { posts, next_cursor };

        info!(
            "Loaded {} more posts ({} total, exhausted: {})",
            loaded,
            next.posts.len(),
            next.is_exhausted()
        );
        Ok(next)
    }
}
