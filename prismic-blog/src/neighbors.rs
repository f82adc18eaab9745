use crate::projector;
use crate::traits::ContentFetcher;
use crate::types::{
    DocumentFilter, NeighborPair, Ordering, Post, PostRef, QueryOptions, Result, SortDirection,
};
use tracing::debug;

/// Finds the posts published right before and right after a given post.
///
/// Queries run against the whole collection held by the content source, so
/// the result does not depend on how much of the listing is loaded. Ties on
/// publication date follow the source's own ordering: a source that lists
/// tied posts in the same order for both directions makes the first of them
/// see the second on both sides.
pub struct NeighborResolver<'a, F: ?Sized> {
    fetcher: &'a F,
    filter: DocumentFilter,
    reference: Option<String>,
}

impl<'a, F> NeighborResolver<'a, F>
where
    F: ContentFetcher + ?Sized,
{
    pub fn new(fetcher: &'a F, document_type: &str) -> Self {
        Self {
            fetcher,
            filter: DocumentFilter::of_type(document_type),
            reference: None,
        }
    }

    /// Resolve against a preview ref instead of the published master ref.
    pub fn with_reference(mut self, reference: Option<String>) -> Self {
        self.reference = reference;
        self
    }

    pub async fn resolve(&self, post: &Post) -> Result<NeighborPair> {
        let (previous, next) = tokio::try_join!(
            self.adjacent(post, SortDirection::Desc),
            self.adjacent(post, SortDirection::Asc),
        )?;

        debug!(
            "Neighbors of {}: previous={:?} next={:?}",
            post.slug,
            previous.as_ref().map(|p| &p.slug),
            next.as_ref().map(|p| &p.slug)
        );
        Ok(NeighborPair { previous, next })
    }

    /// First document after `post` when walking first-publication order in `direction`.
    async fn adjacent(&self, post: &Post, direction: SortDirection) -> Result<Option<PostRef>> {
        let options = QueryOptions::new()
            .page_size(1)
            .order_by(Ordering::first_publication(direction))
            .after(post.id.clone())
            .fetch_fields([format!("{}.title", self.filter.document_type)])
            .with_reference(self.reference.clone());

        let page = self.fetcher.query(&self.filter, &options).await?;
        match page.results.first() {
            Some(record) => {
                let neighbor = projector::project_ref(record)?;
                Ok(Some(neighbor).filter(|n| n.id != post.id))
            }
            None => Ok(None),
        }
    }
}
