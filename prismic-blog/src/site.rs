use crate::comments::UtterancesWidget;
use crate::config::BlogConfig;
use crate::dates::DateDisplay;
use crate::fetcher::PrismicFetcher;
use crate::neighbors::NeighborResolver;
use crate::pagination::PostListing;
use crate::projector;
use crate::traits::{CommentWidget, ContentFetcher};
use crate::types::{DocumentFilter, NeighborPair, Post, QueryOptions, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Summary row of the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingItem {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub published_label: Option<String>,
}

/// Everything the post page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPage {
    pub post: Post,
    pub reading_minutes: u32,
    pub published_label: Option<String>,
    pub edit_label: Option<String>,
    pub neighbors: NeighborPair,
    pub preview: bool,
    pub comments: Option<String>,
}

/// Builds listing and post page data on top of a content source.
pub struct BlogSite {
    fetcher: Arc<dyn ContentFetcher>,
    comments: Option<Arc<dyn CommentWidget>>,
    dates: DateDisplay,
    document_type: String,
    page_size: u32,
}

impl BlogSite {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, config: &BlogConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            comments: None,
            dates: config.date_display()?,
            document_type: config.document_type.clone(),
            page_size: config.page_size,
        })
    }

    /// Site wired to the Prismic API and utterances comments described by `config`.
    pub fn connect(config: &BlogConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = PrismicFetcher::new(
            &config.api_endpoint,
            config.access_token.clone(),
            config.fetch.clone(),
        )?;
        let widget = UtterancesWidget::new(config.comments.clone());

        Ok(Self::new(Arc::new(fetcher), config)?.with_comments(Arc::new(widget)))
    }

    pub fn with_comments(mut self, widget: Arc<dyn CommentWidget>) -> Self {
        self.comments = Some(widget);
        self
    }

    pub fn dates(&self) -> &DateDisplay {
        &self.dates
    }

    fn filter(&self) -> DocumentFilter {
        DocumentFilter::of_type(&self.document_type)
    }

    /// First page of the listing.
    pub async fn home(&self) -> Result<PostListing> {
        let fields = ["title", "subtitle", "author", "content"]
            .map(|field| format!("{}.{}", self.document_type, field));
        let options = QueryOptions::new()
            .page_size(self.page_size)
            .fetch_fields(fields);

        let page = self.fetcher.query(&self.filter(), &options).await?;
        let listing = PostListing::from_records(&page)?;

        info!(
            "Home listing: {} posts, more available: {}",
            listing.len(),
            !listing.is_exhausted()
        );
        Ok(listing)
    }

    pub async fn load_more(&self, listing: &PostListing) -> Result<PostListing> {
        listing.load_more(self.fetcher.as_ref()).await
    }

    pub fn listing_items(&self, listing: &PostListing) -> Result<Vec<ListingItem>> {
        listing
            .posts()
            .iter()
            .map(|post| {
                Ok(ListingItem {
                    slug: post.slug.clone(),
                    title: post.title.clone(),
                    subtitle: post.subtitle.clone(),
                    author: post.author.clone(),
                    published_label: self.dates.publication_label(post.published_at.as_deref())?,
                })
            })
            .collect()
    }

    /// Every post slug, following cursors until the source is exhausted.
    ///
    /// Stops early when the source hands back a cursor it already served.
    pub async fn static_paths(&self) -> Result<Vec<String>> {
        let mut listing = PostListing::from_records(
            &self
                .fetcher
                .query(&self.filter(), &QueryOptions::new().page_size(self.page_size))
                .await?,
        )?;
        let mut seen = HashSet::new();
        while let Some(cursor) = listing.next_cursor() {
            if !seen.insert(cursor.to_string()) {
                warn!("Cursor {} was already followed, stopping path collection", cursor);
                break;
            }
            listing = listing.load_more(self.fetcher.as_ref()).await?;
        }

        Ok(listing.posts().iter().map(|post| post.slug.clone()).collect())
    }

    /// Post page for `slug`. A preview ref switches every lookup to that release.
    pub async fn post_page(&self, slug: &str, preview_ref: Option<&str>) -> Result<PostPage> {
        let record = self
            .fetcher
            .get_by_uid(&self.document_type, slug, preview_ref)
            .await?;
        let post = projector::project(&record)?;

        let neighbors = NeighborResolver::new(self.fetcher.as_ref(), &self.document_type)
            .with_reference(preview_ref.map(str::to_string))
            .resolve(&post)
            .await?;

        let comments = self.comments.as_ref().and_then(|widget| {
            let markup = widget.mount(&format!("/post/{}", post.slug));
            if markup.is_none() {
                warn!("{} widget did not mount on {}", widget.widget_name(), post.slug);
            }
            markup
        });

        Ok(PostPage {
            reading_minutes: post.reading_time_minutes(),
            published_label: self.dates.publication_label(post.published_at.as_deref())?,
            edit_label: self.dates.post_edit_label(&post)?,
            neighbors,
            preview: preview_ref.is_some(),
            comments,
            post,
        })
    }
}
