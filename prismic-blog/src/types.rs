use serde::{Deserialize, Serialize};

/// Projected view-model of a single blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Document id assigned by the content source.
    pub id: String,
    /// Route slug. Falls back to `id` when the document has no uid.
    pub slug: String,
    pub published_at: Option<String>,
    pub last_edited_at: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner_url: String,
    pub image_url: String,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub heading: String,
    pub body: Vec<BodySpan>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodySpan {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRef {
    pub id: String,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborPair {
    pub previous: Option<PostRef>,
    pub next: Option<PostRef>,
}

/// One page of results plus the opaque cursor of the page after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub next_page: Option<String>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, next_page: Option<String>) -> Self {
        Self { results, next_page }
    }

    /// Cursor of the following page, with empty strings treated as exhausted.
    pub fn cursor(&self) -> Option<&str> {
        self.next_page.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Prismic-Blog/1.0".to_string(),
            timeout_seconds: 30,
            max_retries: 2,
            retry_delay_ms: 500,
            max_redirects: 5,
        }
    }
}

/// Selects which documents a query returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFilter {
    pub document_type: String,
}

impl DocumentFilter {
    pub fn of_type(document_type: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub field: String,
    pub direction: SortDirection,
}

impl Ordering {
    pub const FIRST_PUBLICATION: &'static str = "document.first_publication_date";
    pub const LAST_PUBLICATION: &'static str = "document.last_publication_date";

    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn first_publication(direction: SortDirection) -> Self {
        Self::new(Self::FIRST_PUBLICATION, direction)
    }

    pub fn last_publication(direction: SortDirection) -> Self {
        Self::new(Self::LAST_PUBLICATION, direction)
    }

    /// Wire form used inside the `orderings` query parameter.
    pub fn as_query_fragment(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.field.clone(),
            SortDirection::Desc => format!("{} desc", self.field),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub page_size: Option<u32>,
    pub orderings: Vec<Ordering>,
    /// Only return documents positioned after this document id.
    pub after: Option<String>,
    /// Restrict returned `data` to these fields, e.g. `posts.title`.
    pub fetch: Vec<String>,
    /// Content release / preview ref. The master ref is used when absent.
    pub reference: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    pub fn after(mut self, document_id: impl Into<String>) -> Self {
        self.after = Some(document_id.into());
        self
    }

    pub fn fetch_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fetch.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_reference(mut self, reference: Option<String>) -> Self {
        self.reference = reference;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Content API returned HTTP {status} for {url}")]
    Api { status: u16, url: String },

    #[error("Malformed record: {reason}")]
    MalformedRecord { reason: String },

    #[error("Document not found: {document_type}/{uid}")]
    NotFound { document_type: String, uid: String },

    #[error("Invalid timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BlogError {
    /// Network or content API failures, as opposed to data or lookup errors.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, BlogError::Http(_) | BlogError::Api { .. })
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
