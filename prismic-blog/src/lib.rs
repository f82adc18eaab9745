pub mod types;
pub mod record;
pub mod traits;
pub mod projector;
pub mod pagination;
pub mod reading_time;
pub mod dates;
pub mod neighbors;
pub mod fetcher;
pub mod comments;
pub mod config;
pub mod site;

pub use types::*;
pub use record::RawRecord;
pub use traits::{CommentWidget, ContentFetcher};
pub use pagination::PostListing;
pub use dates::DateDisplay;
pub use neighbors::NeighborResolver;
pub use fetcher::PrismicFetcher;
pub use comments::{UtterancesConfig, UtterancesWidget};
pub use config::BlogConfig;
pub use site::{BlogSite, ListingItem, PostPage};
