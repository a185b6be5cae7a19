//! Browser-driven newsroom scraping.
//!
//! [`ScrapeSession`] wraps one WebDriver-controlled headless browser:
//! opened per search call, paginated through listing pages, and closed on
//! every exit path. The site adapters in [`sites`] implement
//! [`newscope_core::SourceAdapter`] for the corporate newsrooms this
//! pipeline collects from.

pub mod error;
pub mod listing;
pub mod session;
pub mod sites;

pub use error::ScrapeError;
pub use listing::{ArticleExtractor, ListingItem};
pub use session::{ScrapeSession, SessionExtractor};
pub use sites::{SamsungSemiconNewsroom, SkHynixNewsroom};
