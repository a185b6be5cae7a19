//! Site adapters for the corporate newsrooms the pipeline collects from.
//!
//! One module per site: each knows its listing URL scheme, CSS selectors,
//! and content container, and drives a [`crate::ScrapeSession`] through the
//! shared listing walk.

pub mod samsung_semicon;
pub mod sk_hynix;

pub use samsung_semicon::SamsungSemiconNewsroom;
pub use sk_hynix::SkHynixNewsroom;
