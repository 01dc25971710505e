//! URL source for the crawl pipeline
//!
//! This module turns an external URL provider (a CSV file or any reader of
//! CSV records) into the ordered sequence of URL strings that feeds the
//! fetcher stage. It covers:
//! - The crawl limit (`UrlLimit`) and its raw integer sentinel
//! - The URL channel, unbounded by default or bounded on request
//! - Record reading, header/malformed-row skipping and provider failures

mod channel;
mod limit;
mod records;

pub use channel::{url_channel, UrlReceiver, UrlSender};
pub use limit::{UrlLimit, NO_LIMIT};
pub use records::UrlSource;
