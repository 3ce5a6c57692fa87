//! Web scraper module for jbis.or.jp
//!
//! Provides rate-limited fetching, HTML parsing and the [`Access`] facade
//! that ties one fetch to one parser.

pub mod access;
pub mod dom;
pub mod fetcher;
pub mod fields;
pub mod lookup;
pub mod parsers;
pub mod rate_limiter;

pub use access::Access;
pub use fetcher::{HttpFetcher, PageFetcher};
pub use lookup::CourseTable;
pub use parsers::{CalendarEntries, RaceRows, SireEntries};
pub use rate_limiter::RateLimiter;

use url::Url;

use crate::error::Result;

/// Default site root
pub const BASE_URL: &str = "https://www.jbis.or.jp/";

/// Build monthly calendar URL (year and month go into the query string)
pub fn calendar_url(base: &Url) -> Result<Url> {
    Ok(base.join("race/calendar/")?)
}

/// Build horse profile URL
pub fn horse_url(base: &Url, horse_id: &str) -> Result<Url> {
    Ok(base.join(&format!("horse/{horse_id}/"))?)
}

/// Build full race-record URL below a horse page
pub fn horse_record_url(horse_url: &Url) -> Result<Url> {
    let mut dir = horse_url.clone();
    if !dir.path().ends_with('/') {
        let path = format!("{}/", dir.path());
        dir.set_path(&path);
    }
    Ok(dir.join(parsers::horse_record::RECORD_PATH)?)
}

/// Build sire offspring-entry URL
pub fn sire_entry_url(base: &Url, sire_id: &str) -> Result<Url> {
    Ok(base.join(&format!("horse/{sire_id}/sire/entry/"))?)
}
