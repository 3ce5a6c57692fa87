//! Rate-limited scraper and typed parsers for the JBIS horse-racing site.
//!
//! [`Access`] is the entry point: each method fetches one page and returns
//! typed records.
//!
//! ```no_run
//! # async fn demo() -> keiba_jbis::Result<()> {
//! let access = keiba_jbis::Access::new()?;
//! for day in access.race_calendar(2024, 12).await? {
//!     let day = day?;
//!     for race in access.races_by_url(&day.url).await? {
//!         println!("{:?}", race?);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod scraper;
pub mod types;

pub use error::{Result, ScrapeError};
pub use scraper::{Access, HttpFetcher, PageFetcher};
pub use types::{HorseEntry, HorseInfo, HorseResult, Order, RaceCalendar, RaceInfo, TrackType};
