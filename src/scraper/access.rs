//! Access facade: one method per JBIS page type.
//!
//! Every method performs exactly one fetch and hands the page to its parser.
//! The parsed document never lives across an await, so the returned futures
//! are `Send`.

use std::sync::{Arc, LazyLock};

use tracing::{debug, info};
use url::Url;

use super::fetcher::{HttpFetcher, PageFetcher};
use super::lookup::CourseTable;
use super::parsers::{
    CalendarEntries, CalendarParser, HorseInfoParser, HorseRecordParser, RaceListParser,
    RaceResultParser, RaceRows, SireEntries, SireEntryParser,
};
use super::{BASE_URL, calendar_url, horse_record_url, horse_url, sire_entry_url};
use crate::config::FetchConfig;
use crate::error::Result;
use crate::types::{HorseInfo, HorseResult, RaceInfo};

static DEFAULT_BASE: LazyLock<Url> = LazyLock::new(|| Url::parse(BASE_URL).unwrap());

/// Entry point for reading JBIS pages
#[derive(Debug, Clone)]
pub struct Access<F = HttpFetcher> {
    fetcher: F,
    base: Url,
    courses: Arc<CourseTable>,
}

impl Access<HttpFetcher> {
    /// Access with default settings: the public site, one request per second.
    pub fn new() -> Result<Self> {
        Self::from_config(&FetchConfig::default())
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Self::with_fetcher(HttpFetcher::new(config)?).with_base(&config.base_url)
    }
}

impl<F: PageFetcher> Access<F> {
    /// Access through a caller-supplied fetcher.
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            base: DEFAULT_BASE.clone(),
            courses: Arc::new(CourseTable::new()),
        }
    }

    /// Replace the site root all page URLs are built from.
    pub fn with_base(mut self, base: &str) -> Result<Self> {
        self.base = Url::parse(base)?;
        Ok(self)
    }

    async fn get(&self, url: &Url, params: &[(&str, &str)]) -> Result<String> {
        let bytes = self.fetcher.fetch(url.as_str(), params).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Race days of one month, one entry per course per day.
    pub async fn race_calendar(&self, year: i32, month: u32) -> Result<CalendarEntries> {
        info!("Fetching race calendar for {}-{:02}", year, month);

        let url = calendar_url(&self.base)?;
        let year = year.to_string();
        let month = format!("{month:02}");
        let html = self
            .get(&url, &[("year", year.as_str()), ("month", month.as_str())])
            .await?;

        Ok(CalendarParser::parse(&html, &url, Arc::clone(&self.courses)))
    }

    /// Races of one race day, from a URL yielded by [`Access::race_calendar`].
    pub async fn races_by_url(&self, url: &str) -> Result<RaceRows> {
        info!("Fetching race list: {}", url);

        let url = Url::parse(url)?;
        let html = self.get(&url, &[]).await?;
        RaceListParser::parse(&html, &url, &self.courses)
    }

    pub async fn race_result_by_url(&self, url: &str) -> Result<(RaceInfo, Vec<HorseResult>)> {
        info!("Fetching race result: {}", url);

        let url = Url::parse(url)?;
        let html = self.get(&url, &[]).await?;
        let (race, results) = RaceResultParser::parse(&html, &url)?;

        debug!(
            "Parsed {} results for {} {}R",
            results.len(),
            race.course,
            race.race_no.unwrap_or_default()
        );
        Ok((race, results))
    }

    /// Full race history of the horse at `url`, oldest race first.
    pub async fn horse_history_by_url(&self, url: &str) -> Result<Vec<(RaceInfo, HorseResult)>> {
        info!("Fetching race history: {}", url);

        let horse = Url::parse(url)?;
        let record = horse_record_url(&horse)?;
        let html = self.get(&record, &[]).await?;
        let races = HorseRecordParser::parse(&html, &horse, &record)?;

        debug!("Parsed {} races", races.len());
        Ok(races)
    }

    /// Upcoming entries of the offspring of a sire.
    pub async fn sire_entries(&self, sire_id: &str) -> Result<SireEntries> {
        info!("Fetching offspring entries for sire {}", sire_id);

        let url = sire_entry_url(&self.base, sire_id)?;
        let html = self.get(&url, &[]).await?;
        Ok(SireEntryParser::parse(&html, &url))
    }

    pub async fn horse_info(&self, horse_id: &str) -> Result<HorseInfo> {
        info!("Fetching horse profile: {}", horse_id);

        let url = horse_url(&self.base, horse_id)?;
        let html = self.get(&url, &[]).await?;
        HorseInfoParser::parse(&html)
    }
}
