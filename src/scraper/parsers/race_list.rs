//! Race list parser for one race day at one course.
//!
//! URL: https://www.jbis.or.jp/race/calendar/YYYYMMDD/CCC/
//! The date and course come from the URL; each table row is one race.

use chrono::NaiveDate;
use scraper::Html;
use tracing::debug;
use url::Url;

use super::calendar::decode_calendar_path;
use crate::error::{Result, ScrapeError};
use crate::scraper::dom::{self, Row};
use crate::scraper::fields;
use crate::scraper::lookup::CourseTable;
use crate::types::RaceInfo;

/// Parser for race list pages
pub struct RaceListParser;

impl RaceListParser {
    /// Snapshot the race table; rows are decoded as the result is iterated.
    pub fn parse(html: &str, page_url: &Url, courses: &CourseTable) -> Result<RaceRows> {
        let (date, course) = decode_calendar_path(page_url.path(), courses)?.ok_or_else(|| {
            ScrapeError::structure(format!("not a race-day URL: {page_url}"))
        })?;

        let document = Html::parse_document(html);
        let tbody = dom::find_body(&document, Self::is_race_row)
            .ok_or_else(|| ScrapeError::structure("race list has no race table"))?;
        let rows = dom::body_rows(tbody);

        Ok(RaceRows {
            rows: rows.into_iter(),
            date,
            course,
            base: page_url.clone(),
        })
    }

    /// Race rows are headed by the race number and carry name, track and
    /// head count.
    fn is_race_row(row: &Row) -> bool {
        row.cells.len() >= 3
            && row
                .header
                .as_ref()
                .is_some_and(|th| fields::int_or_none(th.trimmed()).is_some())
    }
}

/// Lazy sequence of races from one fetched race list page
#[derive(Debug)]
pub struct RaceRows {
    rows: std::vec::IntoIter<Row>,
    date: NaiveDate,
    course: &'static str,
    base: Url,
}

impl RaceRows {
    /// `Ok(None)` for section separators and placeholder rows.
    fn decode(&self, row: &Row) -> Result<Option<RaceInfo>> {
        // Section separators have no header cell
        let Some(header) = &row.header else {
            debug!("Skipping separator row");
            return Ok(None);
        };
        let race_no = fields::required_int(header.trimmed(), "race number")?;

        // Placeholder rows have no link to the race
        let Some(link) = &row.cell(0)?.link else {
            debug!("Skipping race {} without link", race_no);
            return Ok(None);
        };
        let url = self.base.join(link.href()?)?;
        let (track_type, distance) = fields::track(row.cell(1)?.trimmed())?;

        Ok(Some(RaceInfo {
            date: self.date,
            course: self.course.to_string(),
            race_no: Some(race_no),
            race_name: link.text.trim().to_string(),
            track_type,
            distance,
            condition: None,
            horse_num: fields::int_or_none(row.cell(2)?.trimmed()),
            url: Some(url.to_string()),
        }))
    }
}

impl Iterator for RaceRows {
    type Item = Result<RaceInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(row) = self.rows.next() {
            match self.decode(&row) {
                Ok(Some(race)) => return Some(Ok(race)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
