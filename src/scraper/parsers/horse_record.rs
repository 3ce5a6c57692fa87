//! Horse race-record parser.
//!
//! Parses the full race history of one horse.
//! URL: https://www.jbis.or.jp/horse/HORSEID/record/all/

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::scraper::dom::{self, Row};
use crate::scraper::fields;
use crate::types::{HorseResult, RaceInfo};

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());

static RESULT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/race/result/\d{8}/\d{3}/(\d{2})/").unwrap());

// Record table columns (the race date is the row header)
const COL_COURSE: usize = 0;
const COL_RACE: usize = 1;
const COL_TRACK: usize = 2;
const COL_DISTANCE: usize = 3;
const COL_CONDITION: usize = 4;
const COL_HORSE_NUM: usize = 5;
const COL_NO: usize = 6;
const COL_POPULARITY: usize = 7;
const COL_ORDER: usize = 8;
const COL_TIME: usize = 10;
const COL_ABEND: usize = 11;
const COL_WEIGHT: usize = 12;
const COL_MONEY: usize = 13;

const DATE_FORMAT: &str = "%Y/%m/%d";

/// Relative path of the full history below a horse page
pub const RECORD_PATH: &str = "record/all/";

/// Parser for horse race-record pages
pub struct HorseRecordParser;

impl HorseRecordParser {
    /// Parse a horse's race history.
    ///
    /// `horse_url` is the horse page the history belongs to and becomes the
    /// URL of every result; `record_url` is the page that was fetched and
    /// resolves the race links. The list comes back sorted by race date,
    /// oldest first.
    pub fn parse(
        html: &str,
        horse_url: &Url,
        record_url: &Url,
    ) -> Result<Vec<(RaceInfo, HorseResult)>> {
        let document = Html::parse_document(html);

        let name = document
            .select(&H1)
            .next()
            .map(|h1| dom::text(h1).trim().to_string())
            .ok_or_else(|| ScrapeError::structure("record page has no h1"))?;
        let tbody = dom::find_body(&document, Self::is_record_row)
            .ok_or_else(|| ScrapeError::structure("record page has no record table"))?;

        let mut races = dom::body_rows(tbody)
            .iter()
            .map(|row| Self::parse_row(row, &name, horse_url, record_url))
            .collect::<Result<Vec<_>>>()?;

        races.sort_by_key(|(race, _)| race.date);
        Ok(races)
    }

    /// Record rows are headed by the race date.
    fn is_record_row(row: &Row) -> bool {
        row.cells.len() > COL_MONEY
            && row
                .header
                .as_ref()
                .is_some_and(|th| NaiveDate::parse_from_str(th.trimmed(), DATE_FORMAT).is_ok())
    }

    fn parse_row(
        row: &Row,
        name: &str,
        horse_url: &Url,
        record_url: &Url,
    ) -> Result<(RaceInfo, HorseResult)> {
        let date_text = row.header()?.trimmed();
        let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT)
            .map_err(|_| ScrapeError::structure(format!("unrecognized race date {date_text:?}")))?;

        // Rows for races that were not run have no result link
        let race_cell = row.cell(COL_RACE)?;
        let (race_no, url) = match &race_cell.link {
            Some(link) => {
                let href = link.href()?;
                let caps = RESULT_LINK_RE.captures(href).ok_or_else(|| {
                    ScrapeError::structure(format!("unrecognized result link {href:?}"))
                })?;
                let race_no = fields::required_int(&caps[1], "race number")?;
                (Some(race_no), Some(record_url.join(href)?.to_string()))
            }
            None => (None, None),
        };

        let condition = row.cell(COL_CONDITION)?.trimmed();

        let race = RaceInfo {
            date,
            course: row.cell(COL_COURSE)?.trimmed().to_string(),
            race_no,
            race_name: race_cell.trimmed().to_string(),
            track_type: fields::track_glyph(row.cell(COL_TRACK)?.trimmed())?,
            distance: fields::required_int(row.cell(COL_DISTANCE)?.trimmed(), "distance")?,
            condition: (!condition.is_empty()).then(|| condition.to_string()),
            horse_num: fields::int_or_none(row.cell(COL_HORSE_NUM)?.trimmed()),
            url,
        };

        let result = HorseResult {
            order: fields::order(
                row.cell(COL_ORDER)?.trimmed(),
                Some(row.cell(COL_ABEND)?.trimmed()),
            ),
            name: name.to_string(),
            popularity: fields::int_or_none(row.cell(COL_POPULARITY)?.trimmed()),
            weight: fields::body_weight(row.cell(COL_WEIGHT)?.first_text()),
            time: fields::race_time(row.cell(COL_TIME)?.first_text()),
            url: Some(horse_url.to_string()),
            money: fields::money(row.cell(COL_MONEY)?.trimmed()),
            no: fields::int_or_none(row.cell(COL_NO)?.trimmed()),
        };

        Ok((race, result))
    }
}
