//! Monthly race calendar parser.
//!
//! The calendar page links every race day at every course as
//! `/race/calendar/YYYYMMDD/CCC/`. It also carries plenty of unrelated
//! navigation links, which are skipped.

use std::sync::{Arc, LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::error::Result;
use crate::scraper::fields;
use crate::scraper::lookup::CourseTable;
use crate::types::RaceCalendar;

static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static CALENDAR_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/race/calendar/(\d{4})(\d{2})(\d{2})/(\d{3})/$").unwrap()
});

/// Decode date and course name from a calendar-day URL path.
///
/// Returns `Ok(None)` when the path is not a calendar-day link at all.
pub fn decode_calendar_path(
    path: &str,
    courses: &CourseTable,
) -> Result<Option<(NaiveDate, &'static str)>> {
    let Some(caps) = CALENDAR_PATH_RE.captures(path) else {
        return Ok(None);
    };

    let date = fields::date(&caps[1], &caps[2], &caps[3])?;
    let course_id: u16 = fields::required_int(&caps[4], "course id")? as u16;
    let course = courses.name(course_id)?;

    Ok(Some((date, course)))
}

/// Parser for the monthly calendar page
pub struct CalendarParser;

impl CalendarParser {
    /// Collect the page's links; decoding happens as the result is iterated.
    pub fn parse(html: &str, page_url: &Url, courses: Arc<CourseTable>) -> CalendarEntries {
        let document = Html::parse_document(html);
        let hrefs: Vec<String> = document
            .select(&LINK)
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect();

        CalendarEntries {
            hrefs: hrefs.into_iter(),
            base: page_url.clone(),
            courses,
        }
    }
}

/// Lazy sequence of calendar entries from one fetched calendar page
#[derive(Debug)]
pub struct CalendarEntries {
    hrefs: std::vec::IntoIter<String>,
    base: Url,
    courses: Arc<CourseTable>,
}

impl Iterator for CalendarEntries {
    type Item = Result<RaceCalendar>;

    fn next(&mut self) -> Option<Self::Item> {
        for href in self.hrefs.by_ref() {
            let Ok(url) = self.base.join(&href) else {
                continue;
            };

            match decode_calendar_path(url.path(), &self.courses) {
                Ok(Some((date, course))) => {
                    return Some(Ok(RaceCalendar {
                        date,
                        course: course.to_string(),
                        url: url.to_string(),
                    }));
                }
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
