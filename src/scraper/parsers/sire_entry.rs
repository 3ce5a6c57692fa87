//! Sire entry parser.
//!
//! Lists the upcoming entries of a sire's offspring, grouped under one `h2`
//! heading per race day.
//! URL: https://www.jbis.or.jp/horse/SIREID/sire/entry/

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::scraper::dom::{self, Row};
use crate::scraper::fields;
use crate::types::HorseEntry;

static HEADING_OR_BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, tbody").unwrap());

static RACE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/race/(\d{4})(\d{2})(\d{2})/\d+/\d+\.html$").unwrap());

// Entry table columns (the course is the row header)
const COL_RACE_NO: usize = 0;
const COL_RACE: usize = 1;
const COL_HORSE: usize = 7;

/// Parser for sire entry pages
pub struct SireEntryParser;

impl SireEntryParser {
    /// Snapshot the entry tables in document order.
    ///
    /// Every `h2` owns the first entry table that follows it. A heading with
    /// no entry table after it means the page layout changed; it surfaces as
    /// an error item after the entries before it.
    pub fn parse(html: &str, page_url: &Url) -> SireEntries {
        let document = Html::parse_document(html);

        let mut rows = Vec::new();
        let mut open_headings = 0usize;
        for elem in document.select(&HEADING_OR_BODY) {
            if elem.value().name() == "h2" {
                open_headings += 1;
                continue;
            }
            // Layout tables get a tbody from the parser too
            if open_headings == 0 || !dom::body_matches(elem, Self::is_entry_row) {
                continue;
            }
            // Consecutive headings all resolve to this same table
            let body = dom::body_rows(elem);
            for _ in 0..open_headings {
                rows.extend(body.iter().cloned().map(Ok));
            }
            open_headings = 0;
        }
        if open_headings > 0 {
            rows.push(Err(ScrapeError::structure("entry heading without a table")));
        }

        SireEntries {
            rows: rows.into_iter(),
            base: page_url.clone(),
        }
    }

    /// Entry rows are headed by the course and link to the race.
    fn is_entry_row(row: &Row) -> bool {
        row.header.is_some()
            && row.cells.len() > COL_HORSE
            && row.cells[COL_RACE].link.is_some()
    }
}

/// Lazy sequence of offspring entries from one fetched sire page
#[derive(Debug)]
pub struct SireEntries {
    rows: std::vec::IntoIter<Result<Row>>,
    base: Url,
}

impl SireEntries {
    fn decode(&self, row: &Row) -> Result<HorseEntry> {
        let race = row.cell(COL_RACE)?.link()?;
        let href = race.href()?;
        let url = self.base.join(href)?;
        let caps = RACE_PATH_RE
            .captures(url.path())
            .ok_or_else(|| ScrapeError::structure(format!("unrecognized race link {href:?}")))?;

        Ok(HorseEntry {
            date: fields::date(&caps[1], &caps[2], &caps[3])?,
            course: row.header()?.trimmed().to_string(),
            race_no: fields::required_int(row.cell(COL_RACE_NO)?.trimmed(), "race number")?,
            race_name: race.text.trim().to_string(),
            horse_name: row.cell(COL_HORSE)?.trimmed().to_string(),
        })
    }
}

impl Iterator for SireEntries {
    type Item = Result<HorseEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(row.and_then(|row| self.decode(&row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PAGE_URL: &str = "https://www.jbis.or.jp/horse/0000989876/sire/entry/";

    const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<h1>キタサンブラック 産駒出走予定</h1>
<h2>2024年12月28日（土）</h2>
<table class="tbl-data-05">
  <thead>
    <tr><th>場</th><th>R</th><th>レース名</th><th>コース</th><th>頭数</th><th>枠</th><th>馬番</th><th>性齢</th><th>馬名</th></tr>
  </thead>
  <tbody>
    <tr>
      <th>中山</th>
      <td>11</td>
      <td><a href="/race/20241228/106/11.html">ホープフルS</a></td>
      <td>芝2000m</td>
      <td>18</td>
      <td>4</td>
      <td>7</td>
      <td>牡2</td>
      <td> クロワデュノール </td>
    </tr>
    <tr>
      <th>京都</th>
      <td>3</td>
      <td><a href="../../../../race/20241228/108/03.html">2歳未勝利</a></td>
      <td>ダ1800m</td>
      <td>16</td>
      <td>2</td>
      <td>3</td>
      <td>牝2</td>
      <td>サンプルホース</td>
    </tr>
  </tbody>
</table>
<h2>2025年1月5日（日）</h2>
<table class="tbl-data-05">
  <tbody>
    <tr>
      <th>中山</th>
      <td>11</td>
      <td><a href="/race/20250105/106/11.html">中山金杯</a></td>
      <td>芝2000m</td>
      <td>16</td>
      <td>1</td>
      <td>1</td>
      <td>牡4</td>
      <td>イクイノックスジュニア</td>
    </tr>
  </tbody>
</table>
</body>
</html>"#;

    fn parse(html: &str) -> SireEntries {
        SireEntryParser::parse(html, &Url::parse(PAGE_URL).unwrap())
    }

    #[test]
    fn test_parse_entries_in_document_order() {
        let entries: Vec<_> = parse(SAMPLE_HTML).collect::<Result<_>>().unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0],
            HorseEntry {
                date: NaiveDate::from_ymd_opt(2024, 12, 28).unwrap(),
                course: "中山".to_string(),
                race_no: 11,
                race_name: "ホープフルS".to_string(),
                horse_name: "クロワデュノール".to_string(),
            }
        );
        assert_eq!(entries[1].course, "京都");
        assert_eq!(entries[1].race_no, 3);
        assert_eq!(entries[2].date, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        assert_eq!(entries[2].race_name, "中山金杯");
    }

    #[test]
    fn test_unrecognized_race_link_surfaces_at_its_row() {
        let html = SAMPLE_HTML.replace("/race/20241228/106/11.html", "/race/result/20241228/106/11/");
        let mut entries = parse(&html);

        assert!(matches!(entries.next(), Some(Err(ScrapeError::Structure(_)))));
        assert_eq!(entries.next().unwrap().unwrap().course, "京都");
    }

    #[test]
    fn test_trailing_heading_without_table() {
        let html = SAMPLE_HTML.replace("</body>", "<h2>関連情報</h2><p>なし</p></body>");
        let entries: Vec<_> = parse(&html).collect();

        assert_eq!(entries.len(), 4);
        assert!(entries[..3].iter().all(Result::is_ok));
        assert!(matches!(entries[3], Err(ScrapeError::Structure(_))));
    }

    #[test]
    fn test_layout_table_between_heading_and_entries() {
        let html = SAMPLE_HTML.replace(
            "<h2>2024年12月28日（土）</h2>",
            r#"<h2>2024年12月28日（土）</h2>
<table class="tbl-info"><tr><th>出走頭数</th><td>2頭</td></tr></table>"#,
        );
        let entries: Vec<_> = parse(&html).collect::<Result<_>>().unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].horse_name, "クロワデュノール");
    }

    #[test]
    fn test_no_entries() {
        let mut entries = parse("<html><body><h1>産駒出走予定</h1></body></html>");
        assert!(entries.next().is_none());
    }
}
