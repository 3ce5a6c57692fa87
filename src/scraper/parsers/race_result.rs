//! Race result parser.
//!
//! Parses a race result page into race info and one result per horse.
//! URL: https://www.jbis.or.jp/race/result/YYYYMMDD/CCC/NN/

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::scraper::dom::{self, Row};
use crate::scraper::fields;
use crate::types::{HorseResult, RaceInfo, TrackType};

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static H2: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());
static TRACK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.doc-race-01 em").unwrap());
static CONDITIONS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.list-inline-02").unwrap());
static LI: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static RESULT_BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.tbl-data-04 > tbody").unwrap());

// "2024年12月22日（日）5回中山8日"
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})年(\d{1,2})月(\d{1,2})日（.）\d{1,2}回(.+?)\d{1,2}日").unwrap()
});
// "11R 有馬記念"
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,2})R (.+)").unwrap());

// Result table columns (the finishing position is the row header)
const COL_NO: usize = 1;
const COL_NAME: usize = 2;
const COL_TIME: usize = 5;
const COL_ABEND: usize = 6;
const COL_POPULARITY: usize = 10;
const COL_WEIGHT: usize = 11;

/// Parser for race result pages
pub struct RaceResultParser;

impl RaceResultParser {
    /// Parse race result HTML
    ///
    /// Returns race info and the results in table order. The head count on
    /// the race info only includes horses that actually ran: placed
    /// finishers and those that stopped during the race.
    pub fn parse(html: &str, page_url: &Url) -> Result<(RaceInfo, Vec<HorseResult>)> {
        let document = Html::parse_document(html);

        let (date, course) = Self::parse_heading(&document)?;
        let (race_no, race_name) = Self::parse_title(&document)?;
        let (track_type, distance) = Self::parse_track(&document)?;
        let condition = Self::parse_condition(&document)?;
        let results = Self::parse_results(&document, page_url)?;

        let horse_num = results.iter().filter(|r| r.order.is_starter()).count() as u32;

        let info = RaceInfo {
            date,
            course,
            race_no: Some(race_no),
            race_name,
            track_type,
            distance,
            condition: Some(condition),
            horse_num: Some(horse_num),
            url: Some(page_url.to_string()),
        };

        Ok((info, results))
    }

    fn parse_heading(document: &Html) -> Result<(NaiveDate, String)> {
        let h1 = document
            .select(&H1)
            .next()
            .ok_or_else(|| ScrapeError::structure("result page has no h1"))?;
        let text = dom::text(h1);
        let caps = HEADING_RE
            .captures(&text)
            .ok_or_else(|| ScrapeError::structure(format!("unrecognized race heading {text:?}")))?;

        let date = fields::date(&caps[1], &caps[2], &caps[3])?;
        Ok((date, caps[4].trim().to_string()))
    }

    fn parse_title(document: &Html) -> Result<(u32, String)> {
        let h2 = document
            .select(&H2)
            .next()
            .ok_or_else(|| ScrapeError::structure("result page has no h2"))?;
        let text = dom::first_text(h2).unwrap_or_default();
        let caps = TITLE_RE
            .captures(text.trim_start())
            .ok_or_else(|| ScrapeError::structure(format!("unrecognized race title {text:?}")))?;

        let race_no = fields::required_int(&caps[1], "race number")?;
        Ok((race_no, caps[2].trim().to_string()))
    }

    fn parse_track(document: &Html) -> Result<(TrackType, u32)> {
        let em = document
            .select(&TRACK)
            .next()
            .ok_or_else(|| ScrapeError::structure("result page has no track line"))?;
        fields::track(&dom::text(em))
    }

    /// Track condition from the third item, e.g. "馬場：良".
    fn parse_condition(document: &Html) -> Result<String> {
        let item = document
            .select(&CONDITIONS)
            .next()
            .and_then(|ul| ul.select(&LI).nth(2))
            .ok_or_else(|| ScrapeError::structure("result page has no track condition"))?;
        let text = dom::text(item);

        text.split('：')
            .nth(1)
            .map(|condition| condition.trim().to_string())
            .ok_or_else(|| ScrapeError::structure(format!("unrecognized condition {text:?}")))
    }

    fn parse_results(document: &Html, page_url: &Url) -> Result<Vec<HorseResult>> {
        // Only the first body holds finishers
        let tbody = document
            .select(&RESULT_BODY)
            .next()
            .ok_or_else(|| ScrapeError::structure("result page has no result table"))?;

        dom::body_rows(tbody)
            .iter()
            .map(|row| Self::parse_result_row(row, page_url))
            .collect()
    }

    fn parse_result_row(row: &Row, page_url: &Url) -> Result<HorseResult> {
        let abend = row.cell(COL_ABEND)?;
        let name = row.cell(COL_NAME)?.link()?;

        Ok(HorseResult {
            order: fields::order(row.header()?.trimmed(), Some(abend.trimmed())),
            name: name.text.trim().to_string(),
            popularity: fields::int_or_none(row.cell(COL_POPULARITY)?.trimmed()),
            weight: fields::body_weight(row.cell(COL_WEIGHT)?.first_text()),
            time: fields::race_time(&row.cell(COL_TIME)?.text),
            url: Some(page_url.join(name.href()?)?.to_string()),
            money: None,
            no: fields::int_or_none(row.cell(COL_NO)?.trimmed()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Order;
    use std::time::Duration;

    const PAGE_URL: &str = "https://www.jbis.or.jp/race/result/20241222/106/11/";

    const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<h1>2024年12月22日（日）5回中山8日</h1>
<h2>11R 有馬記念<span class="icon-grade">G1</span></h2>
<p class="doc-race-01"><em>芝2500m</em> 右</p>
<ul class="list-inline-02">
  <li>天候：晴</li>
  <li>発走：15:40</li>
  <li>馬場：良</li>
</ul>
<table class="tbl-data-04">
  <thead>
    <tr>
      <th>着順</th><th>枠</th><th>馬番</th><th>馬名</th><th>性齢</th><th>斤量</th>
      <th>タイム</th><th>事故</th><th>騎手</th><th>調教師</th><th>着差</th><th>人気</th><th>馬体重</th>
    </tr>
  </thead>
  <tbody>
    <tr>
      <th>1</th>
      <td>3</td>
      <td>5</td>
      <td><a href="/horse/0001339005/">レガレイラ</a></td>
      <td>牝3</td>
      <td>54.0</td>
      <td>2:31.8</td>
      <td></td>
      <td>戸崎圭太</td>
      <td>木村哲也</td>
      <td></td>
      <td>5</td>
      <td>480<span>(+2)</span></td>
    </tr>
    <tr>
      <th>2</th>
      <td>1</td>
      <td>2</td>
      <td><a href="/horse/0001330163/">シャフリヤール</a></td>
      <td>牡6</td>
      <td>58.0</td>
      <td>2:31.8</td>
      <td></td>
      <td>C.デムーロ</td>
      <td>藤原英昭</td>
      <td>クビ</td>
      <td>10</td>
      <td>478(-4)</td>
    </tr>
    <tr>
      <th></th>
      <td>6</td>
      <td>11</td>
      <td><a href="/horse/0001328442/">ダノンデサイル</a></td>
      <td>牡3</td>
      <td>55.0</td>
      <td></td>
      <td>中止</td>
      <td>横山典弘</td>
      <td>安田翔伍</td>
      <td></td>
      <td>6</td>
      <td>516(+6)</td>
    </tr>
    <tr>
      <th></th>
      <td>8</td>
      <td>16</td>
      <td><a href="/horse/0001331122/">ドウデュース</a></td>
      <td>牡5</td>
      <td>58.0</td>
      <td></td>
      <td>取消</td>
      <td>武豊</td>
      <td>友道康夫</td>
      <td></td>
      <td></td>
      <td>計不</td>
    </tr>
  </tbody>
</table>
</body>
</html>"#;

    fn parse(html: &str) -> Result<(RaceInfo, Vec<HorseResult>)> {
        RaceResultParser::parse(html, &Url::parse(PAGE_URL).unwrap())
    }

    #[test]
    fn test_parse_race_info() {
        let (info, _) = parse(SAMPLE_HTML).unwrap();

        assert_eq!(info.date, NaiveDate::from_ymd_opt(2024, 12, 22).unwrap());
        assert_eq!(info.course, "中山");
        assert_eq!(info.race_no, Some(11));
        assert_eq!(info.race_name, "有馬記念");
        assert_eq!(info.track_type, TrackType::Turf);
        assert_eq!(info.distance, 2500);
        assert_eq!(info.condition.as_deref(), Some("良"));
        assert_eq!(info.url.as_deref(), Some(PAGE_URL));
    }

    #[test]
    fn test_head_count_excludes_scratched() {
        let (info, results) = parse(SAMPLE_HTML).unwrap();

        assert_eq!(results.len(), 4);
        assert_eq!(info.horse_num, Some(3));
    }

    #[test]
    fn test_parse_results() {
        let (_, results) = parse(SAMPLE_HTML).unwrap();

        let winner = &results[0];
        assert_eq!(winner.order, Order::Finished("1".to_string()));
        assert_eq!(winner.name, "レガレイラ");
        assert_eq!(winner.no, Some(5));
        assert_eq!(winner.popularity, Some(5));
        assert_eq!(winner.weight, Some(480));
        assert_eq!(winner.time, Some(Duration::from_millis(151_800)));
        assert_eq!(winner.money, None);
        assert_eq!(
            winner.url.as_deref(),
            Some("https://www.jbis.or.jp/horse/0001339005/")
        );

        assert_eq!(results[1].weight, Some(478));

        let stopped = &results[2];
        assert_eq!(stopped.order, Order::DidNotFinish);
        assert_eq!(stopped.time, None);

        let scratched = &results[3];
        assert_eq!(scratched.order, Order::Scratched);
        assert_eq!(scratched.popularity, None);
        assert_eq!(scratched.weight, None);
    }

    #[test]
    fn test_only_first_table_body_is_read() {
        let html = SAMPLE_HTML.replace(
            "  </tbody>\n</table>",
            "  </tbody>\n  <tbody>\n    <tr><th>備考</th><td>発走時刻変更</td></tr>\n  </tbody>\n</table>",
        );
        let (info, results) = parse(&html).unwrap();

        assert_eq!(results.len(), 4);
        assert_eq!(info.horse_num, Some(3));
    }

    #[test]
    fn test_heading_mismatch_is_an_error() {
        let html = SAMPLE_HTML.replace("2024年12月22日（日）5回中山8日", "有馬記念");
        assert!(matches!(parse(&html), Err(ScrapeError::Structure(_))));
    }

    #[test]
    fn test_title_mismatch_is_an_error() {
        let html = SAMPLE_HTML.replace("11R 有馬記念", "有馬記念");
        assert!(matches!(parse(&html), Err(ScrapeError::Structure(_))));
    }

    #[test]
    fn test_empty_html() {
        assert!(parse("<html></html>").is_err());
    }
}
