//! Field extractors: raw cell text → typed values.
//!
//! Optional fields resolve to `None` when the text is blank or not in the
//! expected shape. Fields the page layout guarantees (track, race number,
//! dates) return an error instead.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Result, ScrapeError};
use crate::types::{Order, TrackType};

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:(\d):)?(\d{2})\.(\d)").unwrap());
static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.(\d)$").unwrap());
static WEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+)").unwrap());

/// Split a track string such as "芝1600m" into track type and distance.
///
/// The first character is the track glyph, the last one is the unit and
/// everything in between must be the distance in meters.
pub fn track(text: &str) -> Result<(TrackType, u32)> {
    let text = text.trim();
    let mut chars = text.chars();
    let glyph = chars
        .next()
        .ok_or_else(|| ScrapeError::structure("empty track string"))?;
    let track_type = TrackType::from_glyph(glyph)
        .ok_or_else(|| ScrapeError::UnknownTrackType(glyph.to_string()))?;

    chars.next_back();
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScrapeError::structure(format!(
            "no distance in track string {text:?}"
        )));
    }
    let distance = digits
        .parse()
        .map_err(|_| ScrapeError::structure(format!("distance out of range: {text:?}")))?;

    Ok((track_type, distance))
}

/// Track type from a cell holding the glyph alone ("芝", "ダ", "障").
pub fn track_glyph(text: &str) -> Result<TrackType> {
    let text = text.trim();
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(glyph), None) => TrackType::from_glyph(glyph)
            .ok_or_else(|| ScrapeError::UnknownTrackType(text.to_string())),
        _ => Err(ScrapeError::UnknownTrackType(text.to_string())),
    }
}

/// Parse a race time like "1:35.4" or "58.9".
pub fn race_time(text: &str) -> Option<Duration> {
    let caps = TIME_RE.captures(text)?;
    let minutes: u64 = caps
        .get(1)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    let seconds: u64 = caps[2].parse().ok()?;
    let tenths: u64 = caps[3].parse().ok()?;

    Some(Duration::from_secs(minutes * 60 + seconds) + Duration::from_millis(tenths * 100))
}

/// Merge the displayed position and the abnormal-finish marker.
///
/// A marker always wins over whatever the position column shows.
pub fn order(position: &str, marker: Option<&str>) -> Order {
    match marker.map(str::trim) {
        Some("取消") => Order::Scratched,
        Some("除外") => Order::Disqualified,
        Some("中止") => Order::DidNotFinish,
        _ => Order::Finished(position.to_string()),
    }
}

/// Prize money shown in units of 10,000 yen with one decimal ("123.4").
pub fn money(text: &str) -> Option<u64> {
    let caps = MONEY_RE.captures(text.trim())?;
    let man: u64 = caps[1].parse().ok()?;
    let tenth: u64 = caps[2].parse().ok()?;

    man.checked_mul(10_000)?.checked_add(tenth * 1_000)
}

/// Integer value of a cell that holds nothing but ASCII digits.
pub fn int_or_none(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Body weight from a cell such as "480(+2)"; the change in brackets is dropped.
pub fn body_weight(text: &str) -> Option<u32> {
    let caps = WEIGHT_RE.captures(text)?;
    caps[1].parse().ok()
}

/// Integer that the page layout guarantees, such as a race number.
pub fn required_int(text: &str, what: &str) -> Result<u32> {
    int_or_none(text)
        .ok_or_else(|| ScrapeError::structure(format!("{what} is not a number: {text:?}")))
}

/// Calendar date from year, month and day digits captured out of a URL or heading.
pub fn date(year: &str, month: &str, day: &str) -> Result<NaiveDate> {
    let invalid = || ScrapeError::structure(format!("invalid date {year}-{month}-{day}"));
    let year = year.parse().map_err(|_| invalid())?;
    let month = month.parse().map_err(|_| invalid())?;
    let day = day.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track() {
        assert_eq!(track("芝1600m").unwrap(), (TrackType::Turf, 1600));
        assert_eq!(track("ダ1200m").unwrap(), (TrackType::Dirt, 1200));
        assert_eq!(track("障3570m").unwrap(), (TrackType::Jump, 3570));
    }

    #[test]
    fn test_track_every_glyph_and_distance() {
        for track_type in TrackType::ALL {
            for distance in [800u32, 1000, 1150, 2400, 4250] {
                let text = format!("{}{}m", track_type.glyph(), distance);
                assert_eq!(track(&text).unwrap(), (track_type, distance));
            }
        }
    }

    #[test]
    fn test_track_unknown_glyph() {
        assert!(matches!(
            track("砂1600m"),
            Err(ScrapeError::UnknownTrackType(g)) if g == "砂"
        ));
    }

    #[test]
    fn test_track_bad_distance() {
        assert!(matches!(track("芝m"), Err(ScrapeError::Structure(_))));
        assert!(matches!(track("芝16OOm"), Err(ScrapeError::Structure(_))));
        assert!(track("").is_err());
    }

    #[test]
    fn test_track_glyph() {
        assert_eq!(track_glyph("芝").unwrap(), TrackType::Turf);
        assert_eq!(track_glyph(" ダ ").unwrap(), TrackType::Dirt);
        assert_eq!(track_glyph("障").unwrap(), TrackType::Jump);
        assert!(track_glyph("ダート").is_err());
        assert!(track_glyph("").is_err());
    }

    #[test]
    fn test_race_time() {
        assert_eq!(race_time("1:35.4"), Some(Duration::from_millis(95_400)));
        assert_eq!(race_time("58.9"), Some(Duration::from_millis(58_900)));
        assert_eq!(race_time(" 2:01.0 "), Some(Duration::from_millis(121_000)));
    }

    #[test]
    fn test_race_time_reconstructs_every_combination() {
        for minutes in [None, Some(0u64), Some(1), Some(3)] {
            for seconds in 0..60u64 {
                for tenth in 0..10u64 {
                    let text = match minutes {
                        Some(m) => format!("{m}:{seconds:02}.{tenth}"),
                        None => format!("{seconds:02}.{tenth}"),
                    };
                    let expected = minutes.unwrap_or(0) * 60_000 + seconds * 1_000 + tenth * 100;
                    assert_eq!(
                        race_time(&text),
                        Some(Duration::from_millis(expected)),
                        "{text}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_race_time_absent() {
        assert_eq!(race_time(""), None);
        assert_eq!(race_time("----"), None);
        assert_eq!(race_time("中止"), None);
    }

    #[test]
    fn test_order() {
        assert_eq!(order("5", None), Order::Finished("5".to_string()));
        assert_eq!(order("5", Some("")), Order::Finished("5".to_string()));
        assert_eq!(order("5", Some("取消")), Order::Scratched);
        assert_eq!(order("", Some("取消")), Order::Scratched);
        assert_eq!(order("12", Some("除外")), Order::Disqualified);
        assert_eq!(order("", Some(" 中止 ")), Order::DidNotFinish);
    }

    #[test]
    fn test_money() {
        assert_eq!(money("123.4"), Some(1_234_000));
        assert_eq!(money("250.0"), Some(2_500_000));
        assert_eq!(money("0.0"), Some(0));
        assert_eq!(money(""), None);
        assert_eq!(money("abc"), None);
        assert_eq!(money("123"), None);
        assert_eq!(money("12.34"), None);
        assert_eq!(money("1,234.5"), None);
    }

    #[test]
    fn test_int_or_none() {
        assert_eq!(int_or_none("7"), Some(7));
        assert_eq!(int_or_none(" 16 "), Some(16));
        assert_eq!(int_or_none(""), None);
        assert_eq!(int_or_none("-"), None);
        assert_eq!(int_or_none("計不"), None);
        assert_eq!(int_or_none("480(+2)"), None);
    }

    #[test]
    fn test_body_weight() {
        assert_eq!(body_weight("480(+2)"), Some(480));
        assert_eq!(body_weight("452(0)"), Some(452));
        assert_eq!(body_weight("計不"), None);
        assert_eq!(body_weight(""), None);
    }

    #[test]
    fn test_required_int() {
        assert_eq!(required_int("11", "race number").unwrap(), 11);
        assert!(matches!(
            required_int("R", "race number"),
            Err(ScrapeError::Structure(_))
        ));
    }

    #[test]
    fn test_date() {
        assert_eq!(
            date("2024", "01", "06").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()
        );
        assert!(date("2024", "13", "01").is_err());
        assert!(date("2023", "02", "29").is_err());
    }
}
