//! Record types produced by the JBIS parsers.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Horse profile header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorseInfo {
    pub name: String,
}

/// A scheduled (future) run of one of a sire's offspring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorseEntry {
    pub date: NaiveDate,
    pub course: String,
    pub race_no: u32,
    pub race_name: String,
    pub horse_name: String,
}

/// One race day at one course, as linked from the monthly calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceCalendar {
    pub date: NaiveDate,
    pub course: String,
    pub url: String,
}

/// Race information
///
/// Which optional fields are filled depends on the page the record came
/// from: the race list has no condition, a history row without a result
/// link has no race number or URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceInfo {
    pub date: NaiveDate,
    pub course: String,
    pub race_no: Option<u32>,
    pub race_name: String,
    pub track_type: TrackType,
    pub distance: u32, // meters
    pub condition: Option<String>,
    pub horse_num: Option<u32>,
    pub url: Option<String>,
}

/// One horse's result in one race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorseResult {
    pub order: Order,
    pub name: String,
    pub popularity: Option<u32>,
    pub weight: Option<u32>, // body weight, kg
    pub time: Option<Duration>,
    pub url: Option<String>,
    pub money: Option<u64>, // prize money, yen
    pub no: Option<u32>,
}

/// Surface of a race course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Turf,
    Dirt,
    Jump,
}

impl TrackType {
    pub const ALL: [TrackType; 3] = [TrackType::Turf, TrackType::Dirt, TrackType::Jump];

    /// Look up the one-character glyph used in race tables ("芝", "ダ", "障").
    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.glyph() == glyph)
    }

    pub fn glyph(self) -> char {
        match self {
            TrackType::Turf => '芝',
            TrackType::Dirt => 'ダ',
            TrackType::Jump => '障',
        }
    }

    /// Canonical name as the site spells it out.
    pub fn name(self) -> &'static str {
        match self {
            TrackType::Turf => "芝",
            TrackType::Dirt => "ダート",
            TrackType::Jump => "障害",
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Finishing status of a horse in a race.
///
/// The site shows the finishing position and the abnormal-finish marker in
/// separate columns; this is the merged value. `Finished` keeps the
/// position text exactly as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Order {
    Finished(String),
    /// 出走取消: withdrawn before the start
    Scratched,
    /// 競走除外: excluded from the race
    Disqualified,
    /// 競走中止: stopped during the race
    DidNotFinish,
}

impl Order {
    pub const SCRATCHED: &'static str = "出走取消";
    pub const DISQUALIFIED: &'static str = "競走除外";
    pub const DID_NOT_FINISH: &'static str = "競走中止";

    pub fn as_str(&self) -> &str {
        match self {
            Order::Finished(position) => position,
            Order::Scratched => Self::SCRATCHED,
            Order::Disqualified => Self::DISQUALIFIED,
            Order::DidNotFinish => Self::DID_NOT_FINISH,
        }
    }

    /// Numeric finishing place, if the horse was placed.
    pub fn rank(&self) -> Option<u32> {
        match self {
            Order::Finished(position)
                if !position.is_empty() && position.bytes().all(|b| b.is_ascii_digit()) =>
            {
                position.parse().ok()
            }
            _ => None,
        }
    }

    /// Whether the horse counts as a starter in a result page's head count.
    pub fn is_starter(&self) -> bool {
        self.rank().is_some() || *self == Order::DidNotFinish
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Order> for String {
    fn from(order: Order) -> Self {
        match order {
            Order::Finished(position) => position,
            other => other.as_str().to_string(),
        }
    }
}

impl From<String> for Order {
    fn from(label: String) -> Self {
        match label.as_str() {
            Order::SCRATCHED => Order::Scratched,
            Order::DISQUALIFIED => Order::Disqualified,
            Order::DID_NOT_FINISH => Order::DidNotFinish,
            _ => Order::Finished(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_type_glyphs() {
        for track in TrackType::ALL {
            assert_eq!(TrackType::from_glyph(track.glyph()), Some(track));
        }
        assert_eq!(TrackType::from_glyph('ダ').map(TrackType::name), Some("ダート"));
        assert_eq!(TrackType::from_glyph('砂'), None);
    }

    #[test]
    fn test_order_rank() {
        assert_eq!(Order::Finished("3".to_string()).rank(), Some(3));
        assert_eq!(Order::Finished("".to_string()).rank(), None);
        assert_eq!(Order::Finished("失".to_string()).rank(), None);
        assert_eq!(Order::DidNotFinish.rank(), None);
    }

    #[test]
    fn test_order_is_starter() {
        assert!(Order::Finished("12".to_string()).is_starter());
        assert!(Order::DidNotFinish.is_starter());
        assert!(!Order::Scratched.is_starter());
        assert!(!Order::Disqualified.is_starter());
    }

    #[test]
    fn test_order_serializes_as_label() {
        let json = serde_json::to_string(&Order::Scratched).unwrap();
        assert_eq!(json, "\"出走取消\"");
        let json = serde_json::to_string(&Order::Finished("1".to_string())).unwrap();
        assert_eq!(json, "\"1\"");

        let back: Order = serde_json::from_str("\"競走中止\"").unwrap();
        assert_eq!(back, Order::DidNotFinish);
    }

    #[test]
    fn test_track_type_serde() {
        assert_eq!(serde_json::to_string(&TrackType::Jump).unwrap(), "\"jump\"");
        assert_eq!(TrackType::Dirt.to_string(), "ダート");
    }
}
