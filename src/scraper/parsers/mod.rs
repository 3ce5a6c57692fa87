//! HTML parsers for jbis.or.jp pages.

pub mod calendar;
pub mod horse_info;
pub mod horse_record;
pub mod race_list;
pub mod race_result;
pub mod sire_entry;

pub use calendar::{CalendarEntries, CalendarParser, decode_calendar_path};
pub use horse_info::HorseInfoParser;
pub use horse_record::HorseRecordParser;
pub use race_list::{RaceListParser, RaceRows};
pub use race_result::RaceResultParser;
pub use sire_entry::{SireEntries, SireEntryParser};
