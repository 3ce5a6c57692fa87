//! Horse profile parser.
//!
//! URL: https://www.jbis.or.jp/horse/HORSEID/

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::error::{Result, ScrapeError};
use crate::scraper::dom;
use crate::types::HorseInfo;

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());

/// Parser for horse profile pages
pub struct HorseInfoParser;

impl HorseInfoParser {
    pub fn parse(html: &str) -> Result<HorseInfo> {
        let document = Html::parse_document(html);
        let h1 = document
            .select(&H1)
            .next()
            .ok_or_else(|| ScrapeError::structure("horse page has no h1"))?;

        Ok(HorseInfo {
            name: dom::text(h1).trim().to_string(),
        })
    }
}
