//! Text helpers and owned snapshots of table rows.
//!
//! `scraper::Html` cannot be moved out of the call that parsed it while rows
//! still borrow from it, so the row-by-row parsers copy each `<tr>` into a
//! [`Row`] first and decode the snapshots lazily. Data tables are located
//! by the shape of their rows rather than by position.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};

static TH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static A: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static TBODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tbody").unwrap());
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());

/// All descendant text, concatenated.
pub fn text(elem: ElementRef<'_>) -> String {
    elem.text().collect()
}

/// First descendant text node, e.g. "480" out of `480<span>(+2)</span>`.
pub fn first_text(elem: ElementRef<'_>) -> Option<String> {
    elem.text().next().map(str::to_string)
}

/// Owned copy of a hyperlink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub href: Option<String>,
    pub text: String,
}

impl Link {
    pub fn from_element(elem: ElementRef<'_>) -> Self {
        Self {
            href: elem.value().attr("href").map(str::to_string),
            text: text(elem),
        }
    }

    pub fn href(&self) -> Result<&str> {
        self.href
            .as_deref()
            .ok_or_else(|| ScrapeError::structure("link without href"))
    }
}

/// Owned copy of a table cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub first_text: Option<String>,
    pub link: Option<Link>,
}

impl Cell {
    pub fn from_element(elem: ElementRef<'_>) -> Self {
        Self {
            text: text(elem),
            first_text: first_text(elem),
            link: elem.select(&A).next().map(Link::from_element),
        }
    }

    /// Full text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn first_text(&self) -> &str {
        self.first_text.as_deref().unwrap_or("")
    }

    pub fn link(&self) -> Result<&Link> {
        self.link
            .as_ref()
            .ok_or_else(|| ScrapeError::structure("cell has no link"))
    }
}

/// Owned copy of a `<tr>`: its first header cell and all data cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub header: Option<Cell>,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn from_element(tr: ElementRef<'_>) -> Self {
        Self {
            header: tr.select(&TH).next().map(Cell::from_element),
            cells: tr.select(&TD).map(Cell::from_element).collect(),
        }
    }

    pub fn header(&self) -> Result<&Cell> {
        self.header
            .as_ref()
            .ok_or_else(|| ScrapeError::structure("row has no header cell"))
    }

    pub fn cell(&self, index: usize) -> Result<&Cell> {
        self.cells.get(index).ok_or_else(|| {
            ScrapeError::structure(format!(
                "row has {} cells, expected at least {}",
                self.cells.len(),
                index + 1
            ))
        })
    }
}

/// Snapshot every row of a table body.
pub fn body_rows(tbody: ElementRef<'_>) -> Vec<Row> {
    tbody.select(&TR).map(Row::from_element).collect()
}

/// Whether any row of `tbody` has the shape of the wanted table.
pub fn body_matches(tbody: ElementRef<'_>, shape: impl Fn(&Row) -> bool) -> bool {
    tbody.select(&TR).any(|tr| shape(&Row::from_element(tr)))
}

/// First table body in the document holding a row of the wanted shape.
///
/// html5ever gives every table a `tbody`, including layout tables written
/// without one, so the first `tbody` is not necessarily the data table.
pub fn find_body<'a>(
    document: &'a Html,
    shape: impl Fn(&Row) -> bool,
) -> Option<ElementRef<'a>> {
    document
        .select(&TBODY)
        .find(|&tbody| body_matches(tbody, &shape))
}
