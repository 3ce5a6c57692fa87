//! Course name ↔ course ID table.
//!
//! JBIS puts a three-digit course ID into calendar and result URLs while
//! pages show the course name. The table covers the ten JRA venues and the
//! regional (NAR) venues the site links to.

use std::collections::HashMap;

use crate::error::{Result, ScrapeError};

/// Venues as (name, course ID)
pub const COURSES: [(&str, u16); 23] = [
    ("札幌", 101),
    ("函館", 102),
    ("福島", 103),
    ("新潟", 104),
    ("東京", 105),
    ("中山", 106),
    ("中京", 107),
    ("京都", 108),
    ("阪神", 109),
    ("小倉", 110),
    ("門別", 236),
    ("盛岡", 210),
    ("水沢", 211),
    ("浦和", 218),
    ("船橋", 219),
    ("大井", 220),
    ("川崎", 221),
    ("金沢", 222),
    ("笠松", 223),
    ("名古屋", 224),
    ("園田", 227),
    ("高知", 231),
    ("佐賀", 232),
];

/// Bidirectional course lookup
#[derive(Debug, Clone)]
pub struct CourseTable {
    by_name: HashMap<&'static str, u16>,
    by_id: HashMap<u16, &'static str>,
}

impl CourseTable {
    pub fn new() -> Self {
        Self {
            by_name: COURSES.iter().copied().collect(),
            by_id: COURSES.iter().map(|&(name, id)| (id, name)).collect(),
        }
    }

    /// Course ID for a course name, if the venue is known.
    pub fn id(&self, name: &str) -> Option<u16> {
        self.by_name.get(name).copied()
    }

    /// Course name for an ID taken from a site URL.
    ///
    /// The site only generates URLs for venues it knows, so a miss means a
    /// new venue or a corrupted URL and is reported as an error.
    pub fn name(&self, id: u16) -> Result<&'static str> {
        self.by_id
            .get(&id)
            .copied()
            .ok_or(ScrapeError::UnknownCourse(id))
    }
}

impl Default for CourseTable {
    fn default() -> Self {
        Self::new()
    }
}
