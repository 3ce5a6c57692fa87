//! Error type shared by the fetcher, the parsers and the access facade.

use thiserror::Error;

/// Errors raised while fetching or parsing JBIS pages.
///
/// Fields that are merely blank or non-numeric are not errors; the parsers
/// turn those into `None`. Everything here means the request failed or the
/// page no longer has the shape the parsers were written against.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The request could not be sent or the server answered with an error status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A URL could not be parsed or resolved.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A required element or pattern is missing from the page.
    #[error("unexpected page structure: {0}")]
    Structure(String),

    /// A course ID that is not in the venue table.
    #[error("unknown course id: {0}")]
    UnknownCourse(u16),

    /// A track-type glyph that is not in the glyph table.
    #[error("unknown track type: {0:?}")]
    UnknownTrackType(String),
}

impl ScrapeError {
    pub(crate) fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
