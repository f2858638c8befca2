use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Theme identifier outside documentation/manuscript/terminal.
    #[error("unknown theme: {0:?} (expected documentation, manuscript or terminal)")]
    UnknownTheme(String),

    /// Page format identifier outside A4/Letter/Legal.
    #[error("unknown page format: {0:?} (expected a4, letter or legal)")]
    UnknownPageFormat(String),

    /// A drawing primitive was issued before any page existed.
    #[error("drawing surface has no current page")]
    NoPage,

    #[error("page {index} is out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
