use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::theme::ThemeId;

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    Blockquote { text: String },
    List { items: Vec<ListItem> },
    Code { language: String, code: String },
    /// First row is the header. Every row has the same number of cells.
    Table { rows: Vec<Vec<String>> },
    Hr,
    Spacer,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListItem {
    /// None = plain bullet, Some(state) = checkbox
    pub checked: Option<bool>,
    pub text: String,
    /// Literal number label for ordered items ("1.", "2."). Bullets leave it empty.
    pub marker: String,
}

impl ListItem {
    pub fn bullet(text: impl Into<String>) -> Self {
        ListItem {
            checked: None,
            text: text.into(),
            marker: String::new(),
        }
    }

    pub fn checkbox(checked: bool, text: impl Into<String>) -> Self {
        ListItem {
            checked: Some(checked),
            text: text.into(),
            marker: String::new(),
        }
    }

    /// The literal prefix drawn in front of the item text.
    pub fn prefix(&self) -> &str {
        match self.checked {
            Some(true) => "[x]",
            Some(false) => "[ ]",
            None if !self.marker.is_empty() => &self.marker,
            None => "-",
        }
    }
}

#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PageFormat {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PageFormat {
    /// (width, height) in millimetres, portrait.
    pub fn size_mm(self) -> (f32, f32) {
        match self {
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::Letter => (215.9, 279.4),
            PageFormat::Legal => (215.9, 355.6),
        }
    }
}

impl FromStr for PageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageFormat::A4),
            "letter" => Ok(PageFormat::Letter),
            "legal" => Ok(PageFormat::Legal),
            _ => Err(Error::UnknownPageFormat(s.to_string())),
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageFormat::A4 => "a4",
            PageFormat::Letter => "letter",
            PageFormat::Legal => "legal",
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub format: PageFormat,
    pub theme: ThemeId,
    /// Written to the PDF document info. Layout never reads it.
    pub title: Option<String>,
}
