use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::fonts::FontFamily;

#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ThemeId {
    #[default]
    Documentation,
    Manuscript,
    Terminal,
}

pub struct Palette {
    pub background: [u8; 3],
    pub text: [u8; 3],
    pub heading: [u8; 3],
    pub muted: [u8; 3],
    pub rule: [u8; 3],
    pub quote_border: [u8; 3],
    pub code_background: [u8; 3],
    pub code_border: [u8; 3],
    pub code_text: [u8; 3],
    pub footer: [u8; 3],
}

pub struct Typography {
    pub body_font: FontFamily,
    pub heading_font: FontFamily,
    pub code_font: FontFamily,
    /// Body size in points.
    pub base_size: f32,
    pub code_size: f32,
    pub footer_size: f32,
    pub line_height: f32,
    pub code_line_height: f32,
    /// Multipliers of `base_size` for H1, H2, H3.
    pub heading_scale: [f32; 3],
}

pub struct Theme {
    pub palette: Palette,
    pub typography: Typography,
}

static DOCUMENTATION: Theme = Theme {
    palette: Palette {
        background: [255, 255, 255],
        text: [36, 41, 47],
        heading: [17, 24, 39],
        muted: [87, 96, 106],
        rule: [208, 215, 222],
        quote_border: [59, 130, 246],
        code_background: [246, 248, 250],
        code_border: [208, 215, 222],
        code_text: [36, 41, 47],
        footer: [120, 128, 138],
    },
    typography: Typography {
        body_font: FontFamily::Helvetica,
        heading_font: FontFamily::Helvetica,
        code_font: FontFamily::Courier,
        base_size: 11.0,
        code_size: 9.0,
        footer_size: 9.0,
        line_height: 1.45,
        code_line_height: 1.35,
        heading_scale: [2.0, 1.5, 1.25],
    },
};

static MANUSCRIPT: Theme = Theme {
    palette: Palette {
        background: [253, 251, 245],
        text: [40, 36, 30],
        heading: [20, 18, 15],
        muted: [110, 100, 88],
        rule: [190, 178, 160],
        quote_border: [160, 130, 90],
        code_background: [245, 240, 228],
        code_border: [214, 204, 186],
        code_text: [60, 52, 42],
        footer: [130, 120, 105],
    },
    typography: Typography {
        body_font: FontFamily::Times,
        heading_font: FontFamily::Times,
        code_font: FontFamily::Courier,
        base_size: 12.0,
        code_size: 9.5,
        footer_size: 9.5,
        line_height: 1.6,
        code_line_height: 1.35,
        heading_scale: [1.8, 1.4, 1.2],
    },
};

static TERMINAL: Theme = Theme {
    palette: Palette {
        background: [13, 17, 23],
        text: [201, 209, 217],
        heading: [126, 231, 135],
        muted: [139, 148, 158],
        rule: [48, 54, 61],
        quote_border: [126, 231, 135],
        code_background: [22, 27, 34],
        code_border: [48, 54, 61],
        code_text: [165, 214, 255],
        footer: [110, 118, 129],
    },
    typography: Typography {
        body_font: FontFamily::Courier,
        heading_font: FontFamily::Courier,
        code_font: FontFamily::Courier,
        base_size: 10.0,
        code_size: 9.0,
        footer_size: 8.5,
        line_height: 1.45,
        code_line_height: 1.3,
        heading_scale: [1.7, 1.4, 1.2],
    },
};

impl ThemeId {
    pub fn theme(self) -> &'static Theme {
        match self {
            ThemeId::Documentation => &DOCUMENTATION,
            ThemeId::Manuscript => &MANUSCRIPT,
            ThemeId::Terminal => &TERMINAL,
        }
    }
}

impl FromStr for ThemeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "documentation" => Ok(ThemeId::Documentation),
            "manuscript" => Ok(ThemeId::Manuscript),
            "terminal" => Ok(ThemeId::Terminal),
            _ => Err(Error::UnknownTheme(s.to_string())),
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemeId::Documentation => "documentation",
            ThemeId::Manuscript => "manuscript",
            ThemeId::Terminal => "terminal",
        })
    }
}

impl Typography {
    pub fn heading_size(&self, level: u8) -> f32 {
        let idx = (level.clamp(1, 3) - 1) as usize;
        self.base_size * self.heading_scale[idx]
    }
}
