#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Helvetica,
    Times,
    Courier,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
}

impl FontStyle {
    pub fn is_bold(self) -> bool {
        self == FontStyle::Bold
    }
}

/// PostScript name of the base-14 font for a family/style pair.
pub(crate) fn base_font_name(family: FontFamily, style: FontStyle) -> &'static str {
    match (family, style) {
        (FontFamily::Helvetica, FontStyle::Normal) => "Helvetica",
        (FontFamily::Helvetica, FontStyle::Bold) => "Helvetica-Bold",
        (FontFamily::Helvetica, FontStyle::Italic) => "Helvetica-Oblique",
        (FontFamily::Times, FontStyle::Normal) => "Times-Roman",
        (FontFamily::Times, FontStyle::Bold) => "Times-Bold",
        (FontFamily::Times, FontStyle::Italic) => "Times-Italic",
        (FontFamily::Courier, FontStyle::Normal) => "Courier",
        (FontFamily::Courier, FontStyle::Bold) => "Courier-Bold",
        (FontFamily::Courier, FontStyle::Italic) => "Courier-Oblique",
    }
}

struct Metrics {
    /// Advance widths at 1000 units/em for ASCII 32..=126.
    ascii: [u16; 95],
    /// Used for the Latin-1 and WinAnsi extras above 126.
    fallback: u16,
}

#[rustfmt::skip]
static HELVETICA: Metrics = Metrics {
    ascii: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space../
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // 0-9
        278, 278, 584, 584, 584, 556, 1015,                                             // :..@
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // A-M
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // N-Z
        278, 278, 278, 469, 556, 333,                                                   // [..`
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // a-m
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // n-z
        334, 260, 334, 584,                                                             // {..~
    ],
    fallback: 556,
};

#[rustfmt::skip]
static HELVETICA_BOLD: Metrics = Metrics {
    ascii: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        333, 333, 584, 584, 584, 611, 975,
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        333, 278, 333, 584, 556, 333,
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        389, 280, 389, 584,
    ],
    fallback: 611,
};

#[rustfmt::skip]
static TIMES_ROMAN: Metrics = Metrics {
    ascii: [
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        278, 278, 564, 564, 564, 444, 921,
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
        333, 278, 333, 469, 500, 333,
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
        480, 200, 480, 541,
    ],
    fallback: 500,
};

#[rustfmt::skip]
static TIMES_BOLD: Metrics = Metrics {
    ascii: [
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        333, 333, 570, 570, 570, 500, 930,
        722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
        722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
        333, 278, 333, 581, 500, 333,
        500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
        556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
        394, 220, 394, 520,
    ],
    fallback: 556,
};

static COURIER: Metrics = Metrics {
    ascii: [600; 95],
    fallback: 600,
};

fn metrics(family: FontFamily, style: FontStyle) -> &'static Metrics {
    // Oblique faces share their upright widths; Times-Italic is close enough to
    // Times-Roman for line breaking.
    match family {
        FontFamily::Helvetica if style.is_bold() => &HELVETICA_BOLD,
        FontFamily::Helvetica => &HELVETICA,
        FontFamily::Times if style.is_bold() => &TIMES_BOLD,
        FontFamily::Times => &TIMES_ROMAN,
        FontFamily::Courier => &COURIER,
    }
}

/// Width of a single character in 1000-units. Characters outside WinAnsi are
/// dropped when the PDF is written, so they measure as zero.
pub(crate) fn char_width_1000(family: FontFamily, style: FontStyle, ch: char) -> f32 {
    let m = metrics(family, style);
    match char_to_winansi(ch) {
        0 => 0.0,
        b @ 32..=126 => m.ascii[(b - 32) as usize] as f32,
        _ => m.fallback as f32,
    }
}

/// Width of `text` in points at `font_size` points.
pub fn text_width(text: &str, family: FontFamily, style: FontStyle, font_size: f32) -> f32 {
    text.chars()
        .map(|ch| char_width_1000(family, style, ch))
        .sum::<f32>()
        * font_size
        / 1000.0
}

/// Greedy word wrap: split `text` into lines no wider than `max_width` points.
/// Explicit newlines are hard breaks. Runs of spaces inside a line are kept
/// (code indentation survives); the single space a line is broken at is dropped.
/// A word wider than a whole line is broken between characters.
/// Empty input yields no lines.
pub fn split_text_to_size(
    text: &str,
    family: FontFamily,
    style: FontStyle,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    if text.is_empty() {
        return lines;
    }
    let width = |s: &str| text_width(s, family, style, font_size);
    let space_w = width(" ");

    for hard_line in text.split('\n') {
        let mut current = String::new();
        let mut current_w = 0.0f32;
        let mut first_word = true;

        for word in hard_line.split(' ') {
            let ww = width(word);
            let proposed = if first_word {
                ww
            } else {
                current_w + space_w + ww
            };

            if first_word || proposed <= max_width {
                if !first_word {
                    current.push(' ');
                }
                current.push_str(word);
                current_w = proposed;
                first_word = false;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_w = ww;
            }

            if current_w > max_width {
                // Break an over-long word; keep the remainder as the open line.
                let mut pieces = break_word(&current, max_width, &width);
                let rest = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
                current_w = width(&rest);
                current = rest;
            }
        }
        lines.push(current);
    }
    lines
}

fn break_word(word: &str, max_width: f32, width: &impl Fn(&str) -> f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if width(&piece) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    pieces.push(piece);
    pieces
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
pub(crate) fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Returns the bytes and the number of characters that had no mapping.
pub(crate) fn to_winansi_bytes(s: &str) -> (Vec<u8>, usize) {
    let mut dropped = 0;
    let bytes = s
        .chars()
        .filter_map(|c| match char_to_winansi(c) {
            0 => {
                dropped += 1;
                None
            }
            b => Some(b),
        })
        .collect();
    (bytes, dropped)
}
