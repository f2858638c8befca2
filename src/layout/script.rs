use crate::error::{Error, Result};
use crate::fonts::{self, FontFamily, FontStyle};

use super::{PT_TO_MM, RectStyle, Surface, TextAlign};

/// One positioned drawing primitive. Coordinates are millimetres from the
/// top-left corner of the page; text `y` is the baseline.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        align: TextAlign,
        font: FontFamily,
        style: FontStyle,
        size: f32,
        color: [u8; 3],
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        style: RectStyle,
        fill: [u8; 3],
        stroke: [u8; 3],
        line_width: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: [u8; 3],
        line_width: f32,
    },
}

#[derive(Clone, Debug)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Every text run on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, y, .. } => Some((text.as_str(), *y)),
            _ => None,
        })
    }
}

#[derive(Clone, Copy, Debug)]
struct GraphicsState {
    font: FontFamily,
    style: FontStyle,
    size: f32,
    text_color: [u8; 3],
    fill_color: [u8; 3],
    draw_color: [u8; 3],
    line_width: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        GraphicsState {
            font: FontFamily::Helvetica,
            style: FontStyle::Normal,
            size: 12.0,
            text_color: [0, 0, 0],
            fill_color: [0, 0, 0],
            draw_color: [0, 0, 0],
            line_width: 0.2,
        }
    }
}

/// In-memory multi-page drawing script. Every primitive captures the graphics
/// state it was drawn with, so pages can be revisited (`set_page`) without
/// replaying state changes.
#[derive(Debug, Default)]
pub struct Script {
    pages: Vec<Page>,
    current: Option<usize>,
    state: GraphicsState,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    fn current_page(&mut self) -> Result<&mut Page> {
        let idx = self.current.ok_or(Error::NoPage)?;
        self.pages.get_mut(idx).ok_or(Error::NoPage)
    }

    fn push(&mut self, op: DrawOp) -> Result<()> {
        self.current_page()?.ops.push(op);
        Ok(())
    }
}

impl Surface for Script {
    fn add_page(&mut self, width: f32, height: f32) -> Result<()> {
        self.pages.push(Page {
            width,
            height,
            ops: Vec::new(),
        });
        self.current = Some(self.pages.len() - 1);
        Ok(())
    }

    fn set_page(&mut self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(Error::PageOutOfRange {
                index,
                count: self.pages.len(),
            });
        }
        self.current = Some(index);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn set_font(&mut self, family: FontFamily, style: FontStyle) {
        self.state.font = family;
        self.state.style = style;
    }

    fn set_font_size(&mut self, size_pt: f32) {
        self.state.size = size_pt;
    }

    fn set_text_color(&mut self, rgb: [u8; 3]) {
        self.state.text_color = rgb;
    }

    fn set_fill_color(&mut self, rgb: [u8; 3]) {
        self.state.fill_color = rgb;
    }

    fn set_draw_color(&mut self, rgb: [u8; 3]) {
        self.state.draw_color = rgb;
    }

    fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    fn split_text_to_size(&self, text: &str, max_width: f32) -> Vec<String> {
        let s = &self.state;
        fonts::split_text_to_size(text, s.font, s.style, s.size, max_width / PT_TO_MM)
    }

    fn text(&mut self, text: &str, x: f32, y: f32, align: TextAlign) -> Result<()> {
        let s = self.state;
        self.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            align,
            font: s.font,
            style: s.style,
            size: s.size,
            color: s.text_color,
        })
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, style: RectStyle) -> Result<()> {
        let s = self.state;
        self.push(DrawOp::Rect {
            x,
            y,
            w,
            h,
            style,
            fill: s.fill_color,
            stroke: s.draw_color,
            line_width: s.line_width,
        })
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()> {
        let s = self.state;
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color: s.draw_color,
            line_width: s.line_width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drawing_without_a_page_fails() {
        let mut script = Script::new();
        assert!(matches!(
            script.text("x", 0.0, 0.0, TextAlign::Left),
            Err(Error::NoPage)
        ));
    }

    #[test]
    fn set_page_out_of_range() {
        let mut script = Script::new();
        script.add_page(210.0, 297.0).unwrap();
        assert!(matches!(
            script.set_page(1),
            Err(Error::PageOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn ops_capture_state_and_target_selected_page() {
        let mut script = Script::new();
        script.add_page(210.0, 297.0).unwrap();
        script.add_page(210.0, 297.0).unwrap();
        script.set_font(FontFamily::Courier, FontStyle::Bold);
        script.set_font_size(9.0);
        script.set_text_color([1, 2, 3]);
        script.set_page(0).unwrap();
        script.text("first", 10.0, 20.0, TextAlign::Center).unwrap();

        assert_eq!(script.pages()[1].ops.len(), 0);
        assert_eq!(
            script.pages()[0].ops[0],
            DrawOp::Text {
                text: "first".into(),
                x: 10.0,
                y: 20.0,
                align: TextAlign::Center,
                font: FontFamily::Courier,
                style: FontStyle::Bold,
                size: 9.0,
                color: [1, 2, 3],
            }
        );
    }

    #[test]
    fn wrapping_uses_millimetres() {
        let mut script = Script::new();
        script.set_font(FontFamily::Courier, FontStyle::Normal);
        script.set_font_size(10.0);
        // 6pt per char; 30pt expressed in mm
        let lines = script.split_text_to_size("aa bb cc dd", 30.0 * PT_TO_MM + 0.001);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }
}
