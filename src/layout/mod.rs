mod blocks;
mod context;
mod script;

use crate::error::Result;
use crate::fonts::{FontFamily, FontStyle};
use crate::markdown::{parse_blocks, split_logical_pages};
use crate::model::PageFormat;
use crate::theme::ThemeId;

pub use context::{PageGeometry, RenderContext};
pub use script::{DrawOp, Page, Script};

/// Millimetres per point.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RectStyle {
    Fill,
    Stroke,
    FillStroke,
}

/// A page-drawing backend. Lengths are millimetres, origin top-left, font
/// sizes in points. State setters affect every primitive drawn after them.
pub trait Surface {
    /// Append a blank page and make it current.
    fn add_page(&mut self, width: f32, height: f32) -> Result<()>;
    fn set_page(&mut self, index: usize) -> Result<()>;
    fn page_count(&self) -> usize;

    fn set_font(&mut self, family: FontFamily, style: FontStyle);
    fn set_font_size(&mut self, size_pt: f32);
    fn set_text_color(&mut self, rgb: [u8; 3]);
    fn set_fill_color(&mut self, rgb: [u8; 3]);
    fn set_draw_color(&mut self, rgb: [u8; 3]);
    fn set_line_width(&mut self, width: f32);

    /// Wrap `text` in the current font into lines no wider than `max_width`.
    fn split_text_to_size(&self, text: &str, max_width: f32) -> Vec<String>;

    /// Draw one line of text with its baseline at `y`.
    fn text(&mut self, text: &str, x: f32, y: f32, align: TextAlign) -> Result<()>;
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, style: RectStyle) -> Result<()>;
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()>;
}

/// Lay out a whole Markdown document onto `surface`: one run of physical pages
/// per logical page, then the "i / N" footer on every page.
pub fn layout_document<S: Surface>(
    surface: &mut S,
    markdown: &str,
    format: PageFormat,
    theme: ThemeId,
) -> Result<()> {
    let logical_pages = split_logical_pages(markdown);
    let mut ctx = RenderContext::new(surface, theme.theme(), PageGeometry::for_format(format));

    for (i, text) in logical_pages.iter().enumerate() {
        let blocks = parse_blocks(text);
        log::debug!(
            "logical page {}/{}: {} blocks",
            i + 1,
            logical_pages.len(),
            blocks.len()
        );
        ctx.start_new_page()?;
        blocks::render_blocks(&mut ctx, &blocks)?;
    }

    ctx.number_pages()
}

/// Convenience wrapper: lay out into a fresh in-memory [`Script`].
pub fn layout_markdown(markdown: &str, format: PageFormat, theme: ThemeId) -> Result<Script> {
    let mut script = Script::new();
    layout_document(&mut script, markdown, format, theme)?;
    Ok(script)
}
