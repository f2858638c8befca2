use crate::error::Result;
use crate::fonts::{FontFamily, FontStyle};
use crate::model::PageFormat;
use crate::theme::Theme;

use super::{PT_TO_MM, RectStyle, Surface, TextAlign};

const MARGIN_X: f32 = 20.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 22.0;
/// Slack for accumulated float error when comparing against the bottom margin.
const FIT_EPSILON: f32 = 1e-3;

/// Fixed page geometry in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_x: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageGeometry {
    pub fn for_format(format: PageFormat) -> Self {
        let (page_width, page_height) = format.size_mm();
        PageGeometry {
            page_width,
            page_height,
            margin_x: MARGIN_X,
            margin_top: MARGIN_TOP,
            margin_bottom: MARGIN_BOTTOM,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin_x
    }

    /// Lowest y content may reach.
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.margin_bottom
    }

    pub fn content_height(&self) -> f32 {
        self.content_bottom() - self.margin_top
    }
}

/// Cursor state for one document render. `y` only grows within a physical
/// page and is reset by `start_new_page`.
pub struct RenderContext<'a, S: Surface> {
    surface: &'a mut S,
    theme: &'static Theme,
    geometry: PageGeometry,
    y: f32,
    font_size: f32,
}

impl<'a, S: Surface> RenderContext<'a, S> {
    pub fn new(surface: &'a mut S, theme: &'static Theme, geometry: PageGeometry) -> Self {
        RenderContext {
            surface,
            theme,
            geometry,
            y: geometry.margin_top,
            font_size: theme.typography.base_size,
        }
    }

    pub fn theme(&self) -> &'static Theme {
        self.theme
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn surface(&mut self) -> &mut S {
        &mut *self.surface
    }

    pub fn at_page_top(&self) -> bool {
        self.y <= self.geometry.margin_top
    }

    /// Append a physical page, paint the theme background and reset the cursor.
    pub fn start_new_page(&mut self) -> Result<()> {
        let g = self.geometry;
        self.surface.add_page(g.page_width, g.page_height)?;
        self.surface.set_fill_color(self.theme.palette.background);
        self.surface
            .rect(0.0, 0.0, g.page_width, g.page_height, RectStyle::Fill)?;
        self.y = g.margin_top;
        log::debug!("physical page {} started", self.surface.page_count());
        Ok(())
    }

    /// Break to a new page unless `h` more millimetres fit above the bottom margin.
    pub fn ensure_space(&mut self, h: f32) -> Result<()> {
        if self.y + h > self.geometry.content_bottom() + FIT_EPSILON {
            self.start_new_page()?;
        }
        Ok(())
    }

    pub fn advance(&mut self, dy: f32) {
        self.y += dy.max(0.0);
    }

    pub fn set_font(&mut self, family: FontFamily, style: FontStyle, size_pt: f32, color: [u8; 3]) {
        self.surface.set_font(family, style);
        self.surface.set_font_size(size_pt);
        self.surface.set_text_color(color);
        self.font_size = size_pt;
    }

    pub fn wrap(&self, text: &str, max_width: f32) -> Vec<String> {
        self.surface.split_text_to_size(text, max_width)
    }

    /// Line height in millimetres for a point size and leading multiplier.
    pub fn line_height(&self, size_pt: f32, multiplier: f32) -> f32 {
        size_pt * multiplier * PT_TO_MM
    }

    /// Baseline of a line box of height `line_h` whose top is at `top`.
    pub fn baseline(&self, top: f32, line_h: f32) -> f32 {
        top + (line_h + self.font_size * PT_TO_MM * 0.7) / 2.0
    }

    /// Draw wrapped lines at `x`, checking for overflow before each one.
    pub fn draw_lines(&mut self, lines: &[String], x: f32, line_h: f32) -> Result<()> {
        for line in lines {
            self.ensure_space(line_h)?;
            let baseline = self.baseline(self.y, line_h);
            self.surface.text(line, x, baseline, TextAlign::Left)?;
            self.y += line_h;
        }
        Ok(())
    }

    /// Full-width horizontal rule at `y` in the theme's rule colour.
    pub fn rule(&mut self, y: f32) -> Result<()> {
        let g = self.geometry;
        self.surface.set_draw_color(self.theme.palette.rule);
        self.surface.set_line_width(0.4);
        self.surface
            .line(g.margin_x, y, g.page_width - g.margin_x, y)
    }

    /// Stamp "i / N" centred in the bottom margin of every page. Never moves
    /// the cursor or adds pages.
    pub fn number_pages(&mut self) -> Result<()> {
        let total = self.surface.page_count();
        let t = &self.theme.typography;
        let g = self.geometry;
        for i in 0..total {
            self.surface.set_page(i)?;
            self.surface.set_font(t.body_font, FontStyle::Normal);
            self.surface.set_font_size(t.footer_size);
            self.surface.set_text_color(self.theme.palette.footer);
            self.surface.text(
                &format!("{} / {}", i + 1, total),
                g.page_width / 2.0,
                g.page_height - g.margin_bottom / 2.0,
                TextAlign::Center,
            )?;
        }
        Ok(())
    }
}
