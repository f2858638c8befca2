mod error;
pub mod fonts;
pub mod layout;
pub mod markdown;
mod model;
mod pdf;
pub mod theme;

pub use error::{Error, Result};
pub use layout::{Script, Surface, layout_document, layout_markdown};
pub use model::{Block, ListItem, PageFormat, RenderOptions};
pub use theme::ThemeId;

use std::path::Path;
use std::time::Instant;

/// Lay out `markdown` and serialize the pages to PDF bytes.
pub fn render_markdown_to_pdf(markdown: &str, options: &RenderOptions) -> Result<Vec<u8>> {
    let t0 = Instant::now();

    let script = layout_markdown(markdown, options.format, options.theme)?;
    let t_layout = t0.elapsed();

    let bytes = pdf::render(&script, options.title.as_deref())?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, pdf={:.1}ms ({} pages, {} bytes, format={}, theme={})",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        script.pages().len(),
        bytes.len(),
        options.format,
        options.theme,
    );

    Ok(bytes)
}

pub fn convert_markdown_to_pdf(input: &Path, output: &Path, options: &RenderOptions) -> Result<()> {
    let markdown = std::fs::read_to_string(input)?;
    convert_markdown_str_to_pdf(&markdown, output, options)
}

pub fn convert_markdown_str_to_pdf(markdown: &str, output: &Path, options: &RenderOptions) -> Result<()> {
    let t0 = Instant::now();
    let bytes = render_markdown_to_pdf(markdown, options)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes to {})",
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
        output.display(),
    );

    Ok(())
}
