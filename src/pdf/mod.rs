use std::collections::HashMap;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::fonts::{FontFamily, FontStyle, base_font_name, text_width, to_winansi_bytes};
use crate::layout::{DrawOp, Page, RectStyle, Script, TextAlign};

const MM_TO_PT: f32 = 72.0 / 25.4;
const PRODUCER: &str = concat!("mdpress-pdf ", env!("CARGO_PKG_VERSION"));

struct FontResource {
    pdf_name: String,
    font_ref: Ref,
}

fn set_fill(content: &mut Content, current: &mut Option<[u8; 3]>, rgb: [u8; 3]) {
    if *current != Some(rgb) {
        content.set_fill_rgb(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
        );
        *current = Some(rgb);
    }
}

fn set_stroke(content: &mut Content, rgb: [u8; 3], line_width: f32) {
    content.set_stroke_rgb(
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    );
    content.set_line_width(line_width * MM_TO_PT);
}

/// Write one page's primitives into a content stream. Returns the number of
/// characters that WinAnsi could not encode.
fn render_page(
    content: &mut Content,
    page: &Page,
    fonts: &HashMap<(FontFamily, FontStyle), FontResource>,
) -> usize {
    let page_h = page.height;
    let mut fill: Option<[u8; 3]> = None;
    let mut dropped = 0;

    for op in &page.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                w,
                h,
                style,
                fill: fill_rgb,
                stroke,
                line_width,
            } => {
                if matches!(style, RectStyle::Fill | RectStyle::FillStroke) {
                    set_fill(content, &mut fill, *fill_rgb);
                }
                if matches!(style, RectStyle::Stroke | RectStyle::FillStroke) {
                    set_stroke(content, *stroke, *line_width);
                }
                content.rect(
                    x * MM_TO_PT,
                    (page_h - y - h) * MM_TO_PT,
                    w * MM_TO_PT,
                    h * MM_TO_PT,
                );
                match style {
                    RectStyle::Fill => content.fill_nonzero(),
                    RectStyle::Stroke => content.stroke(),
                    RectStyle::FillStroke => content.fill_nonzero_and_stroke(),
                };
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                line_width,
            } => {
                set_stroke(content, *color, *line_width);
                content.move_to(x1 * MM_TO_PT, (page_h - y1) * MM_TO_PT);
                content.line_to(x2 * MM_TO_PT, (page_h - y2) * MM_TO_PT);
                content.stroke();
            }
            DrawOp::Text {
                text,
                x,
                y,
                align,
                font,
                style,
                size,
                color,
            } => {
                let Some(resource) = fonts.get(&(*font, *style)) else {
                    continue;
                };
                let (bytes, missing) = to_winansi_bytes(text);
                dropped += missing;
                if bytes.is_empty() {
                    continue;
                }
                let width = text_width(text, *font, *style, *size);
                let x_pt = match align {
                    TextAlign::Left => x * MM_TO_PT,
                    TextAlign::Center => x * MM_TO_PT - width / 2.0,
                    TextAlign::Right => x * MM_TO_PT - width,
                };
                set_fill(content, &mut fill, *color);
                content.begin_text();
                content.set_font(Name(resource.pdf_name.as_bytes()), *size);
                content.next_line(x_pt, (page_h - y) * MM_TO_PT);
                content.show(Str(&bytes));
                content.end_text();
            }
        }
    }
    dropped
}

/// Serialize a finished drawing script to PDF bytes.
pub fn render(script: &Script, title: Option<&str>) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let pages = script.pages();
    if pages.is_empty() {
        return Err(Error::NoPage);
    }

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Phase 1: one Type1 base font resource per family/style in use
    let mut fonts: HashMap<(FontFamily, FontStyle), FontResource> = HashMap::new();
    let mut font_order: Vec<(FontFamily, FontStyle)> = Vec::new();
    for op in pages.iter().flat_map(|p| p.ops.iter()) {
        if let DrawOp::Text { font, style, .. } = op {
            let key = (*font, *style);
            if fonts.contains_key(&key) {
                continue;
            }
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(base_font_name(*font, *style).as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            fonts.insert(
                key,
                FontResource {
                    pdf_name: format!("F{}", font_order.len() + 1),
                    font_ref,
                },
            );
            font_order.push(key);
        }
    }

    // Phase 2: content streams
    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let mut dropped = 0usize;

    for (i, page) in pages.iter().enumerate() {
        let mut content = Content::new();
        dropped += render_page(&mut content, page, &fonts);
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    if dropped > 0 {
        log::warn!(
            "{dropped} characters have no WinAnsi encoding and were left out of the PDF"
        );
    }

    // Phase 3: page tree
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for (i, page) in pages.iter().enumerate() {
        let mut pdf_page = pdf.page(page_ids[i]);
        pdf_page
            .media_box(Rect::new(
                0.0,
                0.0,
                page.width * MM_TO_PT,
                page.height * MM_TO_PT,
            ))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = pdf_page.resources();
        let mut font_dict = resources.fonts();
        for key in &font_order {
            let res = &fonts[key];
            font_dict.pair(Name(res.pdf_name.as_bytes()), res.font_ref);
        }
    }

    {
        let mut info = pdf.document_info(info_id);
        if let Some(title) = title {
            info.title(TextStr(title));
        }
        info.producer(TextStr(PRODUCER));
    }

    log::debug!(
        "PDF assembly: {n} pages, {} fonts, {:.1}ms",
        font_order.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(pdf.finish())
}
