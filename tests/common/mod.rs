#![allow(dead_code)]

use mdpress_pdf::layout::{Page, PageGeometry};
use mdpress_pdf::{PageFormat, Script, ThemeId};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn layout(markdown: &str, format: PageFormat) -> Script {
    init_logging();
    mdpress_pdf::layout_markdown(markdown, format, ThemeId::Documentation).expect("layout")
}

/// Text runs above the bottom margin, i.e. everything except the page number.
pub fn body_texts(page: &Page, format: PageFormat) -> Vec<String> {
    let bottom = PageGeometry::for_format(format).content_bottom();
    page.texts()
        .filter(|(_, y)| *y <= bottom)
        .map(|(t, _)| t.to_string())
        .collect()
}

pub fn footer(page: &Page, format: PageFormat) -> Option<String> {
    let bottom = PageGeometry::for_format(format).content_bottom();
    page.texts()
        .filter(|(_, y)| *y > bottom)
        .map(|(t, _)| t.to_string())
        .next()
}

pub fn footers(script: &Script, format: PageFormat) -> Vec<String> {
    script
        .pages()
        .iter()
        .filter_map(|p| footer(p, format))
        .collect()
}

/// `count` pseudo-random lowercase words separated by single spaces.
pub fn words(count: usize) -> String {
    const POOL: [&str; 12] = [
        "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed",
        "do", "eiusmod", "tempor",
    ];
    (0..count)
        .map(|i| POOL[(i * 7 + i / 3) % POOL.len()])
        .collect::<Vec<_>>()
        .join(" ")
}
