mod inline;

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Block, ListItem};

pub use inline::normalize_inline;

static PAGE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<!--\s*(?:page-?break|newpage)\s*-->|(?mR:^[ \t]*\\(?:pagebreak|newpage)[ \t]*$)")
        .expect("valid page break pattern")
});
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,3}) +(.+?)(?: +#+)? *$").expect("valid heading pattern")
});
static HR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(?:-{3,}|_{3,})\s*$").expect("valid rule pattern")
});
static TABLE_DIVIDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?\s*:?-{3,}:?\s*(?:\|\s*:?-{3,}:?\s*)*\|?\s*$")
        .expect("valid table divider pattern")
});
static QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*> ?(.*)$").expect("valid quote pattern"));
static LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:([-*+])|(\d{1,9})[.)]) +(?:\[([ xX])\] +)?(.*)$").expect("valid list pattern")
});

/// Cut a document into logical pages at explicit page-break markers.
/// Segments are trimmed and empty ones dropped; an empty document still
/// yields one (blank) page.
pub fn split_logical_pages(markdown: &str) -> Vec<String> {
    let pages: Vec<String> = PAGE_BREAK_RE
        .split(markdown)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if pages.is_empty() {
        vec![" ".to_string()]
    } else {
        pages
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

fn is_table_start(lines: &[&str], i: usize) -> bool {
    lines[i].contains('|')
        && lines
            .get(i + 1)
            .is_some_and(|next| next.contains('|') && TABLE_DIVIDER_RE.is_match(next))
}

/// True when a line opens a block other than a paragraph (rules 2-7).
fn starts_block(lines: &[&str], i: usize) -> bool {
    let line = lines[i];
    HEADING_RE.is_match(line)
        || is_fence(line)
        || HR_RE.is_match(line)
        || is_table_start(lines, i)
        || QUOTE_RE.is_match(line)
        || LIST_RE.is_match(line)
}

fn split_row(line: &str) -> Vec<String> {
    let mut cells: Vec<&str> = line.trim().split('|').collect();
    if cells.first().is_some_and(|c| c.trim().is_empty()) {
        cells.remove(0);
    }
    if cells.len() > 1 && cells.last().is_some_and(|c| c.trim().is_empty()) {
        cells.pop();
    }
    cells.into_iter().map(normalize_inline).collect()
}

fn list_item(line: &str) -> Option<ListItem> {
    let caps = LIST_RE.captures(line)?;
    let marker = caps
        .get(2)
        .map(|n| format!("{}.", n.as_str()))
        .unwrap_or_default();
    let checked = caps.get(3).map(|c| c.as_str() != " ");
    Some(ListItem {
        checked,
        text: normalize_inline(&caps[4]),
        marker,
    })
}

fn push_spacer(blocks: &mut Vec<Block>) {
    if !blocks.is_empty() && blocks.last() != Some(&Block::Spacer) {
        blocks.push(Block::Spacer);
    }
}

/// Parse one logical page into blocks. The result never starts or ends with a
/// `Spacer` and never holds two in a row.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks: Vec<Block> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            push_spacer(&mut blocks);
            i += 1;
            continue;
        }

        if let Some(caps) = HEADING_RE.captures(line) {
            blocks.push(Block::Heading {
                level: caps[1].len() as u8,
                text: normalize_inline(&caps[2]),
            });
            i += 1;
            continue;
        }

        if is_fence(line) {
            let language = line.trim_start()[3..].trim().to_string();
            let mut body: Vec<&str> = Vec::new();
            i += 1;
            while i < lines.len() && !is_fence(lines[i]) {
                body.push(lines[i]);
                i += 1;
            }
            // Skip the closing fence; an unclosed fence runs to end of input.
            i += 1;
            blocks.push(Block::Code {
                language,
                code: body.join("\n"),
            });
            continue;
        }

        if HR_RE.is_match(line) {
            blocks.push(Block::Hr);
            i += 1;
            continue;
        }

        if is_table_start(&lines, i) {
            let mut rows = vec![split_row(line)];
            i += 2;
            while i < lines.len() && lines[i].contains('|') && !lines[i].trim().is_empty() {
                rows.push(split_row(lines[i]));
                i += 1;
            }
            let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
            for row in &mut rows {
                row.resize(cols, String::new());
            }
            blocks.push(Block::Table { rows });
            continue;
        }

        if QUOTE_RE.is_match(line) {
            let mut parts: Vec<String> = Vec::new();
            while let Some(caps) = lines.get(i).and_then(|l| QUOTE_RE.captures(l)) {
                let part = normalize_inline(&caps[1]);
                if !part.is_empty() {
                    parts.push(part);
                }
                i += 1;
            }
            blocks.push(Block::Blockquote {
                text: parts.join(" "),
            });
            continue;
        }

        if LIST_RE.is_match(line) {
            let mut items = Vec::new();
            while let Some(item) = lines.get(i).and_then(|l| list_item(l)) {
                items.push(item);
                i += 1;
            }
            blocks.push(Block::List { items });
            continue;
        }

        let mut parts = vec![line.trim()];
        i += 1;
        while i < lines.len() && !lines[i].trim().is_empty() && !starts_block(&lines, i) {
            parts.push(lines[i].trim());
            i += 1;
        }
        blocks.push(Block::Paragraph {
            text: normalize_inline(&parts.join(" ")),
        });
    }

    while blocks.last() == Some(&Block::Spacer) {
        blocks.pop();
    }
    blocks
}
