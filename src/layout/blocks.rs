use crate::error::Result;
use crate::fonts::FontStyle;
use crate::model::{Block, ListItem};
use crate::theme::Typography;

use super::context::RenderContext;
use super::{PT_TO_MM, RectStyle, Surface, TextAlign};

const HEADING_LINE_HEIGHT: f32 = 1.25;
const RULE_GAP: f32 = 1.5;
const HR_GAP: f32 = 3.0;
const HR_RESERVE: f32 = 2.0;
const QUOTE_INDENT: f32 = 6.0;
const QUOTE_BAR_WIDTH: f32 = 1.2;
const LIST_INDENT: f32 = 4.0;
const CODE_PADDING: f32 = 3.0;
/// Spacer height as a fraction of the body size.
const SPACER_FACTOR: f32 = 0.45;

/// Points to millimetres.
fn pt(v: f32) -> f32 {
    v * PT_TO_MM
}

fn spacer_height(t: &Typography) -> f32 {
    pt(SPACER_FACTOR * t.base_size)
}

pub(super) fn render_blocks<S: Surface>(ctx: &mut RenderContext<'_, S>, blocks: &[Block]) -> Result<()> {
    for (i, block) in blocks.iter().enumerate() {
        match block {
            Block::Spacer => ctx.advance(spacer_height(&ctx.theme().typography)),
            Block::Heading { level, text } => render_heading(ctx, *level, text, &blocks[i + 1..])?,
            Block::Paragraph { text } => render_paragraph(ctx, text)?,
            Block::Blockquote { text } => render_blockquote(ctx, text)?,
            Block::List { items } => render_list(ctx, items)?,
            Block::Code { language, code } => render_code(ctx, language, code)?,
            Block::Table { rows } => render_table(ctx, rows)?,
            Block::Hr => render_hr(ctx)?,
        }
    }
    Ok(())
}

/// Space above and below a heading.
fn heading_gaps(t: &Typography, level: u8) -> (f32, f32) {
    if level == 1 {
        (pt(t.base_size * 0.8), pt(t.base_size * 0.35))
    } else {
        (pt(t.base_size * 0.55), pt(t.base_size * 0.25))
    }
}

/// Height the blocks after a heading need before their first piece is drawn:
/// the spacers in between plus the first piece that cannot be split. That is
/// one line for flowing text, the first box for code and tables, and the first
/// bar for quotes. A following heading brings its own keep-with-next along.
fn keep_with_next_height<S: Surface>(ctx: &mut RenderContext<'_, S>, rest: &[Block]) -> f32 {
    let t = &ctx.theme().typography;
    let gaps = rest.iter().take_while(|b| matches!(b, Block::Spacer)).count();
    let Some(next) = rest.get(gaps) else {
        return 0.0;
    };
    let lead = match next {
        Block::Spacer => 0.0,
        Block::Heading { level, text } => {
            heading_height(ctx, *level, text) + keep_with_next_height(ctx, &rest[gaps + 1..])
        }
        Block::Paragraph { .. } | Block::List { .. } => ctx.line_height(t.base_size, t.line_height),
        Block::Blockquote { text } => {
            let quote = Quote::layout(ctx, text);
            quote.lines.len().min(quote.per_page) as f32 * quote.line_h
        }
        Block::Code { language, code } if !code.trim().is_empty() => {
            Preformatted::layout(ctx, !language.is_empty(), &code_lines(code)).first_fragment_height()
        }
        Block::Table { rows } if !rows.is_empty() => {
            Preformatted::layout(ctx, false, &table_lines(rows)).first_fragment_height()
        }
        Block::Code { .. } | Block::Table { .. } => 0.0,
        Block::Hr => HR_RESERVE,
    };
    gaps as f32 * spacer_height(t) + lead
}

/// Wrap a heading in its face and return its lines and line height.
fn heading_lines<S: Surface>(ctx: &mut RenderContext<'_, S>, level: u8, text: &str) -> (Vec<String>, f32) {
    let theme = ctx.theme();
    let t = &theme.typography;
    let size = t.heading_size(level);
    ctx.set_font(t.heading_font, FontStyle::Bold, size, theme.palette.heading);
    let lines = ctx.wrap(text, ctx.geometry().content_width());
    (lines, ctx.line_height(size, HEADING_LINE_HEIGHT))
}

fn rule_height(level: u8) -> f32 {
    if level == 1 { 2.0 * RULE_GAP } else { 0.0 }
}

/// Full height of a heading, gaps included. Zero when it draws nothing.
fn heading_height<S: Surface>(ctx: &mut RenderContext<'_, S>, level: u8, text: &str) -> f32 {
    let (lines, line_h) = heading_lines(ctx, level, text);
    if lines.is_empty() {
        return 0.0;
    }
    let (before, after) = heading_gaps(&ctx.theme().typography, level);
    before + lines.len() as f32 * line_h + rule_height(level) + after
}

/// Headings reserve their own height plus the first piece of whatever follows,
/// so a heading never ends a page with its body starting on the next.
fn render_heading<S: Surface>(
    ctx: &mut RenderContext<'_, S>,
    level: u8,
    text: &str,
    following: &[Block],
) -> Result<()> {
    let follow = keep_with_next_height(ctx, following);

    let (lines, line_h) = heading_lines(ctx, level, text);
    if lines.is_empty() {
        return Ok(());
    }
    let (before, after) = heading_gaps(&ctx.theme().typography, level);
    let rule_h = rule_height(level);

    let needed = before + lines.len() as f32 * line_h + rule_h + after + follow;
    if needed <= ctx.geometry().content_height() {
        ctx.ensure_space(needed)?;
    }
    if !ctx.at_page_top() {
        ctx.advance(before);
    }

    let x = ctx.geometry().margin_x;
    ctx.draw_lines(&lines, x, line_h)?;

    if level == 1 {
        // Drawn straight under the last heading line, no overflow check between.
        let y = ctx.y() + RULE_GAP;
        ctx.rule(y)?;
        ctx.advance(rule_h);
    }
    ctx.advance(after);
    Ok(())
}

fn render_paragraph<S: Surface>(ctx: &mut RenderContext<'_, S>, text: &str) -> Result<()> {
    let theme = ctx.theme();
    let t = &theme.typography;
    ctx.set_font(t.body_font, FontStyle::Normal, t.base_size, theme.palette.text);
    let lines = ctx.wrap(text, ctx.geometry().content_width());
    if lines.is_empty() {
        return Ok(());
    }
    let line_h = ctx.line_height(t.base_size, t.line_height);
    let x = ctx.geometry().margin_x;
    ctx.draw_lines(&lines, x, line_h)?;
    ctx.advance(pt(0.2 * t.base_size));
    Ok(())
}

/// How many lines of height `line_h` fit in `room`; at least one.
fn lines_per_page(line_h: f32, room: f32) -> usize {
    ((room / line_h).floor() as usize).max(1)
}

/// A blockquote wrapped in its italic face.
struct Quote {
    lines: Vec<String>,
    line_h: f32,
    per_page: usize,
}

impl Quote {
    fn layout<S: Surface>(ctx: &mut RenderContext<'_, S>, text: &str) -> Self {
        let theme = ctx.theme();
        let t = &theme.typography;
        ctx.set_font(t.body_font, FontStyle::Italic, t.base_size, theme.palette.muted);
        let g = *ctx.geometry();
        let line_h = ctx.line_height(t.base_size, t.line_height);
        Quote {
            lines: ctx.wrap(text, g.content_width() - QUOTE_INDENT),
            line_h,
            per_page: lines_per_page(line_h, g.content_height()),
        }
    }
}

fn render_blockquote<S: Surface>(ctx: &mut RenderContext<'_, S>, text: &str) -> Result<()> {
    let quote = Quote::layout(ctx, text);
    if quote.lines.is_empty() {
        return Ok(());
    }
    let theme = ctx.theme();
    let g = *ctx.geometry();

    for chunk in quote.lines.chunks(quote.per_page) {
        let h = chunk.len() as f32 * quote.line_h;
        ctx.ensure_space(h)?;
        let top = ctx.y();
        let surface = ctx.surface();
        surface.set_fill_color(theme.palette.quote_border);
        surface.rect(g.margin_x, top, QUOTE_BAR_WIDTH, h, RectStyle::Fill)?;
        ctx.draw_lines(chunk, g.margin_x + QUOTE_INDENT, quote.line_h)?;
    }
    ctx.advance(pt(0.35 * theme.typography.base_size));
    Ok(())
}

fn render_list<S: Surface>(ctx: &mut RenderContext<'_, S>, items: &[ListItem]) -> Result<()> {
    let theme = ctx.theme();
    let t = &theme.typography;
    ctx.set_font(t.body_font, FontStyle::Normal, t.base_size, theme.palette.text);
    let g = *ctx.geometry();
    let line_h = ctx.line_height(t.base_size, t.line_height);

    for item in items {
        let lines = ctx.wrap(
            &format!("{} {}", item.prefix(), item.text),
            g.content_width() - LIST_INDENT,
        );
        ctx.draw_lines(&lines, g.margin_x + LIST_INDENT, line_h)?;
    }
    ctx.advance(pt(0.3 * t.base_size));
    Ok(())
}

fn code_lines(code: &str) -> Vec<String> {
    code.split('\n').map(|l| l.replace('\t', "  ")).collect()
}

fn render_code<S: Surface>(ctx: &mut RenderContext<'_, S>, language: &str, code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Ok(());
    }
    let label = (!language.is_empty()).then(|| format!("[{language}]"));
    render_preformatted(ctx, label.as_deref(), &code_lines(code))
}

/// Tables degrade to preformatted text: header, a `---` row, then body rows.
fn table_lines(rows: &[Vec<String>]) -> Vec<String> {
    let Some(header) = rows.first() else {
        return Vec::new();
    };
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header.join(" | "));
    lines.push(vec!["---"; header.len()].join(" | "));
    lines.extend(rows[1..].iter().map(|row| row.join(" | ")));
    lines
}

fn render_table<S: Surface>(ctx: &mut RenderContext<'_, S>, rows: &[Vec<String>]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    render_preformatted(ctx, None, &table_lines(rows))
}

/// Wrapped lines of a boxed monospaced block and how they fall into
/// page-sized fragments.
struct Preformatted {
    lines: Vec<String>,
    line_h: f32,
    label_h: f32,
    per_page: usize,
}

impl Preformatted {
    fn layout<S: Surface>(ctx: &mut RenderContext<'_, S>, labelled: bool, source_lines: &[String]) -> Self {
        let theme = ctx.theme();
        let (t, p) = (&theme.typography, &theme.palette);
        ctx.set_font(t.code_font, FontStyle::Normal, t.code_size, p.code_text);
        let g = *ctx.geometry();
        let inner_width = g.content_width() - 2.0 * CODE_PADDING;
        let line_h = ctx.line_height(t.code_size, t.code_line_height);

        let mut lines: Vec<String> = Vec::new();
        for source in source_lines {
            let wrapped = ctx.wrap(source, inner_width);
            if wrapped.is_empty() {
                lines.push(String::new());
            } else {
                lines.extend(wrapped);
            }
        }

        let label_h = if labelled { line_h } else { 0.0 };
        let room = g.content_height() - 2.0 * CODE_PADDING - label_h;
        Preformatted {
            lines,
            line_h,
            label_h,
            per_page: lines_per_page(line_h, room),
        }
    }

    fn fragment_height(&self, index: usize, len: usize) -> f32 {
        let label_h = if index == 0 { self.label_h } else { 0.0 };
        2.0 * CODE_PADDING + label_h + len as f32 * self.line_h
    }

    fn first_fragment_height(&self) -> f32 {
        self.fragment_height(0, self.lines.len().min(self.per_page))
    }
}

/// Boxed monospaced block. The box is reserved in one piece and so never splits
/// across pages, unless it is taller than a whole page; then each page-sized
/// fragment gets its own box.
fn render_preformatted<S: Surface>(
    ctx: &mut RenderContext<'_, S>,
    label: Option<&str>,
    source_lines: &[String],
) -> Result<()> {
    let block = Preformatted::layout(ctx, label.is_some(), source_lines);
    let theme = ctx.theme();
    let p = &theme.palette;
    let g = *ctx.geometry();
    let x = g.margin_x + CODE_PADDING;

    for (i, chunk) in block.lines.chunks(block.per_page).enumerate() {
        let h = block.fragment_height(i, chunk.len());
        ctx.ensure_space(h)?;
        let top = ctx.y();

        let surface = ctx.surface();
        surface.set_fill_color(p.code_background);
        surface.set_draw_color(p.code_border);
        surface.set_line_width(0.3);
        surface.rect(g.margin_x, top, g.content_width(), h, RectStyle::FillStroke)?;

        let mut line_top = top + CODE_PADDING;
        if let (0, Some(label)) = (i, label) {
            ctx.surface().set_text_color(p.muted);
            let baseline = ctx.baseline(line_top, block.line_h);
            ctx.surface().text(label, x, baseline, TextAlign::Left)?;
            ctx.surface().set_text_color(p.code_text);
            line_top += block.line_h;
        }
        for line in chunk {
            let baseline = ctx.baseline(line_top, block.line_h);
            ctx.surface().text(line, x, baseline, TextAlign::Left)?;
            line_top += block.line_h;
        }
        ctx.advance(h);
    }
    ctx.advance(pt(0.4 * theme.typography.base_size));
    Ok(())
}

fn render_hr<S: Surface>(ctx: &mut RenderContext<'_, S>) -> Result<()> {
    ctx.ensure_space(HR_RESERVE)?;
    let y = ctx.y() + 1.0;
    ctx.rule(y)?;
    ctx.advance(HR_GAP);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DrawOp, PageGeometry, Script};
    use crate::model::PageFormat;
    use crate::theme::ThemeId;
    use pretty_assertions::assert_eq;

    fn render(blocks: &[Block]) -> Script {
        let mut script = Script::new();
        let mut ctx = RenderContext::new(
            &mut script,
            ThemeId::Documentation.theme(),
            PageGeometry::for_format(PageFormat::A4),
        );
        ctx.start_new_page().unwrap();
        render_blocks(&mut ctx, blocks).unwrap();
        script
    }

    fn texts(script: &Script) -> Vec<Vec<String>> {
        script
            .pages()
            .iter()
            .map(|p| p.texts().map(|(t, _)| t.to_string()).collect())
            .collect()
    }

    #[test]
    fn spacer_draws_nothing() {
        let script = render(&[Block::Spacer]);
        // only the background
        assert_eq!(script.pages()[0].ops.len(), 1);
    }

    #[test]
    fn list_prefixes() {
        let script = render(&[Block::List {
            items: vec![
                ListItem::bullet("plain"),
                ListItem::checkbox(true, "done"),
                ListItem::checkbox(false, "todo"),
            ],
        }]);
        assert_eq!(texts(&script), vec![vec!["- plain", "[x] done", "[ ] todo"]]);
    }

    #[test]
    fn level_one_heading_gets_a_rule() {
        let script = render(&[Block::Heading {
            level: 1,
            text: "Title".into(),
        }]);
        let lines = script.pages()[0]
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
            .count();
        assert_eq!(lines, 1);

        let script = render(&[Block::Heading {
            level: 2,
            text: "Sub".into(),
        }]);
        assert!(!script.pages()[0].ops.iter().any(|op| matches!(op, DrawOp::Line { .. })));
    }

    #[test]
    fn code_block_has_label_and_box() {
        let script = render(&[Block::Code {
            language: "rust".into(),
            code: "fn main() {\n\tlet x = 1;\n}".into(),
        }]);
        assert_eq!(
            texts(&script),
            vec![vec!["[rust]", "fn main() {", "  let x = 1;", "}"]]
        );
        assert!(script.pages()[0].ops.iter().any(|op| matches!(
            op,
            DrawOp::Rect {
                style: RectStyle::FillStroke,
                ..
            }
        )));
    }

    #[test]
    fn blockquote_bar_spans_its_lines() {
        let script = render(&[Block::Blockquote {
            text: "quoted ".repeat(60),
        }]);
        let g = PageGeometry::for_format(PageFormat::A4);
        let ops = &script.pages()[0].ops;
        let bar = ops[1..].iter().find_map(|op| match op {
            DrawOp::Rect { x, w, h, style: RectStyle::Fill, .. } => Some((*x, *w, *h)),
            _ => None,
        });
        let lines: Vec<f32> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|x| *x == g.margin_x + QUOTE_INDENT));

        let t = &ThemeId::Documentation.theme().typography;
        let line_h = t.base_size * t.line_height * PT_TO_MM;
        let (x, w, h) = bar.expect("quote bar");
        assert_eq!((x, w), (g.margin_x, QUOTE_BAR_WIDTH));
        assert!((h - lines.len() as f32 * line_h).abs() < 1e-3);
    }

    #[test]
    fn oversized_blockquote_gets_one_bar_per_page() {
        let script = render(&[Block::Blockquote {
            text: "quoted ".repeat(3000),
        }]);
        assert!(script.pages().len() > 1);

        let g = PageGeometry::for_format(PageFormat::A4);
        let t = &ThemeId::Documentation.theme().typography;
        let line_h = t.base_size * t.line_height * PT_TO_MM;
        for page in script.pages() {
            let bars: Vec<f32> = page.ops[1..]
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Rect { h, style: RectStyle::Fill, .. } => Some(*h),
                    _ => None,
                })
                .collect();
            let ys: Vec<f32> = page.texts().map(|(_, y)| y).collect();
            assert_eq!(bars.len(), 1);
            assert!((bars[0] - ys.len() as f32 * line_h).abs() < 1e-3);
            assert!(ys.iter().all(|y| *y <= g.content_bottom()));
        }
    }

    #[test]
    fn heading_moves_with_the_code_box_below_it() {
        let mut blocks: Vec<Block> = (0..33)
            .map(|i| Block::Paragraph {
                text: format!("filler line {i}"),
            })
            .collect();
        blocks.push(Block::Heading {
            level: 2,
            text: "Heading".into(),
        });
        blocks.push(Block::Spacer);
        blocks.push(Block::Code {
            language: "rust".into(),
            code: (0..12).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n"),
        });
        let script = render(&blocks);
        let pages = texts(&script);
        let with_heading = pages
            .iter()
            .position(|p| p.iter().any(|t| t == "Heading"))
            .unwrap();
        let with_label = pages
            .iter()
            .position(|p| p.iter().any(|t| t == "[rust]"))
            .unwrap();
        assert_eq!((with_heading, with_label), (1, 1));
    }

    #[test]
    fn table_degrades_to_preformatted_rows() {
        let script = render(&[Block::Table {
            rows: vec![
                vec!["a".into(), "b".into()],
                vec!["1".into(), String::new()],
            ],
        }]);
        assert_eq!(texts(&script), vec![vec!["a | b", "--- | ---", "1 | "]]);
    }

    #[test]
    fn code_block_moves_whole_to_next_page() {
        let filler: Vec<Block> = (0..40)
            .map(|i| Block::Paragraph {
                text: format!("filler line {i}"),
            })
            .collect();
        let mut blocks = filler;
        blocks.push(Block::Code {
            language: String::new(),
            code: (0..10).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n"),
        });
        let script = render(&blocks);
        let last = texts(&script).pop().unwrap();
        let code_lines: Vec<&String> = last.iter().filter(|t| t.starts_with("line ")).collect();
        assert_eq!(code_lines.len(), 10);
    }

    #[test]
    fn oversized_code_block_splits_into_fragments() {
        let code = (0..200).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let script = render(&[Block::Code {
            language: "txt".into(),
            code,
        }]);
        assert!(script.pages().len() > 1);
        let all: Vec<String> = texts(&script).concat();
        assert_eq!(all.iter().filter(|t| t.as_str() == "[txt]").count(), 1);
        assert_eq!(all.iter().filter(|t| t.starts_with("line ")).count(), 200);
        let g = PageGeometry::for_format(PageFormat::A4);
        for page in script.pages() {
            for (_, y) in page.texts() {
                assert!(y <= g.content_bottom());
            }
        }
    }

    #[test]
    fn empty_paragraph_reserves_nothing() {
        let script = render(&[Block::Paragraph { text: String::new() }, Block::Hr]);
        let rule_y = script.pages()[0].ops.iter().find_map(|op| match op {
            DrawOp::Line { y1, .. } => Some(*y1),
            _ => None,
        });
        assert_eq!(rule_y, Some(PageGeometry::for_format(PageFormat::A4).margin_top + 1.0));
    }
}
