mod common;

use mdpress_pdf::{Error, PageFormat, RenderOptions, ThemeId};

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

fn count(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle.as_bytes())
        .count()
}

#[test]
fn writes_a_pdf_with_one_page_object_per_page() {
    common::init_logging();
    let options = RenderOptions {
        format: PageFormat::A4,
        theme: ThemeId::Documentation,
        title: Some("Report".into()),
    };
    let bytes = mdpress_pdf::render_markdown_to_pdf("A\n\\newpage\nB\n<!-- pagebreak -->\nC", &options)
        .expect("render");
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(contains(&bytes, "/Count 3"));
    let page_objects = count(&bytes, "/Type /Page") - count(&bytes, "/Type /Pages");
    assert_eq!(page_objects, 3);
    assert!(contains(&bytes, "/FlateDecode"));
    assert!(contains(&bytes, "Report"));
}

#[test]
fn base_fonts_follow_the_theme() {
    let md = "# Heading\n\nbody\n\n```\ncode\n```";
    let manuscript = mdpress_pdf::render_markdown_to_pdf(
        md,
        &RenderOptions {
            theme: ThemeId::Manuscript,
            ..RenderOptions::default()
        },
    )
    .expect("render");
    assert!(contains(&manuscript, "/Times-Bold"));
    assert!(contains(&manuscript, "/Times-Roman"));
    assert!(contains(&manuscript, "/Courier"));
    assert!(!contains(&manuscript, "/Helvetica"));

    let documentation =
        mdpress_pdf::render_markdown_to_pdf(md, &RenderOptions::default()).expect("render");
    assert!(contains(&documentation, "/Helvetica-Bold"));
    assert!(contains(&documentation, "/WinAnsiEncoding"));
}

#[test]
fn converts_a_file_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("notes.md");
    let output = dir.path().join("notes.pdf");
    std::fs::write(&input, "# Notes\n\n- [x] write\n- [ ] ship\n").expect("write input");

    mdpress_pdf::convert_markdown_to_pdf(&input, &output, &RenderOptions::default())
        .expect("convert");
    let bytes = std::fs::read(&output).expect("read output");
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = mdpress_pdf::convert_markdown_to_pdf(
        &dir.path().join("absent.md"),
        &dir.path().join("out.pdf"),
        &RenderOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!dir.path().join("out.pdf").exists());
}
