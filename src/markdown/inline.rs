use std::sync::LazyLock;

use regex::Regex;

struct Rule {
    re: Regex,
    replacement: &'static str,
}

fn rule(pattern: &str, replacement: &'static str) -> Rule {
    Rule {
        re: Regex::new(pattern).expect("valid inline pattern"),
        replacement,
    }
}

/// Applied in order; each rule sees the output of the previous one.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        rule(r"!\[([^\]]*)\]\([^)]*\)", "$1"),
        rule(r"\[([^\]]+)\]\(([^)]+)\)", "$1 ($2)"),
        rule(r"`([^`]+)`", "$1"),
        rule(r"\*\*([^*]+)\*\*", "$1"),
        rule(r"__([^_]+)__", "$1"),
        rule(r"\*([^*]+)\*", "$1"),
        // Word-bounded so snake_case identifiers survive.
        rule(r"\b_([^_]+)_\b", "$1"),
        rule(r"~~([^~]+)~~", "$1"),
        rule(r"<[^>]+>", ""),
    ]
});

const ENTITIES: [(&str, &str); 6] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
    // Last, so "&amp;lt;" decodes to "&lt;" and not "<".
    ("&amp;", "&"),
];

/// Strip inline Markdown down to the plain text that gets measured and drawn.
pub fn normalize_inline(text: &str) -> String {
    let mut out = text.to_string();
    for r in RULES.iter() {
        out = r.re.replace_all(&out, r.replacement).into_owned();
    }
    for (entity, ch) in ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, ch);
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn image_keeps_alt_text() {
        assert_eq!(normalize_inline("see ![a cat](cat.png) here"), "see a cat here");
    }

    #[test]
    fn link_keeps_text_and_url() {
        assert_eq!(
            normalize_inline("[docs](https://example.com)"),
            "docs (https://example.com)"
        );
    }

    #[test]
    fn emphasis_and_code_are_stripped() {
        assert_eq!(
            normalize_inline("**bold** __b2__ *it* _i2_ ~~gone~~ `code`"),
            "bold b2 it i2 gone code"
        );
    }

    #[test]
    fn snake_case_survives() {
        assert_eq!(normalize_inline("call my_func_name now"), "call my_func_name now");
    }

    #[test]
    fn html_tags_removed_and_entities_decoded() {
        assert_eq!(normalize_inline("<b>a</b> &lt;x&gt; &amp; y"), "a <x> & y");
        assert_eq!(
            normalize_inline("&quot;quoted&quot; it&#39;s a&nbsp;b"),
            "\"quoted\" it's a b"
        );
    }

    #[test]
    fn escaped_entity_decodes_once() {
        assert_eq!(normalize_inline("&amp;lt;"), "&lt;");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize_inline("   padded\t "), "padded");
    }

    #[test]
    fn image_inside_link_resolves_to_alt_then_link() {
        assert_eq!(normalize_inline("[![logo](l.png)](https://x.io)"), "logo (https://x.io)");
    }
}
