//! Text to markup helpers. Everything here is pure.
//!
//! Content shown on the page comes from an external corpus that may contain
//! arbitrary HTML, so every piece of it goes through [`escape_html`] before it
//! is placed into markup.

/// Default length, in characters, that result bodies are cut to.
pub const MAX_CONTENT_CHARS: usize = 300;

const ELLIPSIS: &str = "...";

/// Escapes `&`, `<`, `>`, `"` and `'` so the text is inert in element bodies
/// and in quoted attributes.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

/// Cuts `text` to at most `max_chars` characters (plus the ellipsis).
///
/// The cut moves back to the last whitespace when that whitespace sits at or
/// after 80% of the limit; otherwise the text is cut hard at the limit.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let Some((limit_byte, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };
    let head = &text[..limit_byte];

    // 80% of the limit, rounded up
    let min_break = (max_chars * 4).div_ceil(5);
    let last_space = head
        .char_indices()
        .enumerate()
        .filter(|(_, (_, c))| c.is_whitespace())
        .last();

    let cut = match last_space {
        Some((char_pos, (byte_pos, _))) if char_pos >= min_break => &head[..byte_pos],
        _ => head,
    };
    format!("{cut}{ELLIPSIS}")
}

/// Turns already-escaped text into paragraphs: blank lines separate `<p>`
/// blocks and single newlines become `<br>`.
pub fn format_paragraphs(escaped: &str) -> String {
    let normalized = escaped.replace("\r\n", "\n");
    let mut out = String::with_capacity(normalized.len() + 16);
    for paragraph in normalized.split("\n\n") {
        out.push_str("<p>");
        out.push_str(&paragraph.replace('\n', "<br>"));
        out.push_str("</p>");
    }
    out
}

/// Truncate, escape, then paragraph-format a result body.
pub fn format_content(content: &str) -> String {
    format_paragraphs(&escape_html(&truncate_text(content, MAX_CONTENT_CHARS)))
}

/// Escape then paragraph-format free text such as the summary.
pub fn format_text(text: &str) -> String {
    format_paragraphs(&escape_html(text))
}

/// Scores below 0.001 use scientific notation, scores below 1 three decimals,
/// anything larger two. Non-negative exponents carry a sign: `0.00e+0`.
pub fn format_score(score: f64) -> String {
    if score < 0.001 {
        let formatted = format!("{score:.2e}");
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        }
    } else if score < 1.0 {
        format!("{score:.3}")
    } else {
        format!("{score:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script> & y"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; y"
        );
        assert!(!escape_html("it's").contains('\''));
        assert_eq!(escape_html("plain text"), "plain text");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_text("short", 300), "short");
        let exact = "a".repeat(300);
        assert_eq!(truncate_text(&exact, 300), exact);
    }

    #[test]
    fn test_truncate_breaks_at_late_space() {
        let mut text = "a".repeat(250);
        text.push(' ');
        text.push_str(&"b".repeat(50));
        assert_eq!(text.chars().count(), 301);

        let out = truncate_text(&text, 300);
        assert_eq!(out, format!("{}...", "a".repeat(250)));
    }

    #[test]
    fn test_truncate_hard_cut_without_late_space() {
        let mut text = "a".repeat(100);
        text.push(' ');
        text.push_str(&"b".repeat(200));
        assert_eq!(text.chars().count(), 301);

        let out = truncate_text(&text, 300);
        assert_eq!(out.chars().count(), 303);
        assert!(out.ends_with("b..."));
        assert!(out.starts_with(&"a".repeat(100)));
    }

    #[test]
    fn test_truncate_space_exactly_at_threshold() {
        let mut text = "a".repeat(240);
        text.push(' ');
        text.push_str(&"b".repeat(60));
        assert_eq!(truncate_text(&text, 300), format!("{}...", "a".repeat(240)));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "ж".repeat(301);
        let out = truncate_text(&text, 300);
        assert_eq!(out, format!("{}...", "ж".repeat(300)));
    }

    #[test]
    fn test_format_paragraphs() {
        assert_eq!(format_paragraphs("one"), "<p>one</p>");
        assert_eq!(format_paragraphs("a\nb"), "<p>a<br>b</p>");
        assert_eq!(format_paragraphs("a\n\nb\nc"), "<p>a</p><p>b<br>c</p>");
        assert_eq!(format_paragraphs("a\r\n\r\nb"), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_format_content_escapes_before_formatting() {
        let out = format_content("<b>bold</b>\n\nnext & last");
        assert_eq!(out, "<p>&lt;b&gt;bold&lt;/b&gt;</p><p>next &amp; last</p>");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.0005), "5.00e-4");
        assert_eq!(format_score(0.1234), "0.123");
        assert_eq!(format_score(0.001), "0.001");
        assert_eq!(format_score(2.5), "2.50");
        assert_eq!(format_score(1.0), "1.00");
        assert_eq!(format_score(0.0), "0.00e+0");
        assert_eq!(format_score(-2.0), "-2.00e+0");
        assert_eq!(format_score(0.00012345), "1.23e-4");
    }
}
