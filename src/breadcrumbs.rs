use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::data_models::ResultMetadata;
use crate::markup::escape_html;

pub const SEPARATOR: &str = "›";
pub const OPEN_SOURCE_LABEL: &str = "open source";

/// Characters that cannot appear raw in a URL path. `/` and `%` pass through
/// so nested paths and pre-encoded paths stay intact.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Maps `metadata.source_path` onto the documentation site.
#[derive(Debug, Clone)]
pub struct SourceLinkResolver {
    base_url: String,
}

impl SourceLinkResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `<base>/<source_path>`, or `None` when there is no usable path.
    pub fn resolve(&self, metadata: Option<&ResultMetadata>) -> Option<String> {
        let path = metadata?.source_path()?;
        let path = path.trim_start_matches('/');
        Some(format!(
            "{}/{}",
            self.base_url,
            utf8_percent_encode(path, PATH)
        ))
    }
}

/// The navigation trail shown above a result body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Breadcrumbs {
    /// No headings and no source: nothing is rendered.
    None,
    /// No headings, but the source can still be opened.
    SourceOnly { link: String },
    /// One to three headings; the last links to the source when there is one.
    Trail {
        segments: Vec<String>,
        link: Option<String>,
    },
}

impl Breadcrumbs {
    pub fn build(metadata: Option<&ResultMetadata>, link: Option<String>) -> Breadcrumbs {
        let segments: Vec<String> = metadata
            .map(|m| m.headings().map(str::to_string).collect())
            .unwrap_or_default();

        match (segments.is_empty(), link) {
            (true, None) => Breadcrumbs::None,
            (true, Some(link)) => Breadcrumbs::SourceOnly { link },
            (false, link) => Breadcrumbs::Trail { segments, link },
        }
    }

    /// Plain-text rendering, e.g. `A › C`.
    pub fn text(&self) -> String {
        match self {
            Breadcrumbs::None => String::new(),
            Breadcrumbs::SourceOnly { .. } => OPEN_SOURCE_LABEL.to_string(),
            Breadcrumbs::Trail { segments, .. } => segments.join(&format!(" {SEPARATOR} ")),
        }
    }

    pub fn link(&self) -> Option<&str> {
        match self {
            Breadcrumbs::None => None,
            Breadcrumbs::SourceOnly { link } => Some(link),
            Breadcrumbs::Trail { link, .. } => link.as_deref(),
        }
    }

    /// The breadcrumb region, or an empty string for [`Breadcrumbs::None`].
    pub fn to_markup(&self) -> String {
        match self {
            Breadcrumbs::None => String::new(),
            Breadcrumbs::SourceOnly { link } => format!(
                r#"<nav class="breadcrumbs">{}</nav>"#,
                anchor(link, OPEN_SOURCE_LABEL, "source-link")
            ),
            Breadcrumbs::Trail { segments, link } => {
                let last = segments.len() - 1;
                let parts: Vec<String> = segments
                    .iter()
                    .enumerate()
                    .map(|(i, segment)| match link {
                        Some(link) if i == last => anchor(link, segment, "breadcrumb-link"),
                        _ => format!(
                            r#"<span class="breadcrumb-item">{}</span>"#,
                            escape_html(segment)
                        ),
                    })
                    .collect();
                let separator = format!(r#" <span class="breadcrumb-separator">{SEPARATOR}</span> "#);
                format!(r#"<nav class="breadcrumbs">{}</nav>"#, parts.join(&separator))
            }
        }
    }
}

fn anchor(href: &str, label: &str, class: &str) -> String {
    format!(
        r#"<a class="{class}" href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape_html(href),
        escape_html(label)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(h1: Option<&str>, h2: Option<&str>, h3: Option<&str>, source: Option<&str>) -> ResultMetadata {
        ResultMetadata {
            h1: h1.map(String::from),
            h2: h2.map(String::from),
            h3: h3.map(String::from),
            source_path: source.map(String::from),
        }
    }

    #[test]
    fn test_resolve_source_link() {
        let resolver = SourceLinkResolver::new("https://docs.example.com/");
        let m = meta(None, None, None, Some("guides/setup.md"));
        assert_eq!(
            resolver.resolve(Some(&m)).as_deref(),
            Some("https://docs.example.com/guides/setup.md")
        );
        assert_eq!(resolver.resolve(None), None);
        assert_eq!(resolver.resolve(Some(&meta(None, None, None, Some("")))), None);
    }

    #[test]
    fn test_resolve_encodes_reserved_path_characters() {
        let resolver = SourceLinkResolver::new("https://docs.example.com");
        let m = meta(None, None, None, Some("/my docs/a?b#c.md"));
        assert_eq!(
            resolver.resolve(Some(&m)).as_deref(),
            Some("https://docs.example.com/my%20docs/a%3Fb%23c.md")
        );

        let encoded = meta(None, None, None, Some("already%20encoded.md"));
        assert_eq!(
            resolver.resolve(Some(&encoded)).as_deref(),
            Some("https://docs.example.com/already%20encoded.md")
        );
    }

    #[test]
    fn test_trail_skips_missing_headings() {
        let m = meta(Some("A"), None, Some("C"), None);
        let crumbs = Breadcrumbs::build(Some(&m), None);
        assert_eq!(crumbs.text(), "A › C");
        assert_eq!(crumbs.link(), None);
        assert!(!crumbs.to_markup().contains("<a "));
    }

    #[test]
    fn test_only_last_segment_is_linked() {
        let m = meta(Some("Guide"), Some("Install"), Some("Linux"), Some("guide.md"));
        let crumbs = Breadcrumbs::build(Some(&m), Some("https://d/guide.md".into()));
        let html = crumbs.to_markup();
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains(r#"href="https://d/guide.md""#));
        assert!(html.contains(">Linux</a>"));
        assert!(html.contains(r#"<span class="breadcrumb-item">Guide</span>"#));
        assert_eq!(html.matches("breadcrumb-separator").count(), 2);
    }

    #[test]
    fn test_source_only_fallback() {
        let m = meta(None, None, None, Some("x.md"));
        let crumbs = Breadcrumbs::build(Some(&m), Some("https://d/x.md".into()));
        assert_eq!(crumbs, Breadcrumbs::SourceOnly { link: "https://d/x.md".into() });
        assert!(crumbs.to_markup().contains(">open source</a>"));
    }

    #[test]
    fn test_no_region_without_headings_or_source() {
        assert_eq!(Breadcrumbs::build(None, None), Breadcrumbs::None);
        let empty = meta(Some(""), None, None, None);
        assert_eq!(Breadcrumbs::build(Some(&empty), None).to_markup(), "");
    }

    #[test]
    fn test_segments_are_escaped() {
        let m = meta(Some("<img src=x onerror=alert(1)>"), None, None, None);
        let html = Breadcrumbs::build(Some(&m), None).to_markup();
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }
}
