//! Result area rendering.
//!
//! The result area shows exactly one [`ViewState`] at a time. The renderer
//! turns a [`SearchResponse`] into a fresh state; [`ViewState::to_markup`] is
//! the single function that turns any state into markup.

use crate::api::models::SearchResponse;
use crate::breadcrumbs::{Breadcrumbs, SourceLinkResolver};
use crate::data_models::SearchResult;
use crate::markup::{escape_html, format_content, format_score, format_text};

/// One rendered search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    /// 1-based position in the response.
    pub number: usize,
    pub breadcrumbs: Breadcrumbs,
    /// Formatted score, `None` when the service sent none.
    pub score: Option<String>,
    /// Escaped, truncated and paragraph-formatted content.
    pub body: String,
}

impl ResultItem {
    pub fn to_markup(&self) -> String {
        let score = self
            .score
            .as_deref()
            .map(|s| format!(r#"<span class="result-score">{s}</span>"#))
            .unwrap_or_default();
        format!(
            concat!(
                r#"<article class="result-item">"#,
                r#"<div class="result-header"><span class="result-number">{}</span>{}{}</div>"#,
                r#"<div class="result-content">{}</div>"#,
                "</article>"
            ),
            self.number,
            self.breadcrumbs.to_markup(),
            score,
            self.body
        )
    }
}

/// Mutually exclusive states of the result area.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Results(Vec<ResultItem>),
    SummaryAndResults {
        /// Escaped and paragraph-formatted.
        summary: String,
        items: Vec<ResultItem>,
    },
    Empty,
    Error(String),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn items(&self) -> &[ResultItem] {
        match self {
            ViewState::Results(items) | ViewState::SummaryAndResults { items, .. } => items,
            _ => &[],
        }
    }

    pub fn result_count(&self) -> usize {
        self.items().len()
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn to_markup(&self) -> String {
        match self {
            ViewState::Idle => String::new(),
            ViewState::Loading => {
                r#"<div class="loading" role="status">Searching...</div>"#.to_string()
            }
            ViewState::Results(items) => results_markup(items),
            ViewState::SummaryAndResults { summary, items } => format!(
                r#"<section class="summary"><h2>Summary</h2><div class="summary-content">{summary}</div></section>{}"#,
                results_markup(items)
            ),
            ViewState::Empty => r#"<div class="no-results">No results found</div>"#.to_string(),
            ViewState::Error(message) => format!(
                r#"<div class="error" role="alert">{}</div>"#,
                escape_html(message)
            ),
        }
    }
}

fn results_markup(items: &[ResultItem]) -> String {
    let body: String = items.iter().map(ResultItem::to_markup).collect();
    format!(
        r#"<div class="results-header">Found <span class="results-count">{}</span> results</div><div class="results-list">{body}</div>"#,
        items.len()
    )
}

#[derive(Debug, Clone)]
pub struct ResultRenderer {
    links: SourceLinkResolver,
}

impl ResultRenderer {
    pub fn new(links: SourceLinkResolver) -> Self {
        Self { links }
    }

    /// Builds the state for a successful response. Every call produces a
    /// complete state, so rendering the same response twice is a no-op.
    pub fn render(&self, response: &SearchResponse) -> ViewState {
        if response.results.is_empty() {
            return ViewState::Empty;
        }

        let items: Vec<ResultItem> = response
            .results
            .iter()
            .enumerate()
            .map(|(i, result)| self.render_item(i + 1, result))
            .collect();

        match response.summary() {
            Some(summary) => ViewState::SummaryAndResults {
                summary: format_text(summary),
                items,
            },
            None => ViewState::Results(items),
        }
    }

    pub fn render_item(&self, number: usize, result: &SearchResult) -> ResultItem {
        let metadata = result.metadata.as_ref();
        let link = self.links.resolve(metadata);
        ResultItem {
            number,
            breadcrumbs: Breadcrumbs::build(metadata, link),
            score: result.score.map(format_score),
            body: format_content(&result.content),
        }
    }
}
