//! Error types for the search page.
//!
//! Every failure that originates outside the page (the search service, the
//! network, the clipboard) is represented here and converted into a single
//! user-visible message at the session boundary.

/// Message shown when the user submits nothing.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a search query";

/// Fallback when the service reports a failure without an `error` field.
pub const DEFAULT_SERVICE_MESSAGE: &str = "Search failed";

/// Shown for network failures and unreadable responses.
pub const TRANSPORT_MESSAGE: &str = "Could not reach the search service. Please try again.";

/// Errors that can occur while running a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The effective query was empty or whitespace-only.
    #[error("empty query")]
    EmptyQuery,

    /// The service answered with a non-success status or `success: false`.
    #[error("service error: {0}")]
    Service(String),

    /// The request never completed or the body could not be decoded.
    #[error("transport error: {0}")]
    Transport(String),
}

impl SearchError {
    /// The text placed in the error view.
    pub fn user_message(&self) -> &str {
        match self {
            SearchError::EmptyQuery => EMPTY_QUERY_MESSAGE,
            SearchError::Service(message) => message,
            SearchError::Transport(_) => TRANSPORT_MESSAGE,
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Transport(err.to_string())
    }
}

/// Errors from either clipboard path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard is not available")]
    Unavailable,

    #[error("clipboard access denied: {0}")]
    Denied(String),

    #[error("copy failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_surfaces_verbatim() {
        let err = SearchError::Service("index offline".into());
        assert_eq!(err.user_message(), "index offline");
        assert_eq!(err.to_string(), "service error: index offline");
    }

    #[test]
    fn transport_error_is_generic_for_users() {
        let err = SearchError::Transport("connection refused".into());
        assert_eq!(err.user_message(), TRANSPORT_MESSAGE);
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn empty_query_message() {
        assert_eq!(SearchError::EmptyQuery.user_message(), EMPTY_QUERY_MESSAGE);
    }

    #[test]
    fn clipboard_display() {
        assert_eq!(
            ClipboardError::Denied("NotAllowedError".into()).to_string(),
            "clipboard access denied: NotAllowedError"
        );
        assert_eq!(ClipboardError::Unavailable.to_string(), "clipboard is not available");
    }
}
