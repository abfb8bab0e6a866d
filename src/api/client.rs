use reqwest::{Client, StatusCode, Url};

use crate::error::{DEFAULT_SERVICE_MESSAGE, SearchError};

use super::SearchService;
use super::models::{HealthResponse, SearchRequest, SearchResponse};

/// HTTP implementation of [`SearchService`].
///
/// No timeout is configured: a request resolves or fails on the transport's
/// own terms.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: Client,
    search_url: Url,
    health_url: Url,
}

impl SearchClient {
    pub fn new(base_url: &str) -> Result<SearchClient, SearchError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<SearchClient, SearchError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| SearchError::Transport(format!("invalid service url {base_url}: {e}")))?;
        // `join` would drop the last path segment otherwise
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let join = |path: &str| {
            base.join(path)
                .map_err(|e| SearchError::Transport(format!("invalid service url {base}: {e}")))
        };

        Ok(SearchClient {
            search_url: join("search")?,
            health_url: join("health")?,
            http,
        })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

impl SearchService for SearchClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let request = SearchRequest {
            query: query.to_string(),
        };
        let res = self
            .http
            .post(self.search_url.clone())
            .json(&request)
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(SearchError::Service(service_message(status, &body)));
        }

        serde_json::from_str(&body)
            .map_err(|e| SearchError::Transport(format!("malformed search response: {e}")))
    }

    async fn health(&self) -> Result<HealthResponse, SearchError> {
        let res = self.http.get(self.health_url.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(SearchError::Service(format!("health check returned {status}")));
        }
        let body = res.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| SearchError::Transport(format!("malformed health response: {e}")))
    }
}

/// Pulls `error` out of a failure body, whatever shape the rest of it has.
fn service_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<SearchResponse>(body) {
        Ok(SearchResponse {
            error: Some(error), ..
        }) if !error.is_empty() => error,
        _ => {
            log::debug!("search failed with {status} and no error message");
            DEFAULT_SERVICE_MESSAGE.to_string()
        }
    }
}

#[test]
fn test_service_message() {
    assert_eq!(
        service_message(StatusCode::BAD_REQUEST, r#"{"error": "query must not be empty"}"#),
        "query must not be empty"
    );
    assert_eq!(
        service_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
        DEFAULT_SERVICE_MESSAGE
    );
    assert_eq!(
        service_message(StatusCode::BAD_GATEWAY, r#"{"error": ""}"#),
        DEFAULT_SERVICE_MESSAGE
    );
}

#[test]
fn test_endpoint_urls() {
    let client = SearchClient::new("http://localhost:5000/api").unwrap();
    assert_eq!(client.search_url().as_str(), "http://localhost:5000/api/search");
    assert_eq!(client.health_url.as_str(), "http://localhost:5000/api/health");

    let client = SearchClient::new("http://localhost:5000").unwrap();
    assert_eq!(client.search_url().as_str(), "http://localhost:5000/search");
}
