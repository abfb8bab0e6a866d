use std::cell::Cell;
use std::rc::Rc;

use crate::api::SearchService;
use crate::api::models::SearchResponse;
use crate::browser::AddressBar;
use crate::error::{DEFAULT_SERVICE_MESSAGE, SearchError};
use crate::page::PageHandle;
use crate::render::{ResultRenderer, ViewState};
use crate::url_state::UrlStateSync;

/// What a call to [`SearchController::perform_search`] ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Another search was in flight; nothing happened.
    Dropped,
    /// The query was empty; the error view is shown.
    Rejected,
    /// Results (or the empty state) are shown.
    Rendered { results: usize },
    /// The service or transport failed; the error view is shown.
    Failed(String),
}

/// Runs searches one at a time and routes their results to the page.
pub struct SearchController<S: SearchService, A: AddressBar> {
    service: S,
    url_state: Rc<UrlStateSync<A>>,
    renderer: ResultRenderer,
    page: PageHandle,
    in_flight: Cell<bool>,
}

impl<S: SearchService, A: AddressBar> SearchController<S, A> {
    pub fn new(
        service: S,
        url_state: Rc<UrlStateSync<A>>,
        renderer: ResultRenderer,
        page: PageHandle,
    ) -> Self {
        Self {
            service,
            url_state,
            renderer,
            page,
            in_flight: Cell::new(false),
        }
    }

    pub fn page(&self) -> &PageHandle {
        &self.page
    }

    pub fn url_state(&self) -> &Rc<UrlStateSync<A>> {
        &self.url_state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Searches for `query`, or for the input field's text when `query` is
    /// `None`.
    ///
    /// A call made while another search is in flight returns
    /// [`SearchOutcome::Dropped`] without touching the page or the network.
    pub async fn perform_search(&self, query: Option<&str>) -> SearchOutcome {
        if self.in_flight.get() {
            log::debug!("search already in flight, dropping request");
            return SearchOutcome::Dropped;
        }

        let from_url = query.is_some();
        let query = match query {
            Some(q) => q.trim().to_string(),
            None => self.page.read(|p| p.input.trim().to_string()),
        };

        if query.is_empty() {
            self.url_state.write_query(None);
            self.page.update(|p| {
                p.view = ViewState::Error(SearchError::EmptyQuery.user_message().to_string());
            });
            return SearchOutcome::Rejected;
        }

        self.url_state.write_query(Some(&query));
        let _session = InFlight::begin(&self.in_flight, &self.page);
        self.page.update(|p| {
            if from_url {
                p.input = query.clone();
            }
            p.view = ViewState::Loading;
            p.controls_enabled = false;
        });

        match self.fetch(&query).await {
            Ok(response) => {
                let view = self.renderer.render(&response);
                let results = view.result_count();
                log::info!("search {query:?} returned {results} results");
                self.page.update(|p| {
                    if results > 0 {
                        p.scroll_requests += 1;
                    }
                    p.view = view;
                    p.share_visible = true;
                });
                SearchOutcome::Rendered { results }
            }
            Err(e) => {
                if matches!(e, SearchError::Transport(_)) {
                    log::error!("search {query:?} failed: {:#}", e);
                } else {
                    log::warn!("search {query:?} failed: {:#}", e);
                }
                let message = e.user_message().to_string();
                self.page.update(|p| p.view = ViewState::Error(message.clone()));
                SearchOutcome::Failed(message)
            }
        }
    }

    async fn fetch(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let response = self.service.search(query).await?;
        if response.success {
            Ok(response)
        } else {
            Err(SearchError::Service(
                response
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| DEFAULT_SERVICE_MESSAGE.to_string()),
            ))
        }
    }
}

/// Marks a search as in flight for as long as it lives. Dropping it, on any
/// exit path, clears the flag, hides the loading view and re-enables controls.
struct InFlight<'a> {
    flag: &'a Cell<bool>,
    page: &'a PageHandle,
}

impl<'a> InFlight<'a> {
    fn begin(flag: &'a Cell<bool>, page: &'a PageHandle) -> Self {
        flag.set(true);
        Self { flag, page }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
        self.page.update(|p| {
            if p.view.is_loading() {
                p.view = ViewState::Idle;
            }
            p.controls_enabled = true;
        });
    }
}
