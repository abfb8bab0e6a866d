use std::cell::RefCell;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::browser::{AddressBar, HistoryState};

/// Name of the query parameter that carries the active search.
pub const QUERY_PARAM: &str = "q";

/// Bytes escaped in a shared query value; spaces become `%20`, not `+`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

type NavigateHandler = Box<dyn Fn(Option<String>)>;

/// Keeps the `q` parameter of the address bar in step with the active search.
pub struct UrlStateSync<A: AddressBar> {
    address_bar: A,
    handlers: RefCell<Vec<NavigateHandler>>,
}

impl<A: AddressBar> UrlStateSync<A> {
    pub fn new(address_bar: A) -> Self {
        Self {
            address_bar,
            handlers: RefCell::new(Vec::new()),
        }
    }

    pub fn address_bar(&self) -> &A {
        &self.address_bar
    }

    /// The trimmed `q` parameter, if present and non-empty.
    pub fn read_query(&self) -> Option<String> {
        query_param(&self.address_bar.location())
    }

    /// Sets `q` (or removes it for `None`) and pushes a history entry.
    ///
    /// Other parameters are kept. Nothing is pushed when the URL already
    /// carries the same query, or when clearing and no `q` is present at all.
    pub fn write_query(&self, query: Option<&str>) {
        let current = self.address_bar.location();
        let unchanged = match query {
            Some(query) => query_param(&current).as_deref() == Some(query),
            None => !current.query_pairs().any(|(k, _)| k == QUERY_PARAM),
        };
        if unchanged {
            return;
        }

        let mut next = current.clone();
        let kept: Vec<(String, String)> = current
            .query_pairs()
            .filter(|(k, _)| k != QUERY_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        next.set_query(None);
        if !kept.is_empty() || query.is_some() {
            let mut pairs = next.query_pairs_mut();
            pairs.extend_pairs(kept);
            if let Some(query) = query {
                pairs.append_pair(QUERY_PARAM, query);
            }
        }

        log::debug!("history push: {next}");
        self.address_bar.push_state(
            next,
            HistoryState {
                query: query.map(str::to_string),
            },
        );
    }

    /// Registers a handler that receives [`read_query`](Self::read_query)
    /// after each back/forward navigation.
    pub fn on_navigate<F>(&self, handler: F)
    where
        F: Fn(Option<String>) + 'static,
    {
        self.handlers.borrow_mut().push(Box::new(handler));
    }

    /// Called by the host after the browser moved through history.
    pub fn navigated(&self) {
        let query = self.read_query();
        for handler in self.handlers.borrow().iter() {
            handler(query.clone());
        }
    }

    /// `origin + path + ?q=<query>`; other parameters and the fragment are dropped.
    pub fn shareable_url(&self, query: &str) -> Url {
        let mut url = self.address_bar.location();
        url.set_fragment(None);
        let encoded = utf8_percent_encode(query, COMPONENT);
        url.set_query(Some(&format!("{QUERY_PARAM}={encoded}")));
        url
    }
}

fn query_param(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == QUERY_PARAM)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
