use std::rc::Rc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::api::{SearchService, probe_health};
use crate::browser::{AddressBar, Clipboard, SelectionDocument};
use crate::page::PageHandle;
use crate::session::SearchController;
use crate::share::ShareController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// Everything the page reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// The user edited the search input.
    Input(String),
    /// Search button clicked.
    Submit,
    /// Key pressed inside the search input.
    KeyPress(Key),
    /// The browser moved back or forward.
    Navigate,
    /// Search requested by the URL rather than the user.
    SearchFromUrl(String),
    /// Copy-link button clicked.
    Share,
    /// The page is being torn down.
    Close,
}

/// Wires the controllers to page events.
///
/// Each event is handled in its own local task, so handlers interleave at
/// their await points just as browser callbacks do. Must be run inside a
/// [`tokio::task::LocalSet`].
pub struct App<S, A, C, D>
where
    S: SearchService + 'static,
    A: AddressBar + 'static,
    C: Clipboard + 'static,
    D: SelectionDocument + 'static,
{
    search: Rc<SearchController<S, A>>,
    share: Rc<ShareController<A, C, D>>,
    events_tx: mpsc::UnboundedSender<PageEvent>,
    events_rx: mpsc::UnboundedReceiver<PageEvent>,
}

impl<S, A, C, D> App<S, A, C, D>
where
    S: SearchService + 'static,
    A: AddressBar + 'static,
    C: Clipboard + 'static,
    D: SelectionDocument + 'static,
{
    pub fn new(search: SearchController<S, A>, share: ShareController<A, C, D>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            search: Rc::new(search),
            share: Rc::new(share),
            events_tx,
            events_rx,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<PageEvent> {
        self.events_tx.clone()
    }

    pub fn page(&self) -> &PageHandle {
        self.search.page()
    }

    pub fn search(&self) -> &Rc<SearchController<S, A>> {
        &self.search
    }

    pub fn share(&self) -> &Rc<ShareController<A, C, D>> {
        &self.share
    }

    /// Startup, then the event loop. Returns after [`PageEvent::Close`] once
    /// the tasks still running have finished.
    pub async fn run(mut self) {
        let mut tasks = JoinSet::new();
        self.start(&mut tasks);

        loop {
            tokio::select! {
                event = self.events_rx.recv() => match event {
                    Some(PageEvent::Close) | None => break,
                    Some(event) => self.dispatch(event, &mut tasks),
                },
                Some(finished) = tasks.join_next(), if !tasks.is_empty() => {
                    log_task_failure(finished);
                }
            }
        }

        while let Some(finished) = tasks.join_next().await {
            log_task_failure(finished);
        }
    }

    fn start(&self, tasks: &mut JoinSet<()>) {
        let search = self.search.clone();
        tasks.spawn_local(async move {
            probe_health(search.service()).await;
        });

        let tx = self.events_tx.clone();
        self.search.url_state().on_navigate(move |query| {
            if let Some(query) = query {
                // the receiver only goes away once the page is closed
                let _ = tx.send(PageEvent::SearchFromUrl(query));
            }
        });

        if let Some(query) = self.search.url_state().read_query() {
            log::info!("page loaded with query {query:?}");
            self.spawn_search(Some(query), tasks);
        }
    }

    fn dispatch(&self, event: PageEvent, tasks: &mut JoinSet<()>) {
        match event {
            PageEvent::Input(text) => self.page().update(|p| p.input = text),
            PageEvent::Submit | PageEvent::KeyPress(Key::Enter) => self.spawn_search(None, tasks),
            PageEvent::KeyPress(Key::Other) => {}
            PageEvent::Navigate => self.search.url_state().navigated(),
            PageEvent::SearchFromUrl(query) => self.spawn_search(Some(query), tasks),
            PageEvent::Share => {
                let share = self.share.clone();
                tasks.spawn_local(async move {
                    share.share_current_search().await;
                });
            }
            PageEvent::Close => {}
        }
    }

    fn spawn_search(&self, query: Option<String>, tasks: &mut JoinSet<()>) {
        let search = self.search.clone();
        tasks.spawn_local(async move {
            search.perform_search(query.as_deref()).await;
        });
    }
}

fn log_task_failure(finished: Result<(), tokio::task::JoinError>) {
    if let Err(e) = finished {
        log::error!("page task failed: {e}");
    }
}
