use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::LocalSet;

use harvest_lens::api::client::SearchClient;
use harvest_lens::app::{App, PageEvent};
use harvest_lens::breadcrumbs::SourceLinkResolver;
use harvest_lens::browser::{MemoryClipboard, MemoryDocument, MemoryHistory};
use harvest_lens::config::CONFIG;
use harvest_lens::page::PageHandle;
use harvest_lens::render::ResultRenderer;
use harvest_lens::session::SearchController;
use harvest_lens::share::ShareController;
use harvest_lens::url_state::UrlStateSync;

/// Drive the search page from a terminal.
///
/// Each line typed is entered into the search box and submitted. `:back` and
/// `:forward` move through history, `:share` copies a link to the current
/// search and `:quit` closes the page.
#[derive(Parser, Debug)]
#[command(name = "harvest-lens", version)]
struct Cli {
    /// URL the page is opened at; a `q` parameter searches immediately
    #[arg(long)]
    url: Option<String>,

    /// Base URL of the search service
    #[arg(long)]
    api: Option<String>,

    /// Prefix for source document links
    #[arg(long)]
    source_base: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber (handles both tracing and log crate)
    let level = CONFIG
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let page_url = cli.url.unwrap_or_else(|| CONFIG.page_url.clone());
    let api_url = cli.api.unwrap_or_else(|| CONFIG.search_api_url.clone());
    let source_base = cli
        .source_base
        .unwrap_or_else(|| CONFIG.source_base_url.clone());

    let history = MemoryHistory::parse(&page_url)
        .with_context(|| format!("invalid page url: {page_url}"))?;
    let url_state = Rc::new(UrlStateSync::new(history));
    let page = PageHandle::default();

    let search = SearchController::new(
        SearchClient::new(&api_url)?,
        url_state.clone(),
        ResultRenderer::new(SourceLinkResolver::new(source_base)),
        page.clone(),
    );
    let share = ShareController::new(
        url_state.clone(),
        MemoryClipboard::default(),
        MemoryDocument::new(),
        page.clone(),
    );
    let app = App::new(search, share);
    let events = app.sender();

    LocalSet::new()
        .run_until(async move {
            let printer = tokio::task::spawn_local(print_page(page));
            let reader = tokio::task::spawn_local(async move {
                if let Err(e) = read_commands(events.clone(), url_state).await {
                    log::error!("stdin closed with error: {:#}", e);
                }
                let _ = events.send(PageEvent::Close);
            });
            app.run().await;
            reader.abort();
            printer.abort();
        })
        .await;

    Ok(())
}

async fn read_commands(
    events: mpsc::UnboundedSender<PageEvent>,
    url_state: Rc<UrlStateSync<MemoryHistory>>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let event = match line.trim() {
            ":quit" | ":q" => PageEvent::Close,
            ":share" => PageEvent::Share,
            ":back" if url_state.address_bar().back() => PageEvent::Navigate,
            ":forward" if url_state.address_bar().forward() => PageEvent::Navigate,
            ":back" | ":forward" => {
                println!("(no history entry)");
                continue;
            }
            _ => {
                events.send(PageEvent::Input(line.clone()))?;
                PageEvent::Submit
            }
        };
        let closing = event == PageEvent::Close;
        events.send(event)?;
        if closing {
            break;
        }
    }
    Ok(())
}

/// Prints the result area whenever it changes.
async fn print_page(page: PageHandle) {
    let mut revisions = page.subscribe();
    let mut last_markup = String::new();
    let mut notice = false;
    while revisions.changed().await.is_ok() {
        let snapshot = page.snapshot();
        let markup = snapshot.to_markup();
        if markup != last_markup {
            println!("{markup}");
            last_markup = markup;
        }
        if snapshot.notice_visible && !notice {
            println!("(link copied)");
        }
        notice = snapshot.notice_visible;
    }
}
