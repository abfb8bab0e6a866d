use std::rc::Rc;
use std::time::Duration;

use crate::browser::{AddressBar, Clipboard, ElementId, SelectionDocument};
use crate::error::ClipboardError;
use crate::page::PageHandle;
use crate::url_state::UrlStateSync;

/// How long the "link copied" notice stays up.
pub const NOTICE_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    Clipboard,
    Selection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Nothing typed, nothing shared.
    Skipped,
    Copied { url: String, path: CopyPath },
    /// Both copy paths failed. Only logged.
    Failed,
}

/// Copies a link to the current search.
pub struct ShareController<A: AddressBar, C: Clipboard, D: SelectionDocument> {
    url_state: Rc<UrlStateSync<A>>,
    clipboard: C,
    document: D,
    page: PageHandle,
}

impl<A, C, D> ShareController<A, C, D>
where
    A: AddressBar,
    C: Clipboard,
    D: SelectionDocument,
{
    pub fn new(url_state: Rc<UrlStateSync<A>>, clipboard: C, document: D, page: PageHandle) -> Self {
        Self {
            url_state,
            clipboard,
            document,
            page,
        }
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn page(&self) -> &PageHandle {
        &self.page
    }

    /// Copies the shareable URL for the input's current text.
    ///
    /// Must run inside a `LocalSet`: the notice is hidden by a local timer task.
    pub async fn share_current_search(&self) -> ShareOutcome {
        let query = self.page.read(|p| p.input.trim().to_string());
        if query.is_empty() {
            return ShareOutcome::Skipped;
        }

        let url = self.url_state.shareable_url(&query).to_string();
        let path = match self.clipboard.write_text(&url).await {
            Ok(()) => CopyPath::Clipboard,
            Err(e) => {
                log::debug!("clipboard write failed ({e}), falling back to selection copy");
                match copy_via_selection(&self.document, &url) {
                    Ok(()) => CopyPath::Selection,
                    Err(e) => {
                        log::error!("could not copy share link: {e}");
                        return ShareOutcome::Failed;
                    }
                }
            }
        };

        log::info!("share link copied: {url}");
        self.show_notice();
        ShareOutcome::Copied { url, path }
    }

    fn show_notice(&self) {
        self.page.update(|p| p.notice_visible = true);
        let page = self.page.clone();
        // not tracked; an earlier timer may hide a later notice early
        tokio::task::spawn_local(async move {
            tokio::time::sleep(NOTICE_DURATION).await;
            page.update(|p| p.notice_visible = false);
        });
    }
}

/// Copies `text` through a temporary off-screen textarea. The element is
/// removed whether or not the copy succeeds.
pub fn copy_via_selection<D: SelectionDocument>(document: &D, text: &str) -> Result<(), ClipboardError> {
    let element = TransientElement {
        document,
        id: document.create_offscreen_textarea(text),
    };
    document.focus(element.id);
    document.select_all(element.id);
    document.exec_copy()
}

struct TransientElement<'a, D: SelectionDocument> {
    document: &'a D,
    id: ElementId,
}

impl<D: SelectionDocument> Drop for TransientElement<'_, D> {
    fn drop(&mut self) {
        self.document.remove(self.id);
    }
}
