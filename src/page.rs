use std::cell::RefCell;
use std::rc::Rc;

use tokio::sync::watch;

use crate::render::ViewState;

/// Everything on the page the controllers read or change.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Current text of the search input.
    pub input: String,
    /// Search button and input are enabled.
    pub controls_enabled: bool,
    pub view: ViewState,
    /// The "copy link" button is shown.
    pub share_visible: bool,
    /// The "link copied" notice is shown.
    pub notice_visible: bool,
    /// Times the result area was scrolled into view.
    pub scroll_requests: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            input: String::new(),
            controls_enabled: true,
            view: ViewState::Idle,
            share_visible: false,
            notice_visible: false,
            scroll_requests: 0,
        }
    }
}

impl Page {
    pub fn to_markup(&self) -> String {
        self.view.to_markup()
    }
}

/// Shared handle to the page. Each update bumps a revision that subscribers
/// can wait on.
///
/// Borrows never outlive the closure passed to [`read`](Self::read) or
/// [`update`](Self::update), so no borrow is ever held across an await.
#[derive(Clone)]
pub struct PageHandle {
    page: Rc<RefCell<Page>>,
    revision: Rc<watch::Sender<u64>>,
}

impl PageHandle {
    pub fn new(page: Page) -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            page: Rc::new(RefCell::new(page)),
            revision: Rc::new(tx),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&Page) -> R) -> R {
        f(&self.page.borrow())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Page) -> R) -> R {
        let out = f(&mut self.page.borrow_mut());
        self.revision.send_modify(|rev| *rev += 1);
        out
    }

    pub fn snapshot(&self) -> Page {
        self.read(Page::clone)
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

impl Default for PageHandle {
    fn default() -> Self {
        Self::new(Page::default())
    }
}
