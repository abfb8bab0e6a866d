//! Browser capabilities the page depends on, plus in-memory implementations
//! used by the terminal driver and the tests.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ClipboardError;

/// State payload attached to every history entry the page pushes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub query: Option<String>,
}

/// The address bar and session history.
pub trait AddressBar {
    fn location(&self) -> Url;

    /// Changes the visible URL and adds a history entry without reloading.
    fn push_state(&self, url: Url, state: HistoryState);
}

/// The asynchronous system clipboard.
#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Handle to a transient element created in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u32);

/// The pieces of the document needed for the select-and-copy fallback.
pub trait SelectionDocument {
    /// Appends an off-screen, read-only textarea holding `text`.
    fn create_offscreen_textarea(&self, text: &str) -> ElementId;
    fn focus(&self, element: ElementId);
    fn select_all(&self, element: ElementId);
    /// Copies the current selection.
    fn exec_copy(&self) -> Result<(), ClipboardError>;
    fn remove(&self, element: ElementId);
}

/// History stack with a cursor, like a browser tab.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: RefCell<Vec<(Url, HistoryState)>>,
    cursor: Cell<usize>,
}

impl MemoryHistory {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: RefCell::new(vec![(initial, HistoryState::default())]),
            cursor: Cell::new(0),
        }
    }

    pub fn parse(initial: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(initial)?))
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn current_state(&self) -> HistoryState {
        self.entries.borrow()[self.cursor.get()].1.clone()
    }

    /// Moves one entry back. Returns `false` at the start of history.
    pub fn back(&self) -> bool {
        match self.cursor.get() {
            0 => false,
            n => {
                self.cursor.set(n - 1);
                true
            }
        }
    }

    /// Moves one entry forward. Returns `false` at the end of history.
    pub fn forward(&self) -> bool {
        let next = self.cursor.get() + 1;
        if next < self.len() {
            self.cursor.set(next);
            true
        } else {
            false
        }
    }
}

impl AddressBar for MemoryHistory {
    fn location(&self) -> Url {
        self.entries.borrow()[self.cursor.get()].0.clone()
    }

    fn push_state(&self, url: Url, state: HistoryState) {
        let mut entries = self.entries.borrow_mut();
        // pushing drops any forward entries
        entries.truncate(self.cursor.get() + 1);
        entries.push((url, state));
        self.cursor.set(entries.len() - 1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipboardMode {
    #[default]
    Allow,
    Deny,
    Missing,
}

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    mode: Cell<ClipboardMode>,
    contents: RefCell<Option<String>>,
}

impl MemoryClipboard {
    pub fn new(mode: ClipboardMode) -> Self {
        Self {
            mode: Cell::new(mode),
            contents: RefCell::new(None),
        }
    }

    pub fn set_mode(&self, mode: ClipboardMode) {
        self.mode.set(mode);
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        match self.mode.get() {
            ClipboardMode::Allow => {
                *self.contents.borrow_mut() = Some(text.to_string());
                Ok(())
            }
            ClipboardMode::Deny => Err(ClipboardError::Denied("write permission denied".into())),
            ClipboardMode::Missing => Err(ClipboardError::Unavailable),
        }
    }
}

/// Minimal document: tracks live elements, focus and selection, and what the
/// last successful copy put on the clipboard.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    next_id: Cell<u32>,
    elements: RefCell<Vec<(ElementId, String)>>,
    focused: Cell<Option<ElementId>>,
    selection: RefCell<Option<String>>,
    copy_fails: Cell<bool>,
    copied: RefCell<Option<String>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_copy_fails(&self, fails: bool) {
        self.copy_fails.set(fails);
    }

    pub fn live_elements(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn copied(&self) -> Option<String> {
        self.copied.borrow().clone()
    }
}

impl SelectionDocument for MemoryDocument {
    fn create_offscreen_textarea(&self, text: &str) -> ElementId {
        let id = ElementId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.elements.borrow_mut().push((id, text.to_string()));
        id
    }

    fn focus(&self, element: ElementId) {
        self.focused.set(Some(element));
    }

    fn select_all(&self, element: ElementId) {
        let text = self
            .elements
            .borrow()
            .iter()
            .find(|(id, _)| *id == element)
            .map(|(_, text)| text.clone());
        *self.selection.borrow_mut() = text;
    }

    fn exec_copy(&self) -> Result<(), ClipboardError> {
        if self.copy_fails.get() {
            return Err(ClipboardError::Failed("copy command was rejected".into()));
        }
        let selection = self
            .selection
            .borrow()
            .clone()
            .ok_or_else(|| ClipboardError::Failed("nothing selected".into()))?;
        *self.copied.borrow_mut() = Some(selection);
        Ok(())
    }

    fn remove(&self, element: ElementId) {
        self.elements.borrow_mut().retain(|(id, _)| *id != element);
        if self.focused.get() == Some(element) {
            self.focused.set(None);
            *self.selection.borrow_mut() = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_push_back_forward() {
        let history = MemoryHistory::parse("http://page.test/").unwrap();
        let a = Url::parse("http://page.test/?q=a").unwrap();
        let b = Url::parse("http://page.test/?q=b").unwrap();
        history.push_state(a.clone(), HistoryState { query: Some("a".into()) });
        history.push_state(b.clone(), HistoryState { query: Some("b".into()) });
        assert_eq!(history.len(), 3);
        assert_eq!(history.location(), b);

        assert!(history.back());
        assert_eq!(history.location(), a);
        assert_eq!(history.current_state().query.as_deref(), Some("a"));
        assert!(history.forward());
        assert_eq!(history.location(), b);
        assert!(!history.forward());
    }

    #[test]
    fn test_push_discards_forward_entries() {
        let history = MemoryHistory::parse("http://page.test/").unwrap();
        history.push_state(Url::parse("http://page.test/?q=a").unwrap(), HistoryState::default());
        assert!(history.back());
        history.push_state(Url::parse("http://page.test/?q=c").unwrap(), HistoryState::default());
        assert_eq!(history.len(), 2);
        assert!(!history.forward());
    }

    #[test]
    fn test_history_state_payload_shape() {
        let state = HistoryState { query: Some("shoes".into()) };
        assert_eq!(serde_json::to_string(&state).unwrap(), r#"{"query":"shoes"}"#);
    }
}
