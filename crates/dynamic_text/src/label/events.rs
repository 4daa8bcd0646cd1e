//! Hyperlink click event

use std::cell::RefCell;
use std::rc::Rc;

type LinkListener = Box<dyn FnMut(&str)>;

/// Listeners notified with the link id when a hyperlink is clicked
///
/// Clones share the same listener list, which is how click areas created
/// for a label reach the label's listeners.
#[derive(Clone, Default)]
pub struct HyperlinkEvent {
    listeners: Rc<RefCell<Vec<LinkListener>>>,
}

impl HyperlinkEvent {
    /// Create an event with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add_listener(&self, listener: impl FnMut(&str) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    /// Remove every listener
    pub fn remove_all_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Notify every listener of a click on link `id`
    pub fn invoke(&self, id: &str) {
        let Ok(mut listeners) = self.listeners.try_borrow_mut() else {
            log::warn!("Hyperlink '{id}' clicked from inside a hyperlink listener; ignored");
            return;
        };

        log::debug!("Hyperlink '{id}' clicked ({} listeners)", listeners.len());
        for listener in listeners.iter_mut() {
            listener(id);
        }
    }
}

impl std::fmt::Debug for HyperlinkEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperlinkEvent")
            .field("listeners", &self.listeners.try_borrow().map_or(0, |l| l.len()))
            .finish()
    }
}
