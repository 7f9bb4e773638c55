use potplay_core::NavigationKind;
use potplay_logging::potplay_debug;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::agent::AgentEvent;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("cannot navigate from {from} to another origin ({to})")]
    CrossOrigin { from: String, to: String },
}

/// Client-side history of the host page.
pub trait HistoryApi {
    fn push_state(&mut self, url: &str) -> Result<(), NavigationError>;
    fn replace_state(&mut self, url: &str) -> Result<(), NavigationError>;
    /// Moves one entry back. Returns false if there was nothing to go back to.
    fn back(&mut self) -> bool;
    /// Moves one entry forward. Returns false if there was nothing ahead.
    fn forward(&mut self) -> bool;
}

/// Receives a notification after every client-side route change.
pub trait NavigationListener {
    fn on_navigation(&self, kind: NavigationKind);
}

/// Listener that forwards route changes to a running agent.
#[derive(Debug, Clone)]
pub struct NavigationSink {
    tx: mpsc::UnboundedSender<AgentEvent>,
}

impl NavigationSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<AgentEvent>) -> Self {
        Self { tx }
    }
}

impl NavigationListener for NavigationSink {
    fn on_navigation(&self, kind: NavigationKind) {
        let _ = self.tx.send(AgentEvent::Navigated(kind));
    }
}

/// Wraps a history so every successful route change also reaches a
/// listener. The wrapped call always runs and its result is returned
/// unchanged.
pub struct NavigationWatcher<H, L = NavigationSink> {
    inner: H,
    listener: L,
}

impl<H: HistoryApi, L: NavigationListener> NavigationWatcher<H, L> {
    pub fn new(inner: H, listener: L) -> Self {
        Self { inner, listener }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    fn emit(&self, kind: NavigationKind) {
        potplay_debug!("Observed {:?}", kind);
        self.listener.on_navigation(kind);
    }
}

impl<H: HistoryApi, L: NavigationListener> HistoryApi for NavigationWatcher<H, L> {
    fn push_state(&mut self, url: &str) -> Result<(), NavigationError> {
        let result = self.inner.push_state(url);
        if result.is_ok() {
            self.emit(NavigationKind::PushState);
        }
        result
    }

    fn replace_state(&mut self, url: &str) -> Result<(), NavigationError> {
        let result = self.inner.replace_state(url);
        if result.is_ok() {
            self.emit(NavigationKind::ReplaceState);
        }
        result
    }

    fn back(&mut self) -> bool {
        let moved = self.inner.back();
        if moved {
            self.emit(NavigationKind::PopState);
        }
        moved
    }

    fn forward(&mut self) -> bool {
        let moved = self.inner.forward();
        if moved {
            self.emit(NavigationKind::PopState);
        }
        moved
    }
}

/// Lets a page shared with the agent be wrapped by a watcher.
impl<H: HistoryApi> HistoryApi for std::rc::Rc<std::cell::RefCell<H>> {
    fn push_state(&mut self, url: &str) -> Result<(), NavigationError> {
        self.borrow_mut().push_state(url)
    }

    fn replace_state(&mut self, url: &str) -> Result<(), NavigationError> {
        self.borrow_mut().replace_state(url)
    }

    fn back(&mut self) -> bool {
        self.borrow_mut().back()
    }

    fn forward(&mut self) -> bool {
        self.borrow_mut().forward()
    }
}
