//! Potplay engine: host-page access, control injection, relay and the agent loop.
mod agent;
mod injector;
mod navigation;
mod page;
mod relay;

pub use agent::{Agent, AgentHandle};
pub use injector::{
    ControlInjector, InjectorError, CANDIDATE_ATTRIBUTE, CANDIDATE_SELECTOR, CONTAINER_SELECTOR,
    MARKER_ATTRIBUTE, MARKER_SELECTOR,
};
pub use navigation::{
    HistoryApi, NavigationError, NavigationListener, NavigationSink, NavigationWatcher,
};
pub use page::{HtmlPage, PageDom, PageNotice};
pub use relay::{HttpRelay, Relay, RelayError, RelayResponse, RelaySettings, DEFAULT_PUSH_URL};
