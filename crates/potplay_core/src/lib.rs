//! Potplay core: path extraction and the pure agent state machine.
pub mod config;
mod effect;
mod extract;
mod msg;
mod record;
mod route;
mod state;
mod update;
mod view_model;

pub use config::SchedulerConfig;
pub use effect::{Effect, Notice};
pub use extract::{
    extract_path_from_title, has_media_extension, scan, ExtractedPath, ANCHOR_MARKER,
    MEDIA_EXTENSIONS, STORAGE_ROOT_MARKER,
};
pub use msg::{EnsureTrigger, Msg, NavigationKind, PushOutcome, TimerKind};
pub use record::PushRecord;
pub use route::{is_supported_route, ROUTE_PATTERNS};
pub use state::{AgentState, ControlLabel, Lifecycle, Phase};
pub use update::update;
pub use view_model::AgentView;
