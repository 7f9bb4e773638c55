use std::time::Duration;

use crate::ExtractedPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Fast polling interval.
    Fast,
    /// Keep-alive polling interval.
    Idle,
    /// One-shot re-check after a navigation.
    NavigationCheck,
    /// One-shot restore of the control label after a successful push.
    LabelRestore,
}

/// What asked for an ensure pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureTrigger {
    Fast,
    Idle,
    Navigation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    PushState,
    ReplaceState,
    PopState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// The companion answered; the status is informational only.
    Delivered { status: u16 },
    /// Transport failure.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The agent was started on a supported page.
    Started,
    /// The agent is shutting down.
    StopRequested,
    /// A timer owned by the runner fired.
    TimerFired(TimerKind),
    /// Result of an `EnsureControl` effect. `elapsed` is measured from the
    /// start of the fast phase.
    EnsureReported {
        trigger: EnsureTrigger,
        present: bool,
        elapsed: Duration,
    },
    /// A client-side route change happened.
    Navigated(NavigationKind),
    /// User clicked the injected control.
    ControlActivated,
    /// Result of a `ScanCandidates` effect.
    ScanFinished {
        found: Option<ExtractedPath>,
        page_url: String,
    },
    /// Result of a `Push` effect.
    PushFinished(PushOutcome),
}
