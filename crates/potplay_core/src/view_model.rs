use std::time::Duration;

use crate::{ControlLabel, Lifecycle, Phase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentView {
    pub lifecycle: Lifecycle,
    pub phase: Phase,
    pub elapsed_since_start: Duration,
    pub sending: bool,
    pub label: ControlLabel,
    /// Result of the most recent ensure pass.
    pub control_present: bool,
    /// Activations that were accepted (not dropped by the sending guard).
    pub activations: u64,
}
