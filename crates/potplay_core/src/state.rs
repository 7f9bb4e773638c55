use std::time::Duration;

use crate::view_model::AgentView;
use crate::SchedulerConfig;

/// Polling cadence of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Fast,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    NotStarted,
    Running,
    Stopped,
}

/// Text shown on the injected control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlLabel {
    #[default]
    Idle,
    Scanning,
    Sending,
    Sent,
}

impl ControlLabel {
    pub fn text(self) -> &'static str {
        match self {
            ControlLabel::Idle => "potplay",
            ControlLabel::Scanning => "扫描中...",
            ControlLabel::Sending => "发送中...",
            ControlLabel::Sent => "potplay ✅",
        }
    }
}

/// Everything the agent tracks between events. Timer handles live with the
/// runner; this only records which phase they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentState {
    config: SchedulerConfig,
    lifecycle: Lifecycle,
    phase: Phase,
    elapsed_since_start: Duration,
    sending: bool,
    label: ControlLabel,
    control_present: bool,
    activations: u64,
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn label(&self) -> ControlLabel {
        self.label
    }

    pub fn view(&self) -> AgentView {
        AgentView {
            lifecycle: self.lifecycle,
            phase: self.phase,
            elapsed_since_start: self.elapsed_since_start,
            sending: self.sending,
            label: self.label,
            control_present: self.control_present,
            activations: self.activations,
        }
    }

    pub(crate) fn start(&mut self) {
        self.lifecycle = Lifecycle::Running;
        self.phase = Phase::Fast;
        self.elapsed_since_start = Duration::ZERO;
    }

    pub(crate) fn stop(&mut self) {
        self.lifecycle = Lifecycle::Stopped;
        self.sending = false;
    }

    pub(crate) fn enter_idle(&mut self) {
        self.phase = Phase::Idle;
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed_since_start = elapsed;
    }

    pub(crate) fn record_presence(&mut self, present: bool) {
        self.control_present = present;
    }

    pub(crate) fn set_label(&mut self, label: ControlLabel) {
        self.label = label;
    }

    /// Takes the sending guard. Returns false if it was already held.
    pub(crate) fn begin_activation(&mut self) -> bool {
        if self.sending {
            return false;
        }
        self.sending = true;
        self.activations += 1;
        true
    }

    /// Releases the sending guard and settles the label.
    pub(crate) fn finish_activation(&mut self, label: ControlLabel) {
        self.sending = false;
        self.label = label;
    }
}
