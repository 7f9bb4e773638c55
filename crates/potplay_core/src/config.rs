//! Fixed tunables for the agent's timing.
//!
//! There is no configuration file; these constants are the configuration.
//! [`SchedulerConfig`] groups them so tests can run with shorter periods.
use std::time::Duration;

/// Polling period while the control has not been inserted yet.
pub const FAST_INTERVAL: Duration = Duration::from_millis(500);
/// How long fast polling may run before falling back to idle polling.
pub const FAST_CEILING: Duration = Duration::from_millis(30_000);
/// Keep-alive polling period once the scheduler is idle.
pub const IDLE_INTERVAL: Duration = Duration::from_millis(3_000);
/// Delay between a client-side navigation and the out-of-band re-check.
pub const NAVIGATION_DELAY: Duration = Duration::from_millis(50);
/// How long the success label stays on the control.
pub const LABEL_RESTORE_DELAY: Duration = Duration::from_millis(2_000);
/// How long a notification stays visible.
pub const NOTICE_DURATION: Duration = Duration::from_millis(2_500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub fast_interval: Duration,
    pub fast_ceiling: Duration,
    pub idle_interval: Duration,
    pub navigation_delay: Duration,
    pub label_restore_delay: Duration,
    pub notice_duration: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fast_interval: FAST_INTERVAL,
            fast_ceiling: FAST_CEILING,
            idle_interval: IDLE_INTERVAL,
            navigation_delay: NAVIGATION_DELAY,
            label_restore_delay: LABEL_RESTORE_DELAY,
            notice_duration: NOTICE_DURATION,
        }
    }
}
