use std::time::Duration;

use crate::{ControlLabel, EnsureTrigger, PushRecord, TimerKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a repeating timer whose first tick comes after one `period`.
    StartInterval { timer: TimerKind, period: Duration },
    CancelTimer(TimerKind),
    /// Fire `timer` once after `delay`.
    ScheduleOnce { timer: TimerKind, delay: Duration },
    EnsureControl(EnsureTrigger),
    ScanCandidates,
    SetLabel(ControlLabel),
    Notify { notice: Notice, duration: Duration },
    Push(PushRecord),
    CancelAllTimers,
}

/// Transient notifications shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoPathFound,
    Sent,
    SendFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::NoPathFound => "未找到可用的 NAS 路径",
            Notice::Sent => "已发送 ✅",
            Notice::SendFailed => "发送失败 ❌（查看日志）",
        }
    }
}
