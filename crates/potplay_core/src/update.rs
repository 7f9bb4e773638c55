use potplay_logging::{potplay_debug, potplay_info};

use crate::{
    AgentState, ControlLabel, Effect, EnsureTrigger, Lifecycle, Msg, Notice, Phase, PushOutcome,
    PushRecord, TimerKind,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AgentState, msg: Msg) -> (AgentState, Vec<Effect>) {
    // Only `Started` is meaningful before the agent runs, and nothing is
    // after it stops.
    if !state.is_running() && msg != Msg::Started {
        return (state, Vec::new());
    }

    let config = *state.config();
    let effects = match msg {
        Msg::Started => {
            if state.lifecycle() != Lifecycle::NotStarted {
                return (state, Vec::new());
            }
            state.start();
            vec![Effect::StartInterval {
                timer: TimerKind::Fast,
                period: config.fast_interval,
            }]
        }
        Msg::StopRequested => {
            state.stop();
            vec![Effect::CancelAllTimers]
        }
        Msg::TimerFired(timer) => match (timer, state.phase()) {
            (TimerKind::Fast, Phase::Fast) => vec![Effect::EnsureControl(EnsureTrigger::Fast)],
            (TimerKind::Idle, Phase::Idle) => vec![Effect::EnsureControl(EnsureTrigger::Idle)],
            (TimerKind::NavigationCheck, _) => {
                vec![Effect::EnsureControl(EnsureTrigger::Navigation)]
            }
            (TimerKind::LabelRestore, _) => {
                // A newer activation owns the label now.
                if state.is_sending() || state.label() != ControlLabel::Sent {
                    Vec::new()
                } else {
                    state.set_label(ControlLabel::Idle);
                    vec![Effect::SetLabel(ControlLabel::Idle)]
                }
            }
            // Stale tick from a timer that was already cancelled.
            (TimerKind::Fast, Phase::Idle) | (TimerKind::Idle, Phase::Fast) => Vec::new(),
        },
        Msg::EnsureReported {
            trigger,
            present,
            elapsed,
        } => {
            state.record_presence(present);
            if trigger != EnsureTrigger::Fast || state.phase() != Phase::Fast {
                return (state, Vec::new());
            }
            state.set_elapsed(elapsed);
            if present {
                potplay_info!("Control inserted; switching to keep-alive polling");
            } else if elapsed > config.fast_ceiling {
                potplay_info!(
                    "Fast polling gave up after {:?}; switching to keep-alive polling",
                    elapsed
                );
            } else {
                return (state, Vec::new());
            }
            state.enter_idle();
            vec![
                Effect::CancelTimer(TimerKind::Fast),
                Effect::StartInterval {
                    timer: TimerKind::Idle,
                    period: config.idle_interval,
                },
            ]
        }
        Msg::Navigated(kind) => {
            potplay_debug!("Navigation {:?}; scheduling control check", kind);
            vec![Effect::ScheduleOnce {
                timer: TimerKind::NavigationCheck,
                delay: config.navigation_delay,
            }]
        }
        Msg::ControlActivated => {
            if !state.begin_activation() {
                potplay_debug!("Activation ignored; a push is already in flight");
                return (state, Vec::new());
            }
            state.set_label(ControlLabel::Scanning);
            vec![
                Effect::SetLabel(ControlLabel::Scanning),
                Effect::ScanCandidates,
            ]
        }
        Msg::ScanFinished { found, page_url } => {
            if !state.is_sending() {
                return (state, Vec::new());
            }
            match found {
                None => {
                    state.finish_activation(ControlLabel::Idle);
                    vec![
                        Effect::Notify {
                            notice: Notice::NoPathFound,
                            duration: config.notice_duration,
                        },
                        Effect::SetLabel(ControlLabel::Idle),
                    ]
                }
                Some(found) => {
                    state.set_label(ControlLabel::Sending);
                    vec![
                        Effect::SetLabel(ControlLabel::Sending),
                        Effect::Push(PushRecord {
                            title: found.raw_title,
                            path: found.path,
                            page_url,
                        }),
                    ]
                }
            }
        }
        Msg::PushFinished(outcome) => {
            if !state.is_sending() {
                return (state, Vec::new());
            }
            match outcome {
                PushOutcome::Delivered { .. } => {
                    state.finish_activation(ControlLabel::Sent);
                    vec![
                        Effect::Notify {
                            notice: Notice::Sent,
                            duration: config.notice_duration,
                        },
                        Effect::SetLabel(ControlLabel::Sent),
                        Effect::ScheduleOnce {
                            timer: TimerKind::LabelRestore,
                            delay: config.label_restore_delay,
                        },
                    ]
                }
                PushOutcome::Failed { .. } => {
                    state.finish_activation(ControlLabel::Idle);
                    vec![
                        Effect::Notify {
                            notice: Notice::SendFailed,
                            duration: config.notice_duration,
                        },
                        Effect::SetLabel(ControlLabel::Idle),
                    ]
                }
            }
        }
    };

    (state, effects)
}
