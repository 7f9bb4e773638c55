use std::sync::Once;
use std::time::Duration;

use potplay_core::{
    update, AgentState, Effect, EnsureTrigger, Lifecycle, Msg, NavigationKind, Phase,
    SchedulerConfig, TimerKind,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(potplay_logging::initialize_for_tests);
}

fn started() -> AgentState {
    let (state, _) = update(AgentState::new(), Msg::Started);
    state
}

fn report(state: AgentState, trigger: EnsureTrigger, present: bool, ms: u64) -> (AgentState, Vec<Effect>) {
    update(
        state,
        Msg::EnsureReported {
            trigger,
            present,
            elapsed: Duration::from_millis(ms),
        },
    )
}

#[test]
fn start_enters_fast_phase_with_fast_interval() {
    init_logging();
    let (state, effects) = update(AgentState::new(), Msg::Started);

    assert_eq!(state.view().lifecycle, Lifecycle::Running);
    assert_eq!(state.phase(), Phase::Fast);
    assert_eq!(
        effects,
        vec![Effect::StartInterval {
            timer: TimerKind::Fast,
            period: Duration::from_millis(500),
        }]
    );
}

#[test]
fn second_start_is_ignored() {
    init_logging();
    let state = started();
    let (next, effects) = update(state.clone(), Msg::Started);

    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn fast_tick_requests_ensure() {
    init_logging();
    let (_, effects) = update(started(), Msg::TimerFired(TimerKind::Fast));
    assert_eq!(effects, vec![Effect::EnsureControl(EnsureTrigger::Fast)]);
}

#[test]
fn successful_fast_ensure_switches_to_idle() {
    init_logging();
    let (state, effects) = report(started(), EnsureTrigger::Fast, true, 1_000);

    assert_eq!(state.phase(), Phase::Idle);
    assert!(state.view().control_present);
    assert_eq!(
        effects,
        vec![
            Effect::CancelTimer(TimerKind::Fast),
            Effect::StartInterval {
                timer: TimerKind::Idle,
                period: Duration::from_millis(3_000),
            },
        ]
    );
}

#[test]
fn failed_fast_ensure_within_ceiling_stays_fast() {
    init_logging();
    let (state, effects) = report(started(), EnsureTrigger::Fast, false, 29_500);

    assert_eq!(state.phase(), Phase::Fast);
    assert_eq!(state.view().elapsed_since_start, Duration::from_millis(29_500));
    assert!(effects.is_empty());
}

#[test]
fn fast_phase_gives_up_after_ceiling() {
    init_logging();
    let (state, _) = report(started(), EnsureTrigger::Fast, false, 30_000);
    assert_eq!(state.phase(), Phase::Fast);

    let (state, effects) = report(state, EnsureTrigger::Fast, false, 30_500);
    assert_eq!(state.phase(), Phase::Idle);
    assert!(!state.view().control_present);
    assert_eq!(effects.len(), 2);
    assert_eq!(effects[0], Effect::CancelTimer(TimerKind::Fast));
}

#[test]
fn idle_phase_polls_forever() {
    init_logging();
    let (mut state, _) = report(started(), EnsureTrigger::Fast, false, 31_000);

    for _ in 0..5 {
        let (next, effects) = update(state, Msg::TimerFired(TimerKind::Idle));
        assert_eq!(effects, vec![Effect::EnsureControl(EnsureTrigger::Idle)]);
        let (next, effects) = report(next, EnsureTrigger::Idle, false, 0);
        assert!(effects.is_empty());
        assert_eq!(next.phase(), Phase::Idle);
        state = next;
    }
}

#[test]
fn stale_ticks_are_ignored() {
    init_logging();
    let (_, effects) = update(started(), Msg::TimerFired(TimerKind::Idle));
    assert!(effects.is_empty());

    let (idle, _) = report(started(), EnsureTrigger::Fast, true, 500);
    let (_, effects) = update(idle, Msg::TimerFired(TimerKind::Fast));
    assert!(effects.is_empty());
}

#[test]
fn navigation_schedules_single_delayed_check() {
    init_logging();
    let state = started();
    let (state, effects) = update(state, Msg::Navigated(NavigationKind::PushState));

    assert_eq!(state.phase(), Phase::Fast);
    assert_eq!(
        effects,
        vec![Effect::ScheduleOnce {
            timer: TimerKind::NavigationCheck,
            delay: Duration::from_millis(50),
        }]
    );

    let (_, effects) = update(state, Msg::TimerFired(TimerKind::NavigationCheck));
    assert_eq!(effects, vec![Effect::EnsureControl(EnsureTrigger::Navigation)]);
}

#[test]
fn navigation_ensure_does_not_change_phase() {
    init_logging();
    let (state, effects) = report(started(), EnsureTrigger::Navigation, true, 40_000);

    assert_eq!(state.phase(), Phase::Fast);
    assert!(state.view().control_present);
    assert!(effects.is_empty());
}

#[test]
fn stop_cancels_timers_and_ignores_later_messages() {
    init_logging();
    let (state, effects) = update(started(), Msg::StopRequested);
    assert_eq!(effects, vec![Effect::CancelAllTimers]);
    assert_eq!(state.lifecycle(), Lifecycle::Stopped);

    let (state, effects) = update(state, Msg::TimerFired(TimerKind::Fast));
    assert!(effects.is_empty());
    let (_, effects) = update(state, Msg::Started);
    assert!(effects.is_empty());
}

#[test]
fn custom_config_drives_periods() {
    init_logging();
    let config = SchedulerConfig {
        fast_interval: Duration::from_millis(10),
        idle_interval: Duration::from_millis(20),
        ..SchedulerConfig::default()
    };
    let (state, effects) = update(AgentState::with_config(config), Msg::Started);
    assert_eq!(
        effects,
        vec![Effect::StartInterval {
            timer: TimerKind::Fast,
            period: Duration::from_millis(10),
        }]
    );

    let (_, effects) = report(state, EnsureTrigger::Fast, true, 10);
    assert_eq!(
        effects[1],
        Effect::StartInterval {
            timer: TimerKind::Idle,
            period: Duration::from_millis(20),
        }
    );
}
