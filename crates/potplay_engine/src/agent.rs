use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use potplay_core::{
    is_supported_route, scan, update, AgentState, AgentView, Effect, EnsureTrigger, Msg,
    NavigationKind, PushOutcome, PushRecord, SchedulerConfig, TimerKind,
};
use potplay_logging::{potplay_debug, potplay_error, potplay_info, potplay_trace};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::injector::{ControlInjector, InjectorError};
use crate::navigation::NavigationSink;
use crate::page::PageDom;
use crate::relay::{Relay, RelayError};

/// Everything that can wake the agent loop.
#[derive(Debug)]
pub(crate) enum AgentEvent {
    Timer(TimerKind),
    Navigated(NavigationKind),
    ControlClicked,
    PushFinished(PushOutcome),
}

/// Cloneable handle used by the host side to talk to a running agent.
#[derive(Debug, Clone)]
pub struct AgentHandle {
    tx: mpsc::UnboundedSender<AgentEvent>,
    cancel: CancellationToken,
}

impl AgentHandle {
    /// The user clicked the injected control.
    pub fn activate_control(&self) {
        let _ = self.tx.send(AgentEvent::ControlClicked);
    }

    pub fn navigation_sink(&self) -> NavigationSink {
        NavigationSink::new(self.tx.clone())
    }

    /// Cancels all timers and ends [`Agent::run`]. An in-flight push is not
    /// cancelled but its result is ignored.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

/// Single coordinating instance: owns the scheduler state, the sending
/// guard and every timer handle, and executes the effects `update` returns.
///
/// The loop is single-threaded; run it on a current-thread runtime or inside
/// a `LocalSet`.
pub struct Agent<P: PageDom> {
    page: Rc<RefCell<P>>,
    injector: ControlInjector,
    relay: Arc<dyn Relay>,
    state: AgentState,
    tx: mpsc::UnboundedSender<AgentEvent>,
    rx: mpsc::UnboundedReceiver<AgentEvent>,
    cancel: CancellationToken,
    intervals: HashMap<TimerKind, JoinHandle<()>>,
    one_shots: Vec<JoinHandle<()>>,
    fast_started: Instant,
}

impl<P: PageDom> Agent<P> {
    pub fn new(
        page: Rc<RefCell<P>>,
        relay: Arc<dyn Relay>,
        config: SchedulerConfig,
    ) -> Result<Self, InjectorError> {
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            page,
            injector: ControlInjector::new()?,
            relay,
            state: AgentState::with_config(config),
            tx,
            rx,
            cancel: CancellationToken::new(),
            intervals: HashMap::new(),
            one_shots: Vec::new(),
            fast_started: Instant::now(),
        })
    }

    pub fn handle(&self) -> AgentHandle {
        AgentHandle {
            tx: self.tx.clone(),
            cancel: self.cancel.clone(),
        }
    }

    pub fn view(&self) -> AgentView {
        self.state.view()
    }

    /// Runs until [`AgentHandle::stop`]. Returns the final view. Pages
    /// outside the supported routes return immediately.
    pub async fn run(mut self) -> AgentView {
        let location = self.page.borrow().location();
        let supported = Url::parse(&location).is_ok_and(|url| is_supported_route(url.path()));
        if !supported {
            potplay_info!("Not a movie or episode page, agent idle: {}", location);
            return self.state.view();
        }

        potplay_info!("Agent started on {}", location);
        self.dispatch(Msg::Started);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    self.dispatch(Msg::StopRequested);
                    break;
                }
                event = self.rx.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
            }
        }

        potplay_info!("Agent stopped");
        self.state.view()
    }

    fn handle_event(&mut self, event: AgentEvent) {
        let msg = match event {
            AgentEvent::Timer(timer) => {
                potplay_trace!("{:?} timer fired", timer);
                Msg::TimerFired(timer)
            }
            AgentEvent::Navigated(kind) => Msg::Navigated(kind),
            AgentEvent::PushFinished(outcome) => Msg::PushFinished(outcome),
            AgentEvent::ControlClicked => {
                if !self.injector.is_present(&*self.page.borrow()) {
                    potplay_debug!("Click ignored; control is not on the page");
                    return;
                }
                Msg::ControlActivated
            }
        };
        self.dispatch(msg);
    }

    /// Applies `msg` and every follow-up message produced by its effects.
    fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            for effect in effects {
                if let Some(follow_up) = self.execute(effect) {
                    inbox.push_back(follow_up);
                }
            }
        }
    }

    fn execute(&mut self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::StartInterval { timer, period } => {
                if timer == TimerKind::Fast {
                    self.fast_started = Instant::now();
                }
                let handle = spawn_interval(self.tx.clone(), timer, period);
                if let Some(previous) = self.intervals.insert(timer, handle) {
                    previous.abort();
                }
                None
            }
            Effect::CancelTimer(timer) => {
                if let Some(handle) = self.intervals.remove(&timer) {
                    handle.abort();
                }
                None
            }
            Effect::ScheduleOnce { timer, delay } => {
                self.one_shots.retain(|handle| !handle.is_finished());
                self.one_shots
                    .push(spawn_once(self.tx.clone(), timer, delay));
                None
            }
            Effect::CancelAllTimers => {
                for (_, handle) in self.intervals.drain() {
                    handle.abort();
                }
                for handle in self.one_shots.drain(..) {
                    handle.abort();
                }
                None
            }
            Effect::EnsureControl(trigger) => {
                let present = self.injector.ensure(&mut *self.page.borrow_mut());
                if trigger == EnsureTrigger::Navigation {
                    potplay_debug!("Navigation check: control present = {}", present);
                }
                Some(Msg::EnsureReported {
                    trigger,
                    present,
                    elapsed: self.fast_started.elapsed(),
                })
            }
            Effect::ScanCandidates => {
                let page = self.page.borrow();
                let candidates = self.injector.gather_candidates(&*page);
                Some(Msg::ScanFinished {
                    found: scan(&candidates),
                    page_url: page.location(),
                })
            }
            Effect::SetLabel(label) => {
                self.injector
                    .set_label(&mut *self.page.borrow_mut(), label);
                None
            }
            Effect::Notify { notice, duration } => {
                self.page.borrow_mut().notify(notice.message(), duration);
                None
            }
            Effect::Push(record) => {
                spawn_push(Arc::clone(&self.relay), self.tx.clone(), record);
                None
            }
        }
    }
}

fn spawn_interval(
    tx: mpsc::UnboundedSender<AgentEvent>,
    timer: TimerKind,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if tx.send(AgentEvent::Timer(timer)).is_err() {
                break;
            }
        }
    })
}

fn spawn_once(
    tx: mpsc::UnboundedSender<AgentEvent>,
    timer: TimerKind,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        time::sleep(delay).await;
        let _ = tx.send(AgentEvent::Timer(timer));
    })
}

/// Sends `record` off the loop. A result always comes back, even if the
/// relay task dies, so the sending guard cannot stay held.
fn spawn_push(relay: Arc<dyn Relay>, tx: mpsc::UnboundedSender<AgentEvent>, record: PushRecord) {
    let send = tokio::spawn(async move { relay.send(&record).await });
    tokio::spawn(async move {
        let result = match send.await {
            Ok(result) => result,
            Err(join_err) => Err(RelayError::Aborted(join_err.to_string())),
        };
        let outcome = match result {
            Ok(response) => {
                potplay_info!("push ok: {} {}", response.status, response.body);
                PushOutcome::Delivered {
                    status: response.status,
                }
            }
            Err(err) => {
                potplay_error!("push error: {}", err);
                PushOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        };
        let _ = tx.send(AgentEvent::PushFinished(outcome));
    });
}
