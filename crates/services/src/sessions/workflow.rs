use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, warn};

use quiz_core::model::{CategoryFilter, SessionSettingsDraft};

use super::countdown::TimerToken;
use super::machine::QuizMachine;
use super::view::QuizView;
use crate::error::SessionError;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// User action sent from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizIntent {
    SelectCategory(CategoryFilter),
    ApplySettings(SessionSettingsDraft),
    Start,
    ToggleOption(usize),
    Submit,
    Next,
    Abort,
    Restart,
    BackToStart,
}

/// Presentation-side handle to a running `SessionLoop`.
///
/// Clones share the same loop. The loop stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    intents: mpsc::UnboundedSender<QuizIntent>,
    view: watch::Receiver<QuizView>,
}

impl SessionHandle {
    /// Queue an intent behind any already sent.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::LoopClosed` if the loop task has stopped.
    pub fn send(&self, intent: QuizIntent) -> Result<(), SessionError> {
        self.intents
            .send(intent)
            .map_err(|_| SessionError::LoopClosed)
    }

    /// Latest published view.
    #[must_use]
    pub fn view(&self) -> QuizView {
        self.view.borrow().clone()
    }

    /// Receiver notified after every processed event.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizView> {
        self.view.clone()
    }
}

/// Runs a `QuizMachine` on the tokio runtime.
///
/// Intents and countdown ticks are fed through one task, one event at a
/// time. A ticker task exists only while the machine reports a live timer
/// token and is aborted as soon as the token changes.
pub struct SessionLoop;

impl SessionLoop {
    /// Spawn the loop. The join handle yields the machine back after the loop stops.
    #[must_use]
    pub fn spawn(machine: QuizMachine) -> (SessionHandle, JoinHandle<QuizMachine>) {
        let (intent_tx, intent_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(machine.view());
        let task = tokio::spawn(run(machine, intent_rx, view_tx));
        (
            SessionHandle {
                intents: intent_tx,
                view: view_rx,
            },
            task,
        )
    }
}

struct Ticker {
    token: TimerToken,
    task: JoinHandle<()>,
}

async fn run(
    mut machine: QuizMachine,
    mut intents: mpsc::UnboundedReceiver<QuizIntent>,
    view_tx: watch::Sender<QuizView>,
) -> QuizMachine {
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let mut ticker: Option<Ticker> = None;
    sync_ticker(&machine, &mut ticker, &tick_tx);

    loop {
        tokio::select! {
            intent = intents.recv() => {
                let Some(intent) = intent else { break };
                apply_intent(&mut machine, intent);
            }
            Some(token) = tick_rx.recv() => {
                let _ = machine.tick(token);
            }
        }
        sync_ticker(&machine, &mut ticker, &tick_tx);
        view_tx.send_replace(machine.view());
    }

    if let Some(old) = ticker.take() {
        old.task.abort();
    }
    debug!("session loop stopped");
    machine
}

fn apply_intent(machine: &mut QuizMachine, intent: QuizIntent) {
    let _ = match intent {
        QuizIntent::SelectCategory(category) => machine.select_category(category),
        QuizIntent::ApplySettings(draft) => match machine.apply_settings(draft) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "settings rejected");
                return;
            }
        },
        QuizIntent::Start => machine.start(),
        QuizIntent::ToggleOption(index) => machine.toggle_option(index),
        QuizIntent::Submit => machine.submit(),
        QuizIntent::Next => machine.next(),
        QuizIntent::Abort => machine.abort(),
        QuizIntent::Restart => machine.restart(),
        QuizIntent::BackToStart => machine.back_to_start(),
    };
}

/// Keep exactly one ticker for the machine's live countdown, or none.
fn sync_ticker(
    machine: &QuizMachine,
    ticker: &mut Option<Ticker>,
    tick_tx: &mpsc::UnboundedSender<TimerToken>,
) {
    let wanted = machine.timer_token();
    if ticker.as_ref().map(|t| t.token) == wanted {
        return;
    }
    if let Some(old) = ticker.take() {
        old.task.abort();
    }
    *ticker = wanted.map(|token| Ticker {
        token,
        task: tokio::spawn(tick_every_second(token, tick_tx.clone())),
    });
}

async fn tick_every_second(token: TimerToken, tick_tx: mpsc::UnboundedSender<TimerToken>) {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    loop {
        interval.tick().await;
        if tick_tx.send(token).is_err() {
            break;
        }
    }
}
