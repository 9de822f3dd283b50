use log::debug;
use rand::Rng;
use rand::rngs::StdRng;

use crate::game::{GameEngine, GameEvent, GameStatus, Outcome, RenderSnapshot};
use crate::input::GameInput;
use crate::overlay::Overlay;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::unlock::{UnlockNotifier, UnlockStorage};

/// Runs one engine against a tick scheduler and routes its notifications to
/// the overlay and unlock notifier.
///
/// At most one tick is ever scheduled, and none is once the session ends.
#[derive(Debug)]
pub struct GameDriver<S, U, R = StdRng> {
    engine: GameEngine<R>,
    scheduler: S,
    timer: Option<TimerHandle>,
    notifier: UnlockNotifier<U>,
    overlay: Overlay,
    frame: RenderSnapshot,
    score: u32,
}

impl<S, U, R> GameDriver<S, U, R>
where
    S: Scheduler,
    U: UnlockStorage,
    R: Rng,
{
    pub fn new(engine: GameEngine<R>, scheduler: S, notifier: UnlockNotifier<U>) -> Self {
        let frame = engine.snapshot();
        let mut driver = Self {
            engine,
            scheduler,
            timer: None,
            notifier,
            overlay: Overlay::new(),
            frame,
            score: 0,
        };
        driver.process_events();
        driver
    }

    /// Applies one input event. `Quit` is left to the caller.
    pub fn handle_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => self.engine.request_direction(direction),
            // A lost session restarts from any pad press; a won one waits for Confirm.
            GameInput::Control(direction) => match self.engine.status() {
                GameStatus::Ended { won: false } => self.engine.restart(),
                _ => self.engine.request_direction(direction),
            },
            GameInput::Confirm => match self.engine.status() {
                GameStatus::Idle => self.engine.start(),
                GameStatus::Ended { .. } => self.engine.restart(),
                GameStatus::Running => {}
            },
            GameInput::Quit => return,
        }

        self.process_events();
        self.sync_timer();
    }

    /// Runs the tick for `handle` if it is the armed timer.
    pub fn on_timer(&mut self, handle: TimerHandle) {
        if self.timer != Some(handle) {
            debug!("ignoring stale timer {handle:?}");
            return;
        }

        self.timer = None;
        self.engine.tick();
        self.process_events();
        self.sync_timer();
    }

    #[must_use]
    pub fn engine(&self) -> &GameEngine<R> {
        &self.engine
    }

    #[must_use]
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Latest board handed out by the engine.
    #[must_use]
    pub fn frame(&self) -> &RenderSnapshot {
        &self.frame
    }

    /// Score as last reported through a score change.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn notifier(&self) -> &UnlockNotifier<U> {
        &self.notifier
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[must_use]
    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    fn process_events(&mut self) {
        for event in self.engine.drain_events() {
            match event {
                GameEvent::ScoreChanged { score, .. } => self.score = score,
                GameEvent::Frame(frame) => self.frame = frame,
                GameEvent::Ended(outcome) => {
                    self.cancel_timer();
                    self.frame = self.engine.snapshot();
                    self.overlay.show_outcome(outcome);
                    if outcome == Outcome::Won {
                        self.notifier.notify_win();
                    }
                }
            }
        }
    }

    fn sync_timer(&mut self) {
        match self.engine.status() {
            GameStatus::Running => {
                self.overlay.hide();
                if self.timer.is_none() {
                    self.timer = Some(self.scheduler.schedule(self.engine.tick_interval()));
                }
            }
            GameStatus::Idle => self.cancel_timer(),
            GameStatus::Ended { .. } => self.cancel_timer(),
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
        }
    }
}
