//! Timer service - owns the published card and its countdown
//!
//! At most one card is published at a time. Voice invocations parse the
//! utterance; a zero duration means no timer was requested and nothing is
//! published. Commands arrive on a channel, and the receive timeout doubles
//! as the render tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::card::Card;
use crate::parser::{self, UnitTable};
use crate::timer::Countdown;

#[derive(Debug, Clone, Copy)]
pub enum MenuAction {
    /// Toggle pause/resume
    Pause,
    /// Back to the full duration and keep running
    Reset,
    /// Dismiss the card
    Stop,
}

pub enum ServiceCommand {
    /// Recognizer hypotheses for one spoken command, best first
    Voice(Vec<String>),
    Menu(MenuAction),
    Shutdown,
}

pub struct TimerService {
    table: UnitTable,
    card: Card,
    tick: Duration,
    countdown: Option<Countdown>,
    expired_notified: bool,
    /// One-shot mode: leave the loop once the card is gone
    exit_on_dismiss: bool,
}

impl TimerService {
    pub fn new(table: UnitTable, card: Card, tick_ms: u64) -> Self {
        Self {
            table,
            card,
            tick: Duration::from_millis(tick_ms.max(1)),
            countdown: None,
            expired_notified: false,
            exit_on_dismiss: false,
        }
    }

    pub fn exit_on_dismiss(mut self) -> Self {
        self.exit_on_dismiss = true;
        self
    }

    /// Process commands until shutdown, rendering ticks in between
    pub fn run(mut self, rx: flume::Receiver<ServiceCommand>, running: Arc<AtomicBool>) {
        while running.load(Ordering::SeqCst) {
            match rx.recv_timeout(self.tick) {
                Ok(ServiceCommand::Voice(hypotheses)) => self.on_voice(&hypotheses),
                Ok(ServiceCommand::Menu(action)) => self.on_menu(action),
                Ok(ServiceCommand::Shutdown) => break,
                Err(flume::RecvTimeoutError::Timeout) => self.on_tick(),
                Err(flume::RecvTimeoutError::Disconnected) => break,
            }
            if self.exit_on_dismiss && self.countdown.is_none() {
                break;
            }
        }
        if self.countdown.take().is_some() {
            self.card.unpublish();
        }
    }

    fn on_voice(&mut self, hypotheses: &[String]) {
        let Some(spoken) = hypotheses.iter().find(|h| !h.trim().is_empty()) else {
            return;
        };
        let ms = parser::parse_duration_ms(spoken, &self.table);
        if ms == 0 {
            eprintln!("no timer detected in {:?}", spoken);
            return;
        }

        // A second invocation replaces the running countdown
        let mut countdown = Countdown::new(Duration::from_millis(ms));
        countdown.start();
        self.card.publish(ms);
        self.countdown = Some(countdown);
        self.expired_notified = false;
    }

    fn on_menu(&mut self, action: MenuAction) {
        let Some(countdown) = self.countdown.as_mut() else {
            return;
        };
        match action {
            MenuAction::Pause => {
                if countdown.is_paused() {
                    countdown.resume();
                } else {
                    countdown.pause();
                }
            }
            MenuAction::Reset => {
                countdown.reset();
                countdown.start();
                self.expired_notified = false;
                self.card.publish(countdown.total().as_millis() as u64);
            }
            MenuAction::Stop => {
                self.countdown = None;
                self.card.unpublish();
            }
        }
    }

    fn on_tick(&mut self) {
        let Some(countdown) = self.countdown.as_ref() else {
            return;
        };
        if countdown.is_expired() {
            if !self.expired_notified {
                self.card.expired();
                self.expired_notified = true;
            }
        } else {
            self.card
                .tick(countdown.remaining().as_millis() as u64, countdown.is_paused());
        }
    }
}
