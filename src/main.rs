mod card;
mod config;
mod parser;
mod service;
mod timer;
mod trigger;

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use crossterm::{cursor, execute};

use card::{Card, CardRenderer};
use config::Config;
use service::{MenuAction, ServiceCommand, TimerService};
use trigger::Trigger;

#[derive(Parser)]
#[command(name = "sandglass")]
struct Cli {
    /// Spoken command to run a timer from, e.g. "set a timer for 5 minutes"
    utterance: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the parsed milliseconds for an utterance, without running a timer
    Parse { utterance: String },
    /// Read recognizer lines from stdin and run timers for trigger matches
    Feed,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Some(Command::Parse { utterance }) => {
            println!("{}", parser::parse_duration_ms(&utterance, &config.locale));
            Ok(())
        }
        Some(Command::Feed) => run_feed(config),
        None => match cli.utterance {
            Some(utterance) => run_once(config, utterance),
            None => {
                eprintln!("usage: sandglass \"set a timer for 5 minutes\"");
                eprintln!("       sandglass parse <utterance>");
                eprintln!("       sandglass feed");
                Ok(())
            }
        },
    }
}

/// One-shot mode: the CLI argument is the recognizer result; run the card
/// until it is dismissed.
fn run_once(config: Config, utterance: String) -> Result<()> {
    let (card, card_rx) = Card::new();
    let (cmd_tx, cmd_rx) = flume::unbounded();
    let running = Arc::new(AtomicBool::new(true));

    // The invocation that launched us carries the duration
    let _ = cmd_tx.send(ServiceCommand::Voice(vec![utterance]));

    println!("p pause/resume · r reset · s stop · q quit");
    terminal::enable_raw_mode()?;
    execute!(std::io::stdout(), cursor::Hide)?;

    let term_width = terminal::size().ok().map(|(w, _)| w as usize);
    let mut renderer = CardRenderer::new(config.card.bell, term_width);
    let render_handle = thread::spawn(move || {
        while let Ok(event) = card_rx.recv() {
            renderer.handle(event);
        }
    });

    // Keyboard menu
    let key_running = Arc::clone(&running);
    let key_tx = cmd_tx.clone();
    let key_handle = thread::spawn(move || {
        while key_running.load(Ordering::SeqCst) {
            if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                continue;
            }
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };
            let cmd = match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(ServiceCommand::Shutdown)
                }
                KeyCode::Char('p') | KeyCode::Char(' ') => {
                    Some(ServiceCommand::Menu(MenuAction::Pause))
                }
                KeyCode::Char('r') => Some(ServiceCommand::Menu(MenuAction::Reset)),
                KeyCode::Char('s') => Some(ServiceCommand::Menu(MenuAction::Stop)),
                KeyCode::Char('q') | KeyCode::Esc => Some(ServiceCommand::Shutdown),
                _ => None,
            };
            if let Some(cmd) = cmd {
                if key_tx.send(cmd).is_err() {
                    break;
                }
            }
        }
    });

    let service = TimerService::new(config.locale, card, config.card.tick_ms).exit_on_dismiss();
    service.run(cmd_rx, Arc::clone(&running));

    running.store(false, Ordering::SeqCst);
    drop(cmd_tx);
    let _ = key_handle.join();
    let _ = render_handle.join();

    execute!(std::io::stdout(), cursor::Show)?;
    terminal::disable_raw_mode()?;
    println!();
    Ok(())
}

/// Feed mode: stdin stands in for the recognizer; every line that leads
/// with the trigger phrase becomes a voice invocation.
fn run_feed(config: Config) -> Result<()> {
    let (card, card_rx) = Card::new();
    let (cmd_tx, cmd_rx) = flume::unbounded();
    let running = Arc::new(AtomicBool::new(true));

    let r = Arc::clone(&running);
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))?;

    let term_width = terminal::size().ok().map(|(w, _)| w as usize);
    let mut renderer = CardRenderer::new(config.card.bell, term_width);
    let render_handle = thread::spawn(move || {
        while let Ok(event) = card_rx.recv() {
            renderer.handle(event);
        }
    });

    let trigger = Trigger::new(&config.trigger.phrase, config.trigger.enabled);
    let feed_running = Arc::clone(&running);
    let feed_tx = cmd_tx.clone();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if !feed_running.load(Ordering::SeqCst) {
                break;
            }
            let line = line.trim();
            if line.is_empty() || !trigger.matches(line) {
                continue;
            }
            if feed_tx
                .send(ServiceCommand::Voice(vec![line.to_string()]))
                .is_err()
            {
                break;
            }
        }
    });

    eprintln!(
        "listening on stdin; trigger phrase: {:?}",
        config.trigger.phrase
    );
    let service = TimerService::new(config.locale, card, config.card.tick_ms);
    service.run(cmd_rx, Arc::clone(&running));

    running.store(false, Ordering::SeqCst);
    drop(cmd_tx);
    let _ = render_handle.join();
    println!();
    Ok(())
}
