//! Live card - the published countdown surface
//!
//! The card is a single status line redrawn in place. Rendering runs on
//! its own thread and consumes events from a channel, so the service never
//! blocks on the terminal.

use std::io::Write;
use unicode_width::UnicodeWidthStr;

#[derive(Clone)]
pub enum CardEvent {
    Publish { total_ms: u64 },
    Tick { remaining_ms: u64, paused: bool },
    Expired,
    Unpublish,
}

/// Publisher handle for the card; cloneable, safe to share across threads
#[derive(Clone)]
pub struct Card {
    tx: flume::Sender<CardEvent>,
}

impl Card {
    pub fn new() -> (Self, flume::Receiver<CardEvent>) {
        let (tx, rx) = flume::unbounded();
        (Self { tx }, rx)
    }

    pub fn publish(&self, total_ms: u64) {
        let _ = self.tx.send(CardEvent::Publish { total_ms });
    }

    pub fn tick(&self, remaining_ms: u64, paused: bool) {
        let _ = self.tx.send(CardEvent::Tick { remaining_ms, paused });
    }

    pub fn expired(&self) {
        let _ = self.tx.send(CardEvent::Expired);
    }

    pub fn unpublish(&self) {
        let _ = self.tx.send(CardEvent::Unpublish);
    }
}

/// Remaining milliseconds as a clock string, rounded up to the next whole
/// second: a freshly published 5-minute card reads "05:00", and "00:01"
/// is the last frame before expiry.
pub fn format_remaining(ms: u64) -> String {
    let secs = ms.div_ceil(1000);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

pub struct CardRenderer {
    bell: bool,
    term_width: Option<usize>,
    published: bool,
}

impl CardRenderer {
    pub fn new(bell: bool, term_width: Option<usize>) -> Self {
        Self {
            bell,
            term_width,
            published: false,
        }
    }

    pub fn handle(&mut self, event: CardEvent) {
        match event {
            CardEvent::Publish { total_ms } => {
                self.published = true;
                self.draw(&format!(
                    "\x1b[1m⏱ {}\x1b[0m",
                    format_remaining(total_ms)
                ));
            }
            CardEvent::Tick { remaining_ms, paused } => {
                if !self.published {
                    return;
                }
                if paused {
                    self.draw(&format!(
                        "\x1b[33m⏸ {} paused\x1b[0m",
                        format_remaining(remaining_ms)
                    ));
                } else {
                    self.draw(&format!(
                        "\x1b[1m⏱ {}\x1b[0m",
                        format_remaining(remaining_ms)
                    ));
                }
            }
            CardEvent::Expired => {
                if !self.published {
                    return;
                }
                // Final frame scrolls; the card stays up showing it
                let bell = if self.bell { "\x07" } else { "" };
                print!("\r\x1b[K\x1b[92m⏱ 00:00  time's up\x1b[0m{}\r\n", bell);
            }
            CardEvent::Unpublish => {
                self.published = false;
                print!("\r\x1b[K");
            }
        }
        std::io::stdout().flush().ok();
    }

    fn draw(&self, content: &str) {
        let padding = match self.term_width {
            Some(width) => {
                // Escape sequences carry no width; measure the visible text
                let visible = strip_ansi(content);
                let w = visible.width();
                if width > w { (width - w) / 2 } else { 0 }
            }
            None => 0,
        };
        print!("\r\x1b[K{}{}", " ".repeat(padding), content);
    }
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(1), "00:01");
        assert_eq!(format_remaining(1_000), "00:01");
        assert_eq!(format_remaining(59_999), "01:00");
        assert_eq!(format_remaining(300_000), "05:00");
        assert_eq!(format_remaining(299_001), "05:00");
        assert_eq!(format_remaining(3_600_000), "1:00:00");
        assert_eq!(format_remaining(5_400_000), "1:30:00");
        assert_eq!(format_remaining(36_000_000), "10:00:00");
    }

    #[test]
    fn test_card_handle_forwards_events() {
        let (card, rx) = Card::new();
        card.publish(300_000);
        card.tick(299_000, false);
        card.expired();
        card.unpublish();

        assert!(matches!(rx.recv().unwrap(), CardEvent::Publish { total_ms: 300_000 }));
        assert!(matches!(
            rx.recv().unwrap(),
            CardEvent::Tick { remaining_ms: 299_000, paused: false }
        ));
        assert!(matches!(rx.recv().unwrap(), CardEvent::Expired));
        assert!(matches!(rx.recv().unwrap(), CardEvent::Unpublish));
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[1m⏱ 05:00\x1b[0m"), "⏱ 05:00");
        assert_eq!(strip_ansi("plain"), "plain");
    }
}
