use std::io::Write;

use crate::util;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Audible cue themes. Success plays a single terminal bell, failure a
/// double one so the two are distinguishable without looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chime {
    Success,
    Failure,
}

/// Sink for everything the downloader wants the user to see or hear.
///
/// Constructed once by the caller and passed into the orchestrator, so
/// frontends and tests decide how notices are rendered.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
    fn progress(&self, downloaded: u64, total: Option<u64>);
}

/// ANSI-colored terminal notifier with optional audible cues.
pub struct TerminalNotifier {
    audible: bool,
}

impl TerminalNotifier {
    pub fn new(audible: bool) -> Self {
        Self { audible }
    }

    fn chime(&self, chime: Chime) {
        if !self.audible {
            return;
        }

        let bells = match chime {
            Chime::Success => "\x07",
            Chime::Failure => "\x07\x07",
        };
        print!("{}", bells);
        let _ = std::io::stdout().lock().flush();
    }
}

impl Notifier for TerminalNotifier {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warning(&self, message: &str) {
        println!("{}{}{}", YELLOW, message, RESET);
    }

    fn success(&self, message: &str) {
        println!("{}{}{}", GREEN, message, RESET);
        self.chime(Chime::Success);
    }

    fn failure(&self, message: &str) {
        println!("{}{}{}", RED, message, RESET);
        self.chime(Chime::Failure);
    }

    fn progress(&self, downloaded: u64, total: Option<u64>) {
        match total {
            Some(total) => print!(
                "\x1b[2K\rDownloaded {} of {}",
                util::format_size(downloaded),
                util::format_size(total)
            ),
            None => print!("\x1b[2K\rDownloaded {}", util::format_size(downloaded)),
        }
        let _ = std::io::stdout().lock().flush();
    }
}
