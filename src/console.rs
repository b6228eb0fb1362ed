// src/console.rs

use std::io::{self, BufRead, Write};

use crate::sync::{Confirmer, Notifier};

/// Alerts go to stderr so stdout stays the rendered page.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("⚠️  {message}");
    }
}

/// Asks on the terminal. Anything but an explicit yes declines.
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => is_yes(&line),
            Err(_) => false,
        }
    }
}

/// `--yes` on the command line.
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
