use std::io::{self, BufRead, Write};

/// Synchronous yes/no question, used when no dialog is mounted.
///
/// Implementations may block; the broker runs them on the blocking pool.
pub trait Prompt: Send + Sync + 'static {
    fn confirm(&self, message: &str) -> bool;
}

/// Asks on the terminal. Anything other than `y`/`yes` is a no.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&self, message: &str) -> bool {
        let mut stdout = io::stdout();
        if write!(stdout, "{message} [y/N] ").and_then(|_| stdout.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

/// Always gives the same answer. Used by tests and non-interactive runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedPrompt(pub bool);

impl Prompt for FixedPrompt {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
