//! Password entry without echo.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Done,
    Cancelled,
}

fn apply_key(buffer: &mut String, key: KeyEvent) -> KeyOutcome {
    if key.kind != KeyEventKind::Press {
        return KeyOutcome::Continue;
    }

    match key.code {
        KeyCode::Enter => KeyOutcome::Done,
        KeyCode::Esc => KeyOutcome::Cancelled,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyOutcome::Cancelled,
        KeyCode::Char(c) => {
            buffer.push(c);
            KeyOutcome::Continue
        }
        KeyCode::Backspace => {
            buffer.pop();
            KeyOutcome::Continue
        }
        _ => KeyOutcome::Continue,
    }
}

/// Restores cooked mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn read_hidden(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush().context("Failed to write prompt")?;

    let mut buffer = String::new();
    let outcome = {
        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read().context("Failed to read key")? {
                match apply_key(&mut buffer, key) {
                    KeyOutcome::Continue => continue,
                    outcome => break outcome,
                }
            }
        }
    };
    println!();

    if outcome == KeyOutcome::Cancelled {
        bail!("Password entry cancelled");
    }
    Ok(buffer)
}

/// Reads a password from the terminal on a blocking thread.
pub async fn prompt_password(prompt: &str) -> Result<String> {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || read_hidden(&prompt))
        .await
        .context("Password prompt task failed")?
}
