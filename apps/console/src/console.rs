use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::debug;

use shared_models::ui::BusyIndicator;
use video_conferencing_cell::{EndPrompt, MeetingNotice, MeetingUi};

/// Line-oriented stdin shared by prompts and the command loop.
pub struct ConsoleInput {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleInput {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        })
    }

    /// Returns `None` once stdin is closed.
    pub async fn prompt(&self, question: &str) -> Option<String> {
        print!("{}", question);
        let _ = std::io::stdout().flush();

        match self.lines.lock().await.next_line().await {
            Ok(line) => line,
            Err(e) => {
                debug!("Failed to read stdin: {}", e);
                None
            }
        }
    }

    pub async fn confirm(&self, question: &str) -> bool {
        self.prompt(&format!("{} [y/N] ", question))
            .await
            .map(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }
}

/// Prompts and notices of the meeting screen, rendered on the terminal.
pub struct ConsoleUi {
    input: Arc<ConsoleInput>,
}

impl ConsoleUi {
    pub fn new(input: Arc<ConsoleInput>) -> Arc<Self> {
        Arc::new(Self { input })
    }
}

#[async_trait]
impl MeetingUi for ConsoleUi {
    async fn confirm_start(&self, check_error: Option<&str>) -> bool {
        if let Some(err) = check_error {
            println!("Could not check the appointment status: {}", err);
        }
        self.input.confirm("Start the appointment now?").await
    }

    async fn confirm_end(&self, check_error: Option<&str>) -> EndPrompt {
        if let Some(err) = check_error {
            println!("Could not check the appointment status: {}", err);
        }
        if !self.input.confirm("End the appointment?").await {
            return EndPrompt::Cancelled;
        }

        let note = self.input.prompt("Consultation note: ").await.unwrap_or_default();
        EndPrompt::Confirmed { note: note.trim().to_string() }
    }

    fn notify(&self, notice: MeetingNotice) {
        eprintln!("! {}", notice.message());
    }
}

impl BusyIndicator for ConsoleUi {
    fn set_busy(&self, busy: bool) {
        if busy {
            eprintln!("...");
        }
    }
}
