//! User-facing prompts

use async_trait::async_trait;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

/// Blocking dialogs shown to the user
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask a yes/no question, `true` when the user accepts
    async fn confirm(&self, message: &str) -> bool;

    /// Show a message the user has to acknowledge
    async fn notify(&self, message: &str);
}

/// Prompter backed by the terminal
#[derive(Debug, Clone, Default)]
pub struct ConsolePrompter {
    /// Accept every confirmation without asking
    pub assume_yes: bool,
}

impl ConsolePrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Prompter for ConsolePrompter {
    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            println!("{} {}", message, "yes".green());
            return true;
        }

        let mut stdout = tokio::io::stdout();
        let question = format!("{} {} ", message.bold(), "[y/N]".dimmed());
        if let Err(e) = stdout.write_all(question.as_bytes()).await {
            warn!("Failed to write prompt: {}", e);
            return false;
        }
        if let Err(e) = stdout.flush().await {
            warn!("Failed to flush prompt: {}", e);
        }

        let mut answer = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        match stdin.read_line(&mut answer).await {
            Ok(_) => is_affirmative(&answer),
            Err(e) => {
                warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }

    async fn notify(&self, message: &str) {
        println!("{} {}", "»".cyan().bold(), message);
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
