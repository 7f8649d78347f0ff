//! Interactive console
//!
//! The runner talks to the operator only through [`Console`]. The stdin
//! handle is opened once per run and released by [`Console::close`].

use crate::{Error, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

#[async_trait]
pub trait Console: Send + Sync {
    /// Print one line
    async fn say(&self, line: &str) -> Result<()>;

    /// Print `question` and read one answer line, trimmed
    async fn prompt(&self, question: &str) -> Result<String>;

    /// Release the input handle. Safe to call more than once.
    async fn close(&self);
}

/// Console on the process stdin and stdout
pub struct StdConsole {
    input: Mutex<Option<Lines<BufReader<Stdin>>>>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            input: Mutex::new(Some(BufReader::new(tokio::io::stdin()).lines())),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for StdConsole {
    async fn say(&self, line: &str) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(line.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        Ok(())
    }

    async fn prompt(&self, question: &str) -> Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(question.as_bytes()).await?;
        stdout.flush().await?;

        let mut input = self.input.lock().await;
        let lines = input
            .as_mut()
            .ok_or_else(|| Error::Console("input already closed".to_string()))?;

        match lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(Error::Console("unexpected end of input".to_string())),
        }
    }

    async fn close(&self) {
        if self.input.lock().await.take().is_some() {
            tracing::debug!("Console input closed");
        }
    }
}
