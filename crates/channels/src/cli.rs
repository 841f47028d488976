//! CLI thread — a terminal stand-in for a chat thread.
//!
//! Replies are written to stdout, notices are shown with a `[notice]` prefix.
//! Used for `threadgpt chat`.

use async_trait::async_trait;
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use threadgpt_core::channel::{OutgoingContent, SentMessage, Thread, ThreadId};
use threadgpt_core::error::ChannelError;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Terminal-backed thread.
pub struct CliThread {
    id: ThreadId,
    out: Mutex<Box<dyn Write + Send>>,
    closed: AtomicBool,
    next_id: AtomicU64,
}

impl CliThread {
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    /// Write to `out` instead of stdout.
    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            id: ThreadId("cli".into()),
            out: Mutex::new(out),
            closed: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
        }
    }

    /// Whether the thread was closed since the last call; resets the flag.
    pub fn take_closed(&self) -> bool {
        self.closed.swap(false, Ordering::SeqCst)
    }

    fn write_lines(&self, prefix: &str, text: &str) -> Result<(), ChannelError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| ChannelError::ConnectionLost("output lock poisoned".into()))?;
        for line in text.lines() {
            writeln!(out, "  {prefix}{line}").map_err(|e| ChannelError::DeliveryFailed {
                channel: "cli".into(),
                reason: e.to_string(),
            })?;
        }
        out.flush()
            .map_err(|e| ChannelError::ConnectionLost(e.to_string()))
    }

    /// Read user lines from stdin until EOF or an exit command.
    pub fn read_input() -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let reader = BufReader::new(io::stdin());
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                // Check for exit commands
                if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit" | ":q") {
                    break;
                }

                if tx.send(line).await.is_err() {
                    break;
                }
            }
        });

        rx
    }
}

impl Default for CliThread {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Thread for CliThread {
    fn id(&self) -> &ThreadId {
        &self.id
    }

    async fn send(&self, content: OutgoingContent) -> Result<SentMessage, ChannelError> {
        match &content {
            OutgoingContent::Text { content } => self.write_lines("Assistant > ", content)?,
            OutgoingContent::Embed { embed } => self.write_lines("[notice] ", &embed.description)?,
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(SentMessage { id: id.to_string() })
    }

    async fn close_thread(&self) -> Result<(), ChannelError> {
        self.write_lines(
            "[notice] ",
            "**Thread closed** - Context limit reached, starting a new conversation",
        )?;
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
