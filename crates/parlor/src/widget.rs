//! Chat-widget front end
//!
//! A widget session greets the user when the chat starts. For each message
//! it sends a placeholder, runs the bot, then rewrites that same message with
//! the answer. Where the messages end up is decided by the [`ChatSink`].

use crate::bots::Bot;
use crate::error::Result;
use async_trait::async_trait;
use parlor_agent::RunConfig;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub author: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: author.into(),
            content: content.into(),
        }
    }
}

/// Destination for widget messages
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Show a new message
    async fn send(&self, message: &ChatMessage) -> Result<()>;

    /// Replace the content of a message sent earlier
    async fn update(&self, message: &ChatMessage) -> Result<()>;
}

pub struct ChatWidget {
    bot: Bot,
    config: RunConfig,
}

impl ChatWidget {
    pub fn new(bot: Bot, config: RunConfig) -> Self {
        Self { bot, config }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub async fn on_chat_start(&self, sink: &dyn ChatSink) -> Result<ChatMessage> {
        let greeting = ChatMessage::new(self.author(), self.bot.greeting());
        sink.send(&greeting).await?;
        Ok(greeting)
    }

    pub async fn on_message(&self, sink: &dyn ChatSink, text: &str) -> Result<ChatMessage> {
        let mut reply = ChatMessage::new(self.author(), self.bot.placeholder());
        sink.send(&reply).await?;

        reply.content = self.bot.respond(text, &self.config).await?;
        sink.update(&reply).await?;
        Ok(reply)
    }

    fn author(&self) -> &str {
        &self.bot.agent().name
    }
}

/// Renders widget messages on a terminal
///
/// Updates are printed as a new line marked with `~`, since earlier output
/// cannot be rewritten in place on every terminal.
pub struct TerminalSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_line(&self, marker: &str, message: &ChatMessage) -> Result<()> {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(out, "{marker}[{}] {}", message.author, message.content)?;
        out.flush()?;
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> ChatSink for TerminalSink<W> {
    async fn send(&self, message: &ChatMessage) -> Result<()> {
        self.write_line("", message)
    }

    async fn update(&self, message: &ChatMessage) -> Result<()> {
        self.write_line("~ ", message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatEventKind {
    Send,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    pub kind: ChatEventKind,
    pub message: ChatMessage,
}

/// Keeps every send and update in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ChatEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ChatEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, kind: ChatEventKind, message: &ChatMessage) {
        let event = ChatEvent {
            kind,
            message: message.clone(),
        };
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[async_trait]
impl ChatSink for RecordingSink {
    async fn send(&self, message: &ChatMessage) -> Result<()> {
        self.record(ChatEventKind::Send, message);
        Ok(())
    }

    async fn update(&self, message: &ChatMessage) -> Result<()> {
        self.record(ChatEventKind::Update, message);
        Ok(())
    }
}
