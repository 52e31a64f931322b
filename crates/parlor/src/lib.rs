//! Parlor: small chat bots on hosted models
//!
//! A [`Bot`] is an agent from the catalogue in [`bots`], built from
//! [`parlor_config::Settings`]. Bots can be driven from a console loop
//! ([`console`]), a chat widget ([`widget`]) or the widget's HTTP surface
//! ([`server`]).

pub mod bots;
pub mod console;
pub mod error;
pub mod server;
pub mod widget;

pub use bots::{Bot, BotKind};
pub use console::{run_console, ConsoleOptions};
pub use error::{ParlorError, Result};
pub use widget::{
    ChatEvent, ChatEventKind, ChatMessage, ChatSink, ChatWidget, RecordingSink, TerminalSink,
};
