//! Chat application module for interactive conversations.
//!
//! This module provides a REPL chat interface built on top of the colloquy
//! client library. It supports:
//!
//! - Multi-turn conversations with persistent in-memory history
//! - Slash commands for session control
//! - Configurable model, system prompt, and temperature
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Core session state machine and provider interaction
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::{ChatSession, DEFAULT_SYSTEM_PROMPT, SessionState, SessionStats};
