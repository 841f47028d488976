//! # ThreadGPT Core
//!
//! Domain types, traits, and error definitions for ThreadGPT.
//! This crate has **no I/O of its own** — it defines the domain model that
//! the provider, channel, and relay crates implement against.
//!
//! ## Design Philosophy
//!
//! The two outside collaborators of the relay pipeline are traits here:
//! - [`Provider`] — the chat-completion API
//! - [`Thread`] — the chat thread replies are rendered into
//!
//! Implementations live in `threadgpt-providers` and `threadgpt-channels`,
//! which keeps the pipeline testable with scripted stand-ins.

pub mod channel;
pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use channel::{Embed, EmbedColor, OutgoingContent, SentMessage, Thread, ThreadId};
pub use error::{ChannelError, Error, ProviderError, Result};
pub use message::{Message, Role, WireMessage, render_all};
pub use provider::{ChatCompletion, Provider};
