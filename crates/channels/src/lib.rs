//! Chat thread implementations for ThreadGPT.
//!
//! Each implementation is a place a relay run can render into:
//! - **Discord** — a Discord thread, via the REST API
//! - **CLI** — the local terminal (stdout)
//!
//! Plus the splitter that keeps replies under the platform's size limit.

pub mod cli;
pub mod discord;
pub mod split;

pub use cli::CliThread;
pub use discord::DiscordThread;
pub use split::{MAX_CHARS_PER_REPLY_MSG, split_into_shorter_messages};
