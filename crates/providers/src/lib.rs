//! Completion API provider implementations for ThreadGPT.
//!
//! All providers implement the `threadgpt_core::Provider` trait.

pub mod openai_compat;

pub use openai_compat::{OpenAiCompatProvider, build_from_config};
