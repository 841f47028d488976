//! # ThreadGPT Relay
//!
//! The completion-response pipeline:
//!
//! 1. **PromptBuilder** ([`prompt`]) — window the history and, when enabled,
//!    summarize older turns into one assistant message.
//! 2. **CompletionInvoker** ([`invoker`]) — call the completion API and classify
//!    the result into a [`CompletionOutcome`].
//! 3. **ResponseRenderer** ([`renderer`]) — send the reply, close the thread,
//!    or post a warning notice.
//!
//! [`Relay`] wires the three together.

pub mod invoker;
pub mod outcome;
pub mod pipeline;
pub mod prompt;
pub mod renderer;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use invoker::{CONTEXT_LENGTH_MARKER, CompletionInvoker, classify};
pub use outcome::CompletionOutcome;
pub use pipeline::{Relay, RelaySettings};
pub use prompt::{PromptBuilder, PromptPlan, SUMMARY_INSTRUCTION, SummarizeSettings, plan_prompt};
pub use renderer::ResponseRenderer;
