//! `threadgpt chat` — Interactive or single-message chat through the relay.
//!
//! History lives only for the session. When the relay closes the thread
//! (context exhausted) the history starts over.

use std::sync::Arc;
use threadgpt_channels::CliThread;
use threadgpt_core::message::Message;
use threadgpt_relay::{CompletionOutcome, Relay};

use super::load_config;

pub async fn run(message: Option<String>, summarize: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(summarize)?;
    let provider = Arc::new(threadgpt_providers::build_from_config(&config));
    let relay = Relay::from_config(&config, provider);
    let thread = CliThread::new();

    if let Some(msg) = message {
        // Single message mode
        relay.respond(&thread, &[Message::user(msg)]).await?;
        return Ok(());
    }

    let settings = relay.settings();
    println!();
    println!("  ThreadGPT — Interactive Mode");
    println!();
    println!("  Endpoint:  {}", config.api_url);
    println!("  Model:     {}", settings.model);
    match &settings.summarize {
        Some(s) => println!(
            "  Summary:   {} (keep {}, window {})",
            s.summary_model, s.messages_to_keep, s.messages_to_summarize
        ),
        None => println!("  Summary:   off"),
    }
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut rx = CliThread::read_input();
    let mut history: Vec<Message> = Vec::new();

    while let Some(line) = rx.recv().await {
        history.push(Message::user(line));

        let outcome = relay.generate(&history).await;
        if let CompletionOutcome::Ok { reply_text } = &outcome {
            if !reply_text.is_empty() {
                history.push(Message::assistant(reply_text.clone()));
            }
        }
        relay.render(&thread, outcome).await?;

        if thread.take_closed() {
            history.clear();
        }
        println!();
    }

    println!("  Goodbye! 👋");
    println!();

    Ok(())
}
