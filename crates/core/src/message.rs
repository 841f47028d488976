//! Message domain types.
//!
//! These are the value objects that flow through the relay:
//! caller collects thread history → `Message`s → rendered `WireMessage`s → completion API.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human participant in the thread
    User,
    /// The bot (or a synthetic summary turn)
    Assistant,
    /// System instructions
    System,
}

impl Role {
    /// The role name as the completion API expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn of conversation history.
///
/// Immutable once built; the only thing you do with it is [`Message::render`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who said it
    pub user: Role,

    /// What was said
    pub text: String,
}

impl Message {
    pub fn new(user: Role, text: impl Into<String>) -> Self {
        Self {
            user,
            text: text.into(),
        }
    }

    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a new assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Create a new system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    /// Convert to the `{role, content}` shape the completion API accepts.
    pub fn render(&self) -> WireMessage {
        WireMessage {
            role: self.user,
            content: self.text.clone(),
        }
    }
}

/// Render a whole history in order.
pub fn render_all(messages: &[Message]) -> Vec<WireMessage> {
    messages.iter().map(Message::render).collect()
}

/// A message in completion-API wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_preserves_role_and_text() {
        for msg in [
            Message::user("  spaced  "),
            Message::assistant("multi\nline"),
            Message::system(""),
        ] {
            let wire = msg.render();
            assert_eq!(wire.role, msg.user);
            assert_eq!(wire.content, msg.text);
        }
    }

    #[test]
    fn wire_message_json_shape() {
        let wire = Message::assistant("Hi!").render();
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "Hi!"}));
    }

    #[test]
    fn render_all_keeps_order() {
        let history = vec![Message::user("a"), Message::assistant("b"), Message::user("c")];
        let wire = render_all(&history);
        let contents: Vec<&str> = wire.iter().map(|w| w.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }

    #[test]
    fn role_display_matches_serde() {
        assert_eq!(Role::System.to_string(), "system");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }
}
