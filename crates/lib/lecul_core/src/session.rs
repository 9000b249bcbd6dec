//! Client-side chat session — message list, input buffer, loading flag, and
//! selected persona.
//!
//! The session lives only in memory. Front ends feed it input and drive
//! [`ChatSession::send`] through a [`ChatTransport`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::chat::ChatResponse;
use crate::persona::{Persona, PersonaConfig};
use crate::uuid::uuidv7;

/// Error type returned by transports.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Delivers one message to the chat endpoint.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, message: &str, mode: Persona) -> Result<ChatResponse, TransportError>;
}

/// One entry in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, true)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, false)
    }

    fn new(content: impl Into<String>, is_user: bool) -> Self {
        Self {
            id: uuidv7(),
            content: content.into(),
            is_user,
            timestamp: Utc::now(),
        }
    }
}

/// Result of [`ChatSession::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input or a request already in flight. Nothing happened.
    Rejected,
    /// The reply was appended.
    Replied,
    /// The transport failed; only the user message was appended.
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    input: String,
    loading: bool,
    persona: Persona,
}

impl ChatSession {
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    /// Branding and copy for the active persona.
    pub fn branding(&self) -> &'static PersonaConfig {
        self.persona.config()
    }

    /// Whether the send control is enabled.
    pub fn can_send(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    /// Submit the input buffer.
    ///
    /// The buffer is sent as typed; only the blank check trims it.
    pub async fn send<T: ChatTransport + ?Sized>(&mut self, transport: &T) -> SendOutcome {
        if !self.can_send() {
            return SendOutcome::Rejected;
        }

        let text = std::mem::take(&mut self.input);
        self.messages.push(Message::user(text.clone()));
        self.loading = true;

        let outcome = match transport.send(&text, self.persona).await {
            Ok(reply) => {
                self.messages.push(Message::assistant(reply.response));
                SendOutcome::Replied
            }
            Err(e) => {
                log::error!("Error: {e}");
                SendOutcome::Failed
            }
        };

        self.loading = false;
        outcome
    }

    /// Clear the conversation, keeping the persona.
    pub fn new_chat(&mut self) {
        self.messages.clear();
        self.input.clear();
    }

    /// Switch persona. Resets the conversation when it actually changes.
    ///
    /// Returns `true` if the persona changed.
    pub fn set_persona(&mut self, persona: Persona) -> bool {
        if persona == self.persona {
            return false;
        }
        self.persona = persona;
        self.new_chat();
        true
    }

    /// Switch to the other persona.
    pub fn toggle_persona(&mut self) -> Persona {
        self.set_persona(self.persona.toggled());
        self.persona
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    struct RecordingTransport {
        sent: Mutex<Vec<(String, Persona)>>,
        fail: bool,
    }

    impl RecordingTransport {
        fn ok() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn sent(&self) -> Vec<(String, Persona)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatTransport for RecordingTransport {
        async fn send(&self, message: &str, mode: Persona) -> Result<ChatResponse, TransportError> {
            self.sent.lock().unwrap().push((message.to_string(), mode));
            if self.fail {
                return Err("connection refused".into());
            }
            Ok(ChatResponse::now(format!("réponse à {message}")))
        }
    }

    #[tokio::test]
    async fn blank_input_is_rejected_locally() {
        let transport = RecordingTransport::ok();
        let mut session = ChatSession::new(Persona::Primary);

        for input in ["", "   ", "\n\t"] {
            session.set_input(input);
            assert!(!session.can_send());
            assert_eq!(session.send(&transport).await, SendOutcome::Rejected);
        }
        assert!(transport.sent().is_empty());
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn send_appends_user_then_assistant() {
        let transport = RecordingTransport::ok();
        let mut session = ChatSession::new(Persona::Secondary);
        session.set_input(" bonjour ");

        assert_eq!(session.send(&transport).await, SendOutcome::Replied);

        assert_eq!(transport.sent(), vec![(" bonjour ".to_string(), Persona::Secondary)]);
        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user);
        assert_eq!(messages[0].content, " bonjour ");
        assert!(!messages[1].is_user);
        assert_eq!(messages[1].content, "réponse à  bonjour ");
        assert_ne!(messages[0].id, messages[1].id);
        assert!(session.input().is_empty());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn transport_failure_keeps_only_user_message() {
        let transport = RecordingTransport::failing();
        let mut session = ChatSession::new(Persona::Primary);
        session.set_input("bonjour");

        assert_eq!(session.send(&transport).await, SendOutcome::Failed);

        assert_eq!(session.messages().len(), 1);
        assert!(session.messages()[0].is_user);
        assert!(!session.is_loading());
        assert!(session.input().is_empty());
    }

    #[test]
    fn new_chat_keeps_persona() {
        let mut session = ChatSession::new(Persona::Secondary);
        session.messages.push(Message::user("x"));
        session.set_input("draft");

        session.new_chat();

        assert!(session.messages().is_empty());
        assert!(session.input().is_empty());
        assert_eq!(session.persona(), Persona::Secondary);
    }

    #[test]
    fn toggle_resets_and_switches_branding() {
        let mut session = ChatSession::new(Persona::Primary);
        session.messages.push(Message::user("x"));
        session.set_input("draft");
        let before = session.branding().display_name;

        assert_eq!(session.toggle_persona(), Persona::Secondary);

        assert!(session.messages().is_empty());
        assert!(session.input().is_empty());
        assert_ne!(session.branding().display_name, before);
    }

    #[test]
    fn selecting_active_persona_is_noop() {
        let mut session = ChatSession::new(Persona::Primary);
        session.messages.push(Message::user("x"));

        assert!(!session.set_persona(Persona::Primary));
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn sends_use_current_persona_after_toggle() {
        let transport = RecordingTransport::ok();
        let mut session = ChatSession::default();
        assert_eq!(session.persona(), Persona::Primary);

        session.toggle_persona();
        session.set_input("salut");
        session.send(&transport).await;

        assert_eq!(transport.sent(), vec![("salut".to_string(), Persona::Secondary)]);
    }

    #[test]
    fn message_serializes_camel_case() {
        let json = serde_json::to_value(Message::assistant("hi")).expect("serialize");
        assert_eq!(json["isUser"], false);
        assert_eq!(json["content"], "hi");
        assert!(json["id"].is_string());
        assert!(json["timestamp"].is_string());
    }
}
