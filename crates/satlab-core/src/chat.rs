use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;
use crate::presets::BUILDER_PROMPT;
use crate::router::ModelSelection;
use crate::synth::PersonaDocument;
use crate::types::ModelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Body of an OpenAI-style chat-completion call.
///
/// Only the shape lives here; sending it is the caller's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        history: &[ChatMessage],
        chat: &ChatConfig,
    ) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system_prompt));
        // A stale system turn in the history would shadow the persona.
        messages.extend(history.iter().filter(|m| m.role != Role::System).cloned());
        Self {
            model: model.into(),
            messages,
            temperature: chat.temperature,
            max_tokens: chat.max_tokens,
            stream: chat.stream,
        }
    }

    /// Request for a finished persona.
    pub fn for_persona(
        selection: &ModelSelection,
        document: &PersonaDocument,
        history: &[ChatMessage],
        chat: &ChatConfig,
    ) -> Self {
        Self::new(selection.id.as_str(), document.text(), history, chat)
    }

    /// Request while the builder is still interviewing the user.
    pub fn builder_mode(history: &[ChatMessage], chat: &ChatConfig) -> Self {
        Self::new(ModelId::DeepseekR1.as_str(), BUILDER_PROMPT, history, chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::route;
    use crate::synth::synthesize;
    use crate::types::{BuildAnswers, Field};

    #[test]
    fn persona_request_puts_document_first() {
        let answers = BuildAnswers::default()
            .with(Field::Name, "Byte")
            .with(Field::Topics, "coding");
        let doc = synthesize(&answers);
        let history = vec![
            ChatMessage::system("old prompt"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hey"),
        ];
        let req = ChatRequest::for_persona(&route(&answers), &doc, &history, &ChatConfig::default());
        assert_eq!(req.model, "deepseek/deepseek-r1");
        assert_eq!(req.messages.len(), 3);
        assert_eq!(req.messages[0].role, Role::System);
        assert!(req.messages[0].content.contains("PERSONA CORE: Byte"));
        assert_eq!(req.messages[1], ChatMessage::user("hi"));
        assert_eq!(req.max_tokens, 500);
    }

    #[test]
    fn request_serializes_openai_shape() {
        let req = ChatRequest::builder_mode(&[ChatMessage::user("hello")], &ChatConfig::default());
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["model"], "deepseek/deepseek-r1");
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["content"], "hello");
        assert_eq!(v["stream"], true);
    }
}
