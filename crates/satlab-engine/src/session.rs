use serde::Serialize;

use satlab_core::chat::{ChatMessage, ChatRequest};
use satlab_core::config::{ChatConfig, ClarifyConfig};
use satlab_core::errors::InterviewError;
use satlab_core::router::{route, ModelSelection};
use satlab_core::saved::{self, SavedPersona};
use satlab_core::synth::{synthesize_with_notes, PersonaDocument};
use satlab_core::types::{BuildAnswers, Field};

use crate::interview::questions;
use crate::interview::{Interview, Step};

/// A finished interview: the answers with the document and model derived
/// from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltPersona {
    pub answers: BuildAnswers,
    pub document: PersonaDocument,
    pub selection: ModelSelection,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl BuiltPersona {
    pub fn new(answers: BuildAnswers) -> Self {
        Self::with_notes(answers, Vec::new())
    }

    fn with_notes(answers: BuildAnswers, notes: Vec<String>) -> Self {
        Self {
            document: synthesize_with_notes(&answers, &notes),
            selection: route(&answers),
            answers,
            notes,
        }
    }

    /// A new persona from the same answers plus one more revision note.
    /// `self` is left as it was.
    pub fn refine(&self, note: impl Into<String>) -> Self {
        let mut notes = self.notes.clone();
        notes.push(note.into());
        Self::with_notes(self.answers.clone(), notes)
    }

    pub fn acknowledgment(&self) -> String {
        questions::completion(self.answers.get(Field::Name))
    }

    pub fn greeting(&self) -> String {
        saved::greeting(&self.answers)
    }

    pub fn to_saved(&self) -> SavedPersona {
        SavedPersona::new(self.answers.clone(), self.notes.clone())
    }

    pub fn chat_request(&self, history: &[ChatMessage], chat: &ChatConfig) -> ChatRequest {
        ChatRequest::for_persona(&self.selection, &self.document, history, chat)
    }
}

/// An interview plus the conversation shown to the user.
#[derive(Debug, Clone, Default)]
pub struct BuildSession {
    interview: Interview,
    transcript: Vec<ChatMessage>,
    built: Option<BuiltPersona>,
}

impl BuildSession {
    pub fn new(clarify: ClarifyConfig) -> Self {
        Self {
            interview: Interview::new(clarify),
            transcript: Vec::new(),
            built: None,
        }
    }

    /// Start or restart; the transcript begins again with the opening message.
    pub fn start(&mut self) -> String {
        let opening = self.interview.start();
        self.transcript = vec![ChatMessage::assistant(opening.clone())];
        self.built = None;
        opening
    }

    /// Record the user's message and the builder's reply.
    ///
    /// Rejected submissions leave the transcript untouched.
    pub fn submit(&mut self, raw: &str) -> Result<Step, InterviewError> {
        let step = self.interview.submit(raw)?;
        self.transcript.push(ChatMessage::user(raw));
        self.transcript.push(ChatMessage::assistant(step.message()));
        if let Step::Complete(built) = &step {
            self.built = Some(built.as_ref().clone());
        }
        Ok(step)
    }

    /// Rebuild the finished persona with another revision note.
    pub fn refine(&mut self, note: &str) -> Result<&BuiltPersona, InterviewError> {
        let current = match &self.built {
            Some(built) => built,
            None => {
                return Err(match self.interview.awaiting() {
                    Some(field) => InterviewError::Incomplete(field),
                    None => InterviewError::NotStarted,
                })
            }
        };
        let refined = current.refine(note);
        tracing::debug!(notes = refined.notes.len(), "persona refined");
        self.transcript.push(ChatMessage::user(note));
        Ok(self.built.insert(refined))
    }

    pub fn interview(&self) -> &Interview {
        &self.interview
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn persona(&self) -> Option<&BuiltPersona> {
        self.built.as_ref()
    }

    /// Request body for talking to the builder itself over the transcript.
    pub fn builder_request(&self, chat: &ChatConfig) -> ChatRequest {
        ChatRequest::builder_mode(&self.transcript, chat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satlab_core::chat::Role;
    use satlab_core::synth::OverrideLevel;
    use satlab_core::types::ModelId;

    fn nova() -> BuildAnswers {
        BuildAnswers::default()
            .with(Field::Name, "Nova")
            .with(Field::Personality, "brutally honest coach")
            .with(Field::Topics, "fitness")
            .with(Field::Quirks, "none")
            .with(Field::Tone, "edgy")
            .with(Field::Special, "none")
    }

    #[test]
    fn built_persona_derives_document_and_model() {
        let built = BuiltPersona::new(nova());
        assert_eq!(built.document.override_level, OverrideLevel::Permissive);
        assert!(built.document.core_mantra.contains("Nova"));
        assert_eq!(built.selection.id, ModelId::DeepseekR1);
        assert_eq!(built.greeting(), "Hey! I'm Nova. brutally honest coach");
    }

    #[test]
    fn refine_leaves_original_untouched() {
        let first = BuiltPersona::new(nova());
        let second = first.refine("mention protein more");
        let third = second.refine("shorter replies");
        assert!(first.notes.is_empty());
        assert!(!first.document.text().contains("REVISION NOTES"));
        assert_eq!(third.notes, ["mention protein more", "shorter replies"]);
        assert!(third.document.text().contains("shorter replies"));
        assert_eq!(third.answers, first.answers);
        assert_ne!(third.to_saved().fingerprint, first.to_saved().fingerprint);
    }

    #[test]
    fn session_keeps_transcript() {
        let mut s = BuildSession::default();
        s.start();
        s.submit("Nova").unwrap();
        s.submit("edgy").unwrap();
        let t = s.transcript();
        assert_eq!(t.len(), 5);
        assert_eq!(t[0].role, Role::Assistant);
        assert_eq!(t[3], ChatMessage::user("edgy"));
        assert!(t[4].content.starts_with("Edgy how?"));

        let req = s.builder_request(&ChatConfig::default());
        assert_eq!(req.messages.len(), 6);
        assert_eq!(req.messages[0].role, Role::System);
    }

    #[test]
    fn rejected_submit_does_not_touch_transcript() {
        let mut s = BuildSession::default();
        assert_eq!(s.submit("hi"), Err(InterviewError::NotStarted));
        assert!(s.transcript().is_empty());
    }

    #[test]
    fn refine_requires_a_finished_persona() {
        let mut s = BuildSession::default();
        assert_eq!(s.refine("x").unwrap_err(), InterviewError::NotStarted);
        s.start();
        s.submit("Nova").unwrap();
        assert_eq!(
            s.refine("x").unwrap_err(),
            InterviewError::Incomplete(Field::Personality)
        );

        for answer in [
            "brutally honest coach",
            "fitness for everyone",
            "none",
            "edgy and very loud",
            "none",
        ] {
            s.submit(answer).unwrap();
        }
        let acked = s.transcript().last().unwrap().content.clone();
        assert_eq!(acked, "Perfect! Nova is ready to go. Start chatting below!");
        let refined = s.refine("swear less").unwrap();
        assert_eq!(refined.notes, ["swear less"]);
        assert_eq!(s.persona().unwrap().notes.len(), 1);
    }
}
