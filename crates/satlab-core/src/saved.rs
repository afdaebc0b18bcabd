use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::router::{route, ModelSelection};
use crate::synth::{synthesize_with_notes, PersonaDocument, DEFAULT_NAME};
use crate::types::{BuildAnswers, Field, ModelId};

/// A finished persona as kept by a [`crate::traits::PersonaStore`].
///
/// The document is not stored; it is re-synthesized from the answers and
/// notes, and `fingerprint` records what it looked like when saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPersona {
    pub id: String,
    pub name: String,
    pub answers: BuildAnswers,
    pub model: ModelId,
    pub fingerprint: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub revision_notes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl SavedPersona {
    pub fn new(answers: BuildAnswers, revision_notes: Vec<String>) -> Self {
        let document = synthesize_with_notes(&answers, &revision_notes);
        let fingerprint = document.fingerprint();
        let hex = fingerprint.trim_start_matches("sha256:");
        let id = format!("{}-{}", slugify(&document.name), &hex[..8]);
        Self {
            id,
            name: document.name,
            model: route(&answers).id,
            answers,
            fingerprint,
            revision_notes,
            created_at: Utc::now(),
        }
    }

    pub fn document(&self) -> PersonaDocument {
        synthesize_with_notes(&self.answers, &self.revision_notes)
    }

    pub fn selection(&self) -> ModelSelection {
        route(&self.answers)
    }

    /// False when the synthesizer now renders these answers differently.
    pub fn is_current(&self) -> bool {
        self.document().fingerprint() == self.fingerprint
    }

    /// First in-character line of a new chat.
    pub fn greeting(&self) -> String {
        greeting(&self.answers)
    }
}

pub fn greeting(answers: &BuildAnswers) -> String {
    format!(
        "Hey! I'm {}. {}",
        answers.or(Field::Name, DEFAULT_NAME).trim(),
        answers.or(Field::Personality, "Ready to chat!").trim()
    )
}

/// Longest slug kept in an id; leaves room for `-` and the hash suffix.
pub const MAX_SLUG_LEN: usize = 64;

/// Lower-case, `-`-separated form of a display name, at most
/// [`MAX_SLUG_LEN`] bytes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len().min(MAX_SLUG_LEN));
    for c in name.chars() {
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "persona".to_string()
    } else {
        slug.to_string()
    }
}

/// Keys used as path components by stores: `[a-z0-9_-]`, non-empty, no leading dot.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 128
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
