use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::Field;

pub const CONFIG_DIR: &str = ".satlab";
pub const CONFIG_FILE: &str = "config.json";

/// Workspace configuration, read from `.satlab/config.json`.
///
/// Every section falls back to built-in defaults, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub clarify: ClarifyConfig,
    pub chat: ChatConfig,
}

impl LabConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("{}: invalid config JSON", path.display()))
    }

    /// Load `<dir>/.satlab/config.json` if it exists, else defaults.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = Self::default_path(dir);
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading workspace config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn default_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_DIR).join(CONFIG_FILE)
    }
}

/// Upstream chat-completion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 500,
            stream: true,
        }
    }
}

/// A canned follow-up asked when a terse answer contains one of `keywords`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFollowUp {
    pub keywords: Vec<String>,
    pub question: String,
}

impl KeywordFollowUp {
    fn new(keywords: &[&str], question: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            question: question.to_string(),
        }
    }
}

/// Follow-ups for one clarifiable field.
///
/// `generic` may use `{answer}` (the answer as typed) and `{Answer}` (same,
/// first letter capitalized).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldFollowUps {
    pub keywords: Vec<KeywordFollowUp>,
    pub generic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClarifyConfig {
    /// Answers with at most this many words get a follow-up.
    pub terse_word_limit: usize,
    pub personality: FieldFollowUps,
    pub topics: FieldFollowUps,
    pub tone: FieldFollowUps,
}

impl ClarifyConfig {
    /// Follow-up table for `field`; `None` for fields that never clarify.
    pub fn for_field(&self, field: Field) -> Option<&FieldFollowUps> {
        match field {
            Field::Personality => Some(&self.personality),
            Field::Topics => Some(&self.topics),
            Field::Tone => Some(&self.tone),
            Field::Name | Field::Quirks | Field::Special => None,
        }
    }

    /// At most `terse_word_limit` whitespace-separated words.
    pub fn is_terse(&self, answer: &str) -> bool {
        answer.split_whitespace().count() <= self.terse_word_limit
    }
}

impl Default for ClarifyConfig {
    fn default() -> Self {
        Self {
            terse_word_limit: 2,
            personality: FieldFollowUps {
                keywords: vec![
                    KeywordFollowUp::new(
                        &["edgy"],
                        "Edgy how? Like dark humor edgy, dangerous and unpredictable edgy, or just-don't-give-a-damn edgy?",
                    ),
                    KeywordFollowUp::new(
                        &["funny"],
                        "Funny like a comedian, or funny like your sarcastic friend who roasts everyone?",
                    ),
                    KeywordFollowUp::new(
                        &["smart", "intelligent"],
                        "Smart in what way? Like a professor, a street-smart hustler, or a know-it-all?",
                    ),
                ],
                generic: "Just \"{answer}\"? Tell me more - what does that look like in conversation?"
                    .to_string(),
            },
            topics: FieldFollowUps {
                keywords: Vec::new(),
                generic: "{Answer} - nice! Any specific angle? Like beginner-friendly, advanced deep dives, or something else?"
                    .to_string(),
            },
            tone: FieldFollowUps {
                keywords: vec![KeywordFollowUp::new(
                    &["casual"],
                    "Casual like texting-a-friend casual, or more like podcast-host casual?",
                )],
                generic: "{Answer} tone... can you paint me a picture? How should they sound?"
                    .to_string(),
            },
        }
    }
}
