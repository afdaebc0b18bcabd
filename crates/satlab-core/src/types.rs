use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One interview question slot. Declaration order is interview order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Personality,
    Topics,
    Quirks,
    Tone,
    Special,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Personality,
        Field::Topics,
        Field::Quirks,
        Field::Tone,
        Field::Special,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    /// The field asked after this one, or `None` for the last question.
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Personality => "personality",
            Field::Topics => "topics",
            Field::Quirks => "quirks",
            Field::Tone => "tone",
            Field::Special => "special",
        }
    }

    /// Only the personality, topics and tone answers may get a follow-up turn.
    pub fn is_clarifiable(self) -> bool {
        matches!(self, Field::Personality | Field::Topics | Field::Tone)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.key() == s)
            .ok_or_else(|| {
                let known: Vec<_> = Field::ALL.iter().map(|f| f.key()).collect();
                format!("unknown field '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Free-text answers collected by the interview, one per [`Field`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildAnswers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quirks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
}

impl BuildAnswers {
    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Name => &self.name,
            Field::Personality => &self.personality,
            Field::Topics => &self.topics,
            Field::Quirks => &self.quirks,
            Field::Tone => &self.tone,
            Field::Special => &self.special,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Personality => &mut self.personality,
            Field::Topics => &mut self.topics,
            Field::Quirks => &mut self.quirks,
            Field::Tone => &mut self.tone,
            Field::Special => &mut self.special,
        }
    }

    /// The answer for `field`; blank answers count as missing.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field)
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// The answer for `field`, or `""` when missing.
    pub fn text(&self, field: Field) -> &str {
        self.get(field).unwrap_or("")
    }

    /// The answer for `field`, or `default` when missing.
    pub fn or<'a>(&'a self, field: Field, default: &'a str) -> &'a str {
        self.get(field).unwrap_or(default)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn is_complete(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_some())
    }

    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }
}

/// Upstream model identifiers the router can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    #[serde(rename = "deepseek/deepseek-r1")]
    DeepseekR1,
    #[serde(rename = "google/gemini-2.0-flash-thinking-exp:free")]
    GeminiFlashThinking,
    #[serde(rename = "qwen/qwen-2.5-72b-instruct")]
    Qwen72bInstruct,
    #[serde(rename = "meta-llama/llama-3.3-70b-instruct")]
    Llama70bInstruct,
}

impl ModelId {
    pub const ALL: [ModelId; 4] = [
        ModelId::DeepseekR1,
        ModelId::GeminiFlashThinking,
        ModelId::Qwen72bInstruct,
        ModelId::Llama70bInstruct,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::DeepseekR1 => "deepseek/deepseek-r1",
            ModelId::GeminiFlashThinking => "google/gemini-2.0-flash-thinking-exp:free",
            ModelId::Qwen72bInstruct => "qwen/qwen-2.5-72b-instruct",
            ModelId::Llama70bInstruct => "meta-llama/llama-3.3-70b-instruct",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ModelId::DeepseekR1 => "Deep reasoning model for coding and complex tasks",
            ModelId::GeminiFlashThinking => "Creative and strategic thinking model",
            ModelId::Qwen72bInstruct => "Expressive dialogue and multilingual model",
            ModelId::Llama70bInstruct => "Fast lightweight reasoning model",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown model '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_order_matches_interview() {
        let keys: Vec<_> = Field::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(
            keys,
            ["name", "personality", "topics", "quirks", "tone", "special"]
        );
        assert_eq!(Field::from_index(4), Some(Field::Tone));
        assert_eq!(Field::from_index(6), None);
        assert_eq!(Field::Special.next(), None);
        assert_eq!(Field::Name.next(), Some(Field::Personality));
    }

    #[test]
    fn clarifiable_fields() {
        let clarifiable: Vec<_> = Field::ALL
            .iter()
            .filter(|f| f.is_clarifiable())
            .map(|f| f.index())
            .collect();
        assert_eq!(clarifiable, [1, 2, 4]);
    }

    #[test]
    fn blank_answers_count_as_missing() {
        let answers = BuildAnswers::default()
            .with(Field::Name, "Nova")
            .with(Field::Tone, "   ");
        assert_eq!(answers.get(Field::Name), Some("Nova"));
        assert_eq!(answers.get(Field::Tone), None);
        assert_eq!(answers.or(Field::Tone, "casual"), "casual");
        assert_eq!(answers.missing().len(), 5);
        assert!(!answers.is_complete());
    }

    #[test]
    fn answers_reject_unknown_keys() {
        let err = serde_json::from_str::<BuildAnswers>(r#"{"name":"a","mood":"b"}"#);
        assert!(err.is_err());
        let ok: BuildAnswers = serde_json::from_str(r#"{"name":"a"}"#).unwrap();
        assert_eq!(ok.get(Field::Name), Some("a"));
    }

    #[test]
    fn model_id_serde_uses_upstream_string() {
        let json = serde_json::to_string(&ModelId::Qwen72bInstruct).unwrap();
        assert_eq!(json, "\"qwen/qwen-2.5-72b-instruct\"");
        let parsed: ModelId = "meta-llama/llama-3.3-70b-instruct".parse().unwrap();
        assert_eq!(parsed, ModelId::Llama70bInstruct);
        assert!("openai/gpt-4".parse::<ModelId>().is_err());
    }
}
