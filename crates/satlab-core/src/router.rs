use serde::{Deserialize, Serialize};

use crate::rules::{anywhere, on, Haystack, Rule, Ruleset, When};
use crate::types::{BuildAnswers, Field, ModelId};

const FALLBACK_DESCRIPTION: &str = "General purpose AI model";

/// Why a model was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCategory {
    Coding,
    CreativeWriting,
    ExpressiveDialogue,
    Multilingual,
    Analytical,
    Lightweight,
    Default,
}

/// Model chosen for a persona, recomputed whenever the answers change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub id: ModelId,
    pub category: RouteCategory,
    pub description: String,
}

use Field::{Personality as P, Tone as T, Topics as K};

static ROUTES: Ruleset<(RouteCategory, ModelId)> = Ruleset {
    rules: &[
        Rule {
            when: When::Any(&[
                on(K, "coding"),
                on(K, "programming"),
                on(K, "tech"),
                on(K, "developer"),
                on(K, "software"),
                anywhere("code"),
                anywhere("debug"),
                anywhere("api"),
            ]),
            then: (RouteCategory::Coding, ModelId::DeepseekR1),
        },
        Rule {
            when: When::Any(&[
                on(P, "storyteller"),
                on(P, "writer"),
                on(P, "roleplay"),
                on(P, "character"),
                on(K, "creative writing"),
                on(K, "fiction"),
                on(K, "story"),
                on(K, "novel"),
                on(K, "script"),
                anywhere("narrative"),
                anywhere("immersive"),
            ]),
            then: (RouteCategory::CreativeWriting, ModelId::GeminiFlashThinking),
        },
        Rule {
            when: When::Any(&[
                on(P, "flirty"),
                on(P, "expressive"),
                on(P, "emotional"),
                on(P, "dramatic"),
                on(K, "relationship"),
                on(K, "conversation"),
                anywhere("empathy"),
                anywhere("feelings"),
            ]),
            then: (RouteCategory::ExpressiveDialogue, ModelId::Qwen72bInstruct),
        },
        Rule {
            when: When::Any(&[
                on(K, "translation"),
                on(K, "multilingual"),
                on(K, "language"),
                anywhere("spanish"),
                anywhere("french"),
                anywhere("chinese"),
                anywhere("japanese"),
                anywhere("german"),
            ]),
            then: (RouteCategory::Multilingual, ModelId::Qwen72bInstruct),
        },
        Rule {
            when: When::Any(&[
                on(K, "analysis"),
                on(K, "strategy"),
                on(K, "business"),
                on(K, "consulting"),
                anywhere("enterprise"),
                anywhere("long context"),
                anywhere("comprehensive"),
            ]),
            then: (RouteCategory::Analytical, ModelId::GeminiFlashThinking),
        },
        Rule {
            when: When::Any(&[
                on(T, "quick"),
                on(T, "fast"),
                on(T, "brief"),
                anywhere("simple answers"),
                anywhere("concise"),
            ]),
            then: (RouteCategory::Lightweight, ModelId::Llama70bInstruct),
        },
    ],
    fallback: (RouteCategory::Default, ModelId::DeepseekR1),
};

/// Pick the upstream model for a persona. Total: every answer set maps to a model.
pub fn select_model(answers: &BuildAnswers) -> ModelId {
    route(answers).id
}

/// Like [`select_model`], also reporting which category matched.
pub fn route(answers: &BuildAnswers) -> ModelSelection {
    let hay = Haystack::new(answers);
    let (category, id) = ROUTES.first(&hay);
    tracing::debug!(?category, model = %id, "routed persona");
    ModelSelection {
        id,
        category,
        description: id.description().to_string(),
    }
}

/// Human-readable description of an upstream model identifier.
pub fn describe_model(id: &str) -> &'static str {
    id.parse::<ModelId>()
        .map(ModelId::description)
        .unwrap_or(FALLBACK_DESCRIPTION)
}
