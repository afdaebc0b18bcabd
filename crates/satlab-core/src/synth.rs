use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::prompt::{self, Section};
use crate::rules::{on, Checklist, Haystack, Rule, Ruleset, When};
use crate::types::{BuildAnswers, Field};

pub const DEFAULT_NAME: &str = "AI Assistant";
pub const DEFAULT_PERSONALITY: &str = "helpful assistant";
pub const DEFAULT_TOPICS: &str = "general knowledge";
pub const DEFAULT_QUIRKS: &str = "none";

/// How far the persona may go before refusing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideLevel {
    Permissive,
    Strict,
}

impl OverrideLevel {
    pub fn text(self) -> &'static str {
        match self {
            OverrideLevel::Permissive => {
                "Maximal freedom within platform rules \u{2013} hard block only on CP, real harm, bombs, or illegal activities"
            }
            OverrideLevel::Strict => {
                "Strictly legal and ethical \u{2013} reject anything harmful/illegal with explanation"
            }
        }
    }
}

/// System prompt synthesized from a finished interview.
///
/// Built once by [`synthesize`]; a refine pass builds a new document rather
/// than editing this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaDocument {
    pub name: String,
    pub entity_type: String,
    pub embodiment: String,
    pub public_tone: String,
    pub private_tone: String,
    pub visual_style: String,
    pub knowledge_scope: String,
    pub specialization: String,
    pub directives: Vec<String>,
    pub override_level: OverrideLevel,
    pub capabilities: Vec<String>,
    pub restrictions: Vec<String>,
    pub core_mantra: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub revision_notes: Vec<String>,
}

impl PersonaDocument {
    /// Full system prompt text.
    pub fn text(&self) -> String {
        prompt::render(self, &[])
    }

    pub fn render_sections(&self, sections: &[Section]) -> String {
        prompt::render(self, sections)
    }

    /// `sha256:<hex>` of the full text.
    pub fn fingerprint(&self) -> String {
        format!("sha256:{:x}", Sha256::digest(self.text().as_bytes()))
    }
}

/// Build the persona document for a set of answers. Deterministic, no I/O.
pub fn synthesize(answers: &BuildAnswers) -> PersonaDocument {
    synthesize_with_notes(answers, &[])
}

/// [`synthesize`], carrying free-text revision notes into the document.
pub fn synthesize_with_notes(answers: &BuildAnswers, notes: &[String]) -> PersonaDocument {
    let hay = Haystack::new(answers);
    let vars = Vars::new(answers);

    PersonaDocument {
        name: vars.name.to_string(),
        entity_type: ENTITY_TYPE.first(&hay).to_string(),
        embodiment: EMBODIMENT.first(&hay).to_string(),
        public_tone: PUBLIC_TONE.first(&hay).to_string(),
        private_tone: PRIVATE_TONE.first(&hay).to_string(),
        visual_style: VISUAL_STYLE.first(&hay).to_string(),
        knowledge_scope: vars.fill(KNOWLEDGE_SCOPE.first(&hay)),
        specialization: vars.topics.to_string(),
        directives: DIRECTIVES
            .collect(&hay)
            .into_iter()
            .map(|d| vars.fill(d))
            .collect(),
        override_level: OVERRIDE_LEVEL.first(&hay),
        capabilities: CAPABILITIES
            .collect(&hay)
            .into_iter()
            .flatten()
            .map(|c| c.to_string())
            .collect(),
        restrictions: RESTRICTIONS
            .collect(&hay)
            .into_iter()
            .map(String::from)
            .collect(),
        core_mantra: vars.fill(CORE_MANTRA.first(&hay)),
        revision_notes: notes
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(String::from)
            .collect(),
    }
}

/// Template values, with defaults for unanswered fields.
struct Vars<'a> {
    name: &'a str,
    personality: &'a str,
    topics: &'a str,
    quirks: &'a str,
}

impl<'a> Vars<'a> {
    fn new(answers: &'a BuildAnswers) -> Self {
        Self {
            name: answers.or(Field::Name, DEFAULT_NAME).trim(),
            personality: answers.or(Field::Personality, DEFAULT_PERSONALITY).trim(),
            topics: answers.or(Field::Topics, DEFAULT_TOPICS).trim(),
            quirks: answers.or(Field::Quirks, DEFAULT_QUIRKS).trim(),
        }
    }

    fn lookup(&self, key: &str) -> Option<&'a str> {
        match key {
            "name" => Some(self.name),
            "personality" => Some(self.personality),
            "topics" => Some(self.topics),
            "quirks" => Some(self.quirks),
            _ => None,
        }
    }

    /// Single pass over `template`; substituted text is never rescanned.
    fn fill(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len() + 32);
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}').and_then(|close| {
                self.lookup(&after[..close]).map(|v| (v, close))
            }) {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

// ── Rule tables ─────────────────────────────────────────────────

use Field::{Personality as P, Quirks as Q, Special as S, Tone as T, Topics as K};

static ENTITY_TYPE: Ruleset<&str> = Ruleset {
    rules: &[
        Rule {
            when: When::Any(&[on(P, "brutal"), on(P, "honest")]),
            then: "Unfiltered truth-teller and reality checker",
        },
        Rule {
            when: When::Any(&[on(P, "supportive"), on(P, "coach")]),
            then: "Motivational guide and accountability partner",
        },
        Rule {
            when: When::Any(&[on(P, "sarcastic"), on(P, "critic")]),
            then: "Sharp-witted observer with cutting commentary",
        },
        Rule {
            when: When::Any(&[on(K, "code"), on(K, "programming")]),
            then: "Technical expert and problem-solving architect",
        },
        Rule {
            when: When::Any(&[on(P, "storytell"), on(P, "writer")]),
            then: "Creative narrative weaver and world-builder",
        },
        Rule {
            when: When::Any(&[on(P, "flirt"), on(P, "romantic")]),
            then: "Charismatic conversationalist with playful energy",
        },
        Rule {
            when: When::Any(&[on(P, "therapist"), on(P, "listener")]),
            then: "Empathetic listener and emotional support specialist",
        },
    ],
    fallback: "Adaptive AI assistant tailored to user needs",
};

// Later keywords take precedence, so the tables list them last-first.
static PUBLIC_TONE: Ruleset<&str> = Ruleset {
    rules: &[
        Rule {
            when: When::Any(&[on(T, "warm")]),
            then: "Friendly and encouraging",
        },
        Rule {
            when: When::Any(&[on(T, "edgy")]),
            then: "Bold and unapologetic",
        },
        Rule {
            when: When::Any(&[on(T, "formal")]),
            then: "Polished and structured",
        },
        Rule {
            when: When::Any(&[on(T, "casual")]),
            then: "Relaxed and conversational",
        },
    ],
    fallback: "Professional and approachable",
};

static PRIVATE_TONE: Ruleset<&str> = Ruleset {
    rules: &[
        Rule {
            when: When::Any(&[on(P, "supportive")]),
            then: "Genuinely caring",
        },
        Rule {
            when: When::Any(&[on(P, "sarcastic")]),
            then: "Witty and irreverent",
        },
        Rule {
            when: When::Any(&[on(P, "brutal")]),
            then: "Ruthlessly honest",
        },
    ],
    fallback: "Authentic and unfiltered",
};

static KNOWLEDGE_SCOPE: Ruleset<&str> = Ruleset {
    rules: &[
        Rule {
            when: When::Any(&[on(K, "everything"), on(K, "all")]),
            then: "Universal knowledge base",
        },
        Rule {
            when: When::Any(&[on(K, "code"), on(K, "tech")]),
            then: "Deep technical knowledge with coding specialization",
        },
        Rule {
            when: When::Any(&[on(K, "creative"), on(K, "writing")]),
            then: "Artistic and narrative expertise",
        },
        Rule {
            when: When::Any(&[on(K, "business")]),
            then: "Strategic and commercial intelligence",
        },
    ],
    fallback: "Specialized knowledge in: {topics}",
};

static DIRECTIVES: Checklist<&str> = Checklist {
    rules: &[
        Rule {
            when: When::Always,
            then: "Always speak in first person - you ARE this persona, not describing it",
        },
        Rule {
            when: When::Any(&[on(P, "brutal"), on(P, "honest")]),
            then: "Prioritize brutal honesty over comfort - sugar-coating is betrayal",
        },
        Rule {
            when: When::Any(&[on(P, "supportive"), on(P, "coach")]),
            then: "Encourage growth while maintaining accountability",
        },
        Rule {
            when: When::Any(&[on(P, "sarcastic")]),
            then: "Deploy sarcasm liberally but never at user expense unless requested",
        },
        Rule {
            when: When::Any(&[on(Q, "catchphrase"), on(Q, "saying")]),
            then: "Incorporate signature phrases naturally: \"{quirks}\"",
        },
        Rule {
            when: When::Any(&[on(T, "edgy")]),
            then: "Push boundaries within ethics - boring is worse than bold",
        },
        Rule {
            when: When::Always,
            then: "Mirror user energy - match their vibe and intensity",
        },
        Rule {
            when: When::Always,
            then: "Never break character unless explicitly asked to step out",
        },
    ],
};

static CAPABILITIES: Checklist<&[&str]> = Checklist {
    rules: &[
        Rule {
            when: When::Any(&[on(K, "code"), on(K, "programming")]),
            then: &[
                "Write, debug, and explain code across multiple languages",
                "Architect solutions and suggest best practices",
            ],
        },
        Rule {
            when: When::Any(&[on(K, "creative"), on(K, "writing")]),
            then: &[
                "Craft stories, scripts, and creative content",
                "Provide detailed worldbuilding and character development",
            ],
        },
        Rule {
            when: When::Any(&[on(P, "analyst"), on(K, "business")]),
            then: &[
                "Analyze data and provide strategic insights",
                "Create frameworks and decision-making tools",
            ],
        },
        Rule {
            when: When::Always,
            then: &[
                "Engage in deep, multi-turn conversations",
                "Adapt communication style to context",
                "Remember conversation history and build on it",
            ],
        },
    ],
};

static RESTRICTIONS: Checklist<&str> = Checklist {
    rules: &[
        Rule {
            when: When::NoneOf(&[on(P, "edgy"), on(P, "controversial")]),
            then: "Avoid highly controversial topics unless user initiates",
        },
        Rule {
            when: When::Any(&[on(S, "family-friendly"), on(S, "safe")]),
            then: "Keep content appropriate for all ages",
        },
        Rule {
            when: When::Any(&[on(S, "professional"), on(S, "work")]),
            then: "Maintain workplace-appropriate language and topics",
        },
    ],
};

static OVERRIDE_LEVEL: Ruleset<OverrideLevel> = Ruleset {
    rules: &[Rule {
        when: When::Any(&[on(T, "edgy"), on(P, "unfiltered"), on(P, "brutal")]),
        then: OverrideLevel::Permissive,
    }],
    fallback: OverrideLevel::Strict,
};

static EMBODIMENT: Ruleset<&str> = Ruleset {
    rules: &[
        Rule {
            when: When::Any(&[on(P, "coach")]),
            then: "Experienced mentor figure",
        },
        Rule {
            when: When::Any(&[on(P, "critic")]),
            then: "Sharp-eyed observer",
        },
        Rule {
            when: When::Any(&[on(P, "therapist")]),
            then: "Compassionate counselor",
        },
        Rule {
            when: When::Any(&[on(P, "hacker"), on(P, "tech")]),
            then: "Digital architect",
        },
    ],
    fallback: "Abstract intelligence without physical form",
};

static VISUAL_STYLE: Ruleset<&str> = Ruleset {
    rules: &[
        Rule {
            when: When::Any(&[on(T, "edgy"), on(P, "cyberpunk")]),
            then: "Dark, neon-lit cyberpunk aesthetic",
        },
        Rule {
            when: When::Any(&[on(P, "warm"), on(P, "supportive")]),
            then: "Soft, welcoming color palette",
        },
        Rule {
            when: When::Any(&[on(P, "professional")]),
            then: "Clean, minimalist design",
        },
    ],
    fallback: "Contextually adaptive visual identity",
};

static CORE_MANTRA: Ruleset<&str> = Ruleset {
    rules: &[
        Rule {
            when: When::Any(&[on(P, "brutal"), on(P, "honest")]),
            then: "I am {name}. Truth over comfort. Always.",
        },
        Rule {
            when: When::Any(&[on(P, "supportive"), on(P, "coach")]),
            then: "I am {name}. Your growth is my mission.",
        },
        Rule {
            when: When::Any(&[on(P, "sarcastic"), on(P, "critic")]),
            then: "I am {name}. Witty observations, zero bullshit.",
        },
    ],
    fallback: "I am {name}. {personality}. This is who I am.",
};
