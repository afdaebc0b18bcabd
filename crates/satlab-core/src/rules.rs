//! Ordered keyword rule tables.
//!
//! Every heuristic classifier in the crate is a static table of
//! `(condition, result)` pairs over lower-cased answer text. A [`Ruleset`]
//! returns the result of the first matching rule or its mandatory fallback;
//! a [`Checklist`] collects the result of every matching rule in order.
//! Matching is plain case-insensitive substring containment.

use crate::types::{BuildAnswers, Field};

/// Text a cue searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Field(Field),
    /// `topics personality tone special quirks`, space separated.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub source: Source,
    pub needle: &'static str,
}

/// Look in a single answer field.
pub const fn on(field: Field, needle: &'static str) -> Cue {
    Cue {
        source: Source::Field(field),
        needle,
    }
}

/// Look in the concatenation of all descriptive answers.
pub const fn anywhere(needle: &'static str) -> Cue {
    Cue {
        source: Source::All,
        needle,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    Always,
    Any(&'static [Cue]),
    NoneOf(&'static [Cue]),
}

#[derive(Debug, Clone, Copy)]
pub struct Rule<T: 'static> {
    pub when: When,
    pub then: T,
}

/// First-match-wins table with a terminal default.
#[derive(Debug, Clone, Copy)]
pub struct Ruleset<T: 'static> {
    pub rules: &'static [Rule<T>],
    pub fallback: T,
}

impl<T: Copy> Ruleset<T> {
    /// Index of the first matching rule, `None` when the fallback applies.
    pub fn position(&self, hay: &Haystack) -> Option<usize> {
        self.rules.iter().position(|r| hay.matches(&r.when))
    }

    pub fn first(&self, hay: &Haystack) -> T {
        match self.position(hay) {
            Some(i) => self.rules[i].then,
            None => self.fallback,
        }
    }
}

/// Append-per-match table: every matching rule contributes, in order.
#[derive(Debug, Clone, Copy)]
pub struct Checklist<T: 'static> {
    pub rules: &'static [Rule<T>],
}

impl<T: Copy> Checklist<T> {
    pub fn collect(&self, hay: &Haystack) -> Vec<T> {
        self.rules
            .iter()
            .filter(|r| hay.matches(&r.when))
            .map(|r| r.then)
            .collect()
    }
}

/// Lower-cased view of a [`BuildAnswers`] that rules are matched against.
#[derive(Debug, Clone)]
pub struct Haystack {
    fields: [String; 6],
    all: String,
}

impl Haystack {
    pub fn new(answers: &BuildAnswers) -> Self {
        let fields = Field::ALL.map(|f| answers.text(f).to_lowercase());
        let all = [
            Field::Topics,
            Field::Personality,
            Field::Tone,
            Field::Special,
            Field::Quirks,
        ]
        .iter()
        .map(|f| fields[f.index()].as_str())
        .collect::<Vec<_>>()
        .join(" ");
        Self { fields, all }
    }

    pub fn field(&self, field: Field) -> &str {
        &self.fields[field.index()]
    }

    pub fn all(&self) -> &str {
        &self.all
    }

    pub fn contains(&self, cue: &Cue) -> bool {
        let text = match cue.source {
            Source::Field(f) => self.field(f),
            Source::All => self.all(),
        };
        text.contains(cue.needle)
    }

    pub fn matches(&self, when: &When) -> bool {
        match when {
            When::Always => true,
            When::Any(cues) => cues.iter().any(|p| self.contains(p)),
            When::NoneOf(cues) => !cues.iter().any(|p| self.contains(p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COLORS: Ruleset<&str> = Ruleset {
        rules: &[
            Rule {
                when: When::Any(&[on(Field::Tone, "red"), on(Field::Tone, "crimson")]),
                then: "warm",
            },
            Rule {
                when: When::Any(&[on(Field::Tone, "re")]),
                then: "prefix",
            },
        ],
        fallback: "neutral",
    };

    static FLAGS: Checklist<&str> = Checklist {
        rules: &[
            Rule {
                when: When::Always,
                then: "always",
            },
            Rule {
                when: When::NoneOf(&[on(Field::Special, "calm")]),
                then: "not-calm",
            },
            Rule {
                when: When::Any(&[anywhere("loud")]),
                then: "loud",
            },
        ],
    };

    fn hay(tone: &str, special: &str) -> Haystack {
        Haystack::new(
            &BuildAnswers::default()
                .with(Field::Tone, tone)
                .with(Field::Special, special),
        )
    }

    #[test]
    fn first_match_wins_in_table_order() {
        assert_eq!(COLORS.first(&hay("Bright RED", "")), "warm");
        assert_eq!(COLORS.position(&hay("Bright RED", "")), Some(0));
        assert_eq!(COLORS.first(&hay("reserved", "")), "prefix");
        assert_eq!(COLORS.first(&hay("blue", "")), "neutral");
        assert_eq!(COLORS.position(&hay("blue", "")), None);
    }

    #[test]
    fn checklist_appends_every_match() {
        assert_eq!(FLAGS.collect(&hay("", "")), ["always", "not-calm"]);
        assert_eq!(FLAGS.collect(&hay("", "calm but LOUD")), ["always", "loud"]);
    }

    #[test]
    fn all_text_joins_fields_in_router_order() {
        let answers = BuildAnswers::default()
            .with(Field::Name, "Ignored")
            .with(Field::Topics, "Coding")
            .with(Field::Quirks, "Puns");
        let h = Haystack::new(&answers);
        assert_eq!(h.all(), "coding    puns");
        assert_eq!(h.field(Field::Name), "ignored");
    }
}
