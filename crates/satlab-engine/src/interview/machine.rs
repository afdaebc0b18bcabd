use satlab_core::config::ClarifyConfig;
use satlab_core::errors::InterviewError;
use satlab_core::types::{BuildAnswers, Field};

use super::{clarify, questions};
use crate::session::BuiltPersona;

/// Where the interview stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Asking(Field),
    /// A follow-up was asked; `pending` is the first, terse answer.
    Clarifying { field: Field, pending: String },
    Complete,
}

/// What to show the user after a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The next question.
    Ask(String),
    /// A follow-up for the question just answered.
    Clarify(String),
    Complete(Box<BuiltPersona>),
}

impl Step {
    /// The system message for this step.
    pub fn message(&self) -> String {
        match self {
            Step::Ask(q) | Step::Clarify(q) => q.clone(),
            Step::Complete(built) => built.acknowledgment(),
        }
    }
}

/// Six fixed questions, each with at most one follow-up round.
#[derive(Debug, Clone)]
pub struct Interview {
    stage: Stage,
    answers: BuildAnswers,
    clarify: ClarifyConfig,
}

impl Default for Interview {
    fn default() -> Self {
        Self::new(ClarifyConfig::default())
    }
}

impl Interview {
    pub fn new(clarify: ClarifyConfig) -> Self {
        Self {
            stage: Stage::Idle,
            answers: BuildAnswers::default(),
            clarify,
        }
    }

    /// Begin (or restart) the interview. Returns the welcome and first question.
    pub fn start(&mut self) -> String {
        self.answers = BuildAnswers::default();
        self.stage = Stage::Asking(Field::Name);
        questions::opening()
    }

    /// Feed one user message.
    ///
    /// Callers filter blank input; any other text is accepted as-is.
    pub fn submit(&mut self, raw: &str) -> Result<Step, InterviewError> {
        match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Idle => Err(InterviewError::NotStarted),
            Stage::Complete => {
                self.stage = Stage::Complete;
                Err(InterviewError::Finished)
            }
            Stage::Clarifying { field, pending } => Ok(self.record(field, format!("{pending} {raw}"))),
            Stage::Asking(field) => match clarify::follow_up(field, raw, &self.clarify) {
                Some(question) => {
                    self.stage = Stage::Clarifying {
                        field,
                        pending: raw.to_string(),
                    };
                    Ok(Step::Clarify(question))
                }
                None => Ok(self.record(field, raw.to_string())),
            },
        }
    }

    fn record(&mut self, field: Field, answer: String) -> Step {
        self.answers.set(field, answer);
        match field.next() {
            Some(next) => {
                self.stage = Stage::Asking(next);
                Step::Ask(questions::question(next).to_string())
            }
            None => {
                self.stage = Stage::Complete;
                let built = BuiltPersona::new(self.answers.clone());
                tracing::debug!(name = %built.document.name, model = %built.selection.id, "interview complete");
                Step::Complete(Box::new(built))
            }
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn answers(&self) -> &BuildAnswers {
        &self.answers
    }

    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Complete
    }

    /// The field the next submission answers, if any.
    pub fn awaiting(&self) -> Option<Field> {
        match &self.stage {
            Stage::Asking(field) | Stage::Clarifying { field, .. } => Some(*field),
            Stage::Idle | Stage::Complete => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> Interview {
        let mut iv = Interview::default();
        iv.start();
        iv
    }

    fn expect_ask(step: Step) -> String {
        match step {
            Step::Ask(q) => q,
            other => panic!("expected Ask, got {other:?}"),
        }
    }

    #[test]
    fn start_greets_and_asks_for_name() {
        let mut iv = Interview::default();
        let opening = iv.start();
        assert!(opening.starts_with("Hey! I'm Simple_AI"));
        assert!(opening.ends_with("What's the name of your AI?"));
        assert_eq!(iv.stage(), &Stage::Asking(Field::Name));
    }

    #[test]
    fn submit_before_start_and_after_finish() {
        let mut iv = Interview::default();
        assert_eq!(iv.submit("Nova"), Err(InterviewError::NotStarted));
        assert_eq!(iv.stage(), &Stage::Idle);

        iv.start();
        for answer in ["Nova", "brutally honest coach", "fitness for busy people", "none", "edgy and loud", "none"] {
            iv.submit(answer).unwrap();
        }
        assert!(iv.is_complete());
        assert_eq!(iv.submit("more"), Err(InterviewError::Finished));
        assert!(iv.is_complete());
    }

    #[test]
    fn six_long_answers_complete_without_follow_ups() {
        let mut iv = started();
        let answers = [
            "Nova",
            "brutally honest coach",
            "fitness and strength training",
            "none",
            "edgy and direct always",
            "none",
        ];
        for (i, a) in answers.iter().enumerate() {
            let step = iv.submit(a).unwrap();
            if i < 5 {
                let next = Field::from_index(i + 1).unwrap();
                assert_eq!(expect_ask(step), questions::question(next));
            } else {
                let Step::Complete(built) = step else {
                    panic!("expected completion");
                };
                assert_eq!(built.answers.get(Field::Name), Some("Nova"));
                assert_eq!(
                    built.acknowledgment(),
                    "Perfect! Nova is ready to go. Start chatting below!"
                );
            }
        }
        assert!(iv.answers().is_complete());
    }

    #[test]
    fn terse_answers_get_exactly_one_follow_up() {
        let mut iv = started();
        iv.submit("Nova").unwrap();

        let Step::Clarify(q) = iv.submit("edgy").unwrap() else {
            panic!("expected follow-up");
        };
        assert!(q.contains("dark humor"));
        assert_eq!(
            iv.stage(),
            &Stage::Clarifying {
                field: Field::Personality,
                pending: "edgy".into()
            }
        );

        // the reply is stored whatever its length
        let next = expect_ask(iv.submit("dark").unwrap());
        assert_eq!(next, questions::question(Field::Topics));
        assert_eq!(iv.answers().get(Field::Personality), Some("edgy dark"));
        assert_eq!(iv.awaiting(), Some(Field::Topics));
    }

    #[test]
    fn short_answers_to_other_questions_never_clarify() {
        let mut iv = started();
        assert!(matches!(iv.submit("N").unwrap(), Step::Ask(_)));
        iv.submit("sarcastic critic of everything").unwrap();
        iv.submit("movies and books mostly").unwrap();
        assert!(matches!(iv.submit("hm").unwrap(), Step::Ask(_)));
        iv.submit("dry and deadpan humour").unwrap();
        assert!(matches!(iv.submit("no").unwrap(), Step::Complete(_)));
    }

    #[test]
    fn full_run_with_three_clarifications() {
        let mut iv = started();
        let inputs = [
            "Nova",
            "funny",
            "roasts everyone",
            "fitness",
            "beginner friendly",
            "says 'let's go'",
            "casual",
            "texting a friend",
            "none",
        ];
        let mut clarifications = 0;
        let mut last = None;
        for input in inputs {
            let step = iv.submit(input).unwrap();
            if matches!(step, Step::Clarify(_)) {
                clarifications += 1;
            }
            last = Some(step);
        }
        assert_eq!(clarifications, 3);
        assert!(matches!(last, Some(Step::Complete(_))));
        let a = iv.answers();
        assert_eq!(a.get(Field::Personality), Some("funny roasts everyone"));
        assert_eq!(a.get(Field::Topics), Some("fitness beginner friendly"));
        assert_eq!(a.get(Field::Tone), Some("casual texting a friend"));
    }

    #[test]
    fn restart_clears_answers() {
        let mut iv = started();
        iv.submit("Nova").unwrap();
        iv.start();
        assert_eq!(iv.answers(), &BuildAnswers::default());
        assert_eq!(iv.awaiting(), Some(Field::Name));
    }
}
