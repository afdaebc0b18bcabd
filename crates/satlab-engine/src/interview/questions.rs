use satlab_core::types::Field;

pub const WELCOME: &str =
    "Hey! I'm Simple_AI, your builder. Let's create your custom AI personality.";

const QUESTIONS: [&str; 6] = [
    "What's the name of your AI?",
    "What's the main personality or vibe? (e.g., brutally honest, supportive coach, sarcastic critic)",
    "What topics or domains should it focus on? (e.g., astrology, coding, fitness, etc.)",
    "Any specific quirks or catchphrases?",
    "What tone should it use? (e.g., casual, formal, edgy)",
    "Anything else special about this AI?",
];

/// Question text asked for `field`.
pub fn question(field: Field) -> &'static str {
    QUESTIONS[field.index()]
}

pub fn all() -> impl Iterator<Item = (Field, &'static str)> {
    Field::ALL.into_iter().map(|f| (f, question(f)))
}

/// Welcome line followed by the first question.
pub fn opening() -> String {
    format!("{WELCOME}\n\n{}", question(Field::Name))
}

pub fn completion(name: Option<&str>) -> String {
    format!(
        "Perfect! {} is ready to go. Start chatting below!",
        name.map(str::trim).unwrap_or("Your AI")
    )
}
