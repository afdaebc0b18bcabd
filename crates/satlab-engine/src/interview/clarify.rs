use satlab_core::config::{ClarifyConfig, FieldFollowUps};
use satlab_core::types::Field;

/// The follow-up to ask for `raw` at `field`, or `None` when the answer
/// stands as given.
///
/// Only terse answers to clarifiable fields get one. Keywords are matched
/// as lower-cased substrings in table order; otherwise the field's generic
/// follow-up echoes the answer.
pub fn follow_up(field: Field, raw: &str, config: &ClarifyConfig) -> Option<String> {
    let table = config.for_field(field)?;
    let input = raw.trim().to_lowercase();
    if !config.is_terse(&input) {
        return None;
    }

    let question = match keyword_hit(table, &input) {
        Some(q) => q.to_string(),
        None => fill(&table.generic, raw),
    };
    tracing::debug!(%field, answer = raw, "answer is terse, asking follow-up");
    Some(question)
}

fn keyword_hit<'a>(table: &'a FieldFollowUps, input: &str) -> Option<&'a str> {
    table
        .keywords
        .iter()
        .find(|k| k.keywords.iter().any(|w| input.contains(w.to_lowercase().as_str())))
        .map(|k| k.question.as_str())
}

fn fill(template: &str, raw: &str) -> String {
    template
        .replace("{Answer}", &capitalize(raw))
        .replace("{answer}", raw)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
