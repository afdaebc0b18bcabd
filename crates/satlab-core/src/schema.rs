use anyhow::{bail, Context, Result};
use jsonschema::Validator;
use serde_json::Value;

use crate::config::ClarifyConfig;
use crate::errors::{CheckIssue, CheckReport};
use crate::types::{BuildAnswers, Field};

const ANSWERS_SCHEMA: &str = include_str!("../schema/answers.schema.json");

pub fn validator() -> Result<Validator> {
    let schema: Value =
        serde_json::from_str(ANSWERS_SCHEMA).context("embedded schema is invalid JSON")?;
    Validator::new(&schema).map_err(|e| anyhow::anyhow!("schema compilation failed: {e}"))
}

/// Validate an answers value against the embedded schema.
pub fn validate(data: &Value) -> Result<()> {
    let v = validator()?;
    if v.is_valid(data) {
        return Ok(());
    }
    let mut msgs: Vec<String> = Vec::new();
    for error in v.iter_errors(data) {
        let path = error.instance_path.to_string();
        let loc = if path.is_empty() {
            "(root)".into()
        } else {
            path
        };
        msgs.push(format!("  {loc}: {error}"));
    }
    bail!("validation failed:\n{}", msgs.join("\n"));
}

/// Validate, then convert into [`BuildAnswers`].
pub fn parse_answers(data: &Value) -> Result<BuildAnswers> {
    validate(data)?;
    BuildAnswers::deserialize_value(data)
}

/// Read and validate an answers file.
pub fn load_answers(path: &str) -> Result<BuildAnswers> {
    let content = std::fs::read_to_string(path).with_context(|| format!("cannot read {path}"))?;
    let data: Value =
        serde_json::from_str(&content).with_context(|| format!("{path}: invalid JSON"))?;
    parse_answers(&data).with_context(|| format!("{path}: not a valid answers file"))
}

impl BuildAnswers {
    fn deserialize_value(data: &Value) -> Result<Self> {
        serde_json::from_value(data.clone()).context("answers do not match the expected shape")
    }
}

/// Schema errors plus lint warnings for `sat check`.
pub fn check(data: &Value, file: &str, strict: bool, clarify: &ClarifyConfig) -> CheckReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    match validator() {
        Ok(v) => {
            for error in v.iter_errors(data) {
                let path = error.instance_path.to_string();
                errors.push(CheckIssue {
                    code: "E001".to_string(),
                    check: "schema".to_string(),
                    message: error.to_string(),
                    path: Some(if path.is_empty() {
                        "$(root)".to_string()
                    } else {
                        format!("${path}")
                    }),
                });
            }
        }
        Err(e) => errors.push(CheckIssue {
            code: "E000".to_string(),
            check: "schema".to_string(),
            message: e.to_string(),
            path: None,
        }),
    }

    if errors.is_empty() {
        if let Ok(answers) = BuildAnswers::deserialize_value(data) {
            lint(&answers, clarify, &mut warnings);
        }
    }

    let pass = errors.is_empty() && (!strict || warnings.is_empty());
    CheckReport {
        file: file.to_string(),
        pass,
        errors,
        warnings,
    }
}

fn lint(answers: &BuildAnswers, clarify: &ClarifyConfig, warnings: &mut Vec<CheckIssue>) {
    for field in answers.missing() {
        let (code, message) = if field == Field::Name {
            ("W001", "persona has no name; documents will use the default".to_string())
        } else {
            ("W002", format!("{field} is unanswered; its rules will only use fallbacks"))
        };
        warnings.push(CheckIssue {
            code: code.to_string(),
            check: "lint".to_string(),
            message,
            path: Some(format!("$/{field}")),
        });
    }

    for field in Field::ALL.iter().filter(|f| f.is_clarifiable()) {
        if let Some(text) = answers.get(*field) {
            if clarify.is_terse(text) {
                warnings.push(CheckIssue {
                    code: "W003".to_string(),
                    check: "lint".to_string(),
                    message: format!(
                        "{field} answer \"{}\" is terse; the interview would ask a follow-up",
                        text.trim()
                    ),
                    path: Some(format!("$/{field}")),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_answers_parse() {
        let a = parse_answers(&json!({"name": "Nova", "tone": "edgy"})).unwrap();
        assert_eq!(a.get(Field::Tone), Some("edgy"));
    }

    #[test]
    fn unknown_keys_and_wrong_types_fail() {
        let err = validate(&json!({"name": "Nova", "mood": "x"})).unwrap_err();
        assert!(err.to_string().contains("validation failed"));
        assert!(parse_answers(&json!({"name": 7})).is_err());
        assert!(parse_answers(&json!(["name"])).is_err());
    }

    #[test]
    fn check_reports_lint_warnings() {
        let data = json!({
            "personality": "edgy",
            "topics": "fitness and nutrition plans",
            "quirks": "none",
            "tone": "loud, proud, and sweary",
            "special": "none"
        });
        let report = check(&data, "a.json", false, &ClarifyConfig::default());
        assert!(report.pass);
        let codes: Vec<_> = report.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, ["W001", "W003"]);
        assert_eq!(report.warnings[1].path.as_deref(), Some("$/personality"));

        let strict = check(&data, "a.json", true, &ClarifyConfig::default());
        assert!(!strict.pass);
    }

    #[test]
    fn check_reports_schema_errors_with_paths() {
        let report = check(&json!({"tone": 3}), "b.json", false, &ClarifyConfig::default());
        assert!(!report.pass);
        assert_eq!(report.errors[0].code, "E001");
        assert_eq!(report.errors[0].path.as_deref(), Some("$/tone"));
        assert!(report.warnings.is_empty());
    }
}
