use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::answer::{AnswerMap, MultiSelect};
use crate::spec::{QuestionSpec, QuestionType};

/// User-facing message blocking a forward transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub question_id: String,
    pub message: String,
}

impl ValidationError {
    fn new(question: &QuestionSpec, message: impl Into<String>) -> Self {
        Self {
            question_id: question.id.clone(),
            message: message.into(),
        }
    }
}

/// Per-type rules for one question; only `next` transitions call this.
pub fn validate_answer(
    question: &QuestionSpec,
    answers: &AnswerMap,
) -> Result<(), ValidationError> {
    if question.kind.is_informational() {
        return Ok(());
    }

    let stored = answers.get(&question.id);

    if question.required {
        if is_blank(stored) {
            return Err(ValidationError::new(question, "This field is required"));
        }
        if question.kind == QuestionType::MultiSelect {
            let selection = MultiSelect::from_stored(stored);
            if selection.selected.is_empty() {
                return Err(ValidationError::new(question, "Select at least one option"));
            }
        }
    }

    if question.kind == QuestionType::Url
        && let Some(raw) = stored.and_then(Value::as_str)
        && !raw.is_empty()
        && Url::parse(raw).is_err()
    {
        return Err(ValidationError::new(question, "Invalid URL"));
    }

    if let Some(rule) = &question.validation
        && let Some(min) = rule.strip_prefix("min:").and_then(|n| n.parse::<usize>().ok())
        && let Some(text) = stored.and_then(Value::as_str)
        && !text.is_empty()
        && text.chars().count() < min
    {
        return Err(ValidationError::new(
            question,
            format!("Minimum {min} characters"),
        ));
    }

    Ok(())
}

fn is_blank(stored: Option<&Value>) -> bool {
    match stored {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}
