use serde_json::Value;

use crate::answer::AnswerMap;
use crate::spec::QuestionSpec;

/// Whether a question is currently visible given the answer map. Pure.
pub fn is_visible(question: &QuestionSpec, answers: &AnswerMap) -> bool {
    match &question.condition {
        None => true,
        Some(expression) => evaluate(expression, answers),
    }
}

/// Evaluates one conditional expression string. Unparseable expressions fail
/// open to visible; this never errors and never panics.
pub fn evaluate(expression: &str, answers: &AnswerMap) -> bool {
    // Whole-clause OR, left to right. No `&&`, no grouping, no precedence.
    if expression.contains(" || ") {
        return expression
            .split(" || ")
            .any(|clause| evaluate(clause.trim(), answers));
    }
    if let Some((field, value)) = split_clause(expression, " includes ") {
        return includes(answers.get(field), &value);
    }
    if let Some((field, value)) = split_clause(expression, " == ") {
        return answers.get(field).and_then(Value::as_str) == Some(value.as_str());
    }
    if let Some((field, value)) = split_clause(expression, " != ") {
        return answers.get(field).and_then(Value::as_str) != Some(value.as_str());
    }
    tracing::warn!(
        expression,
        "unparseable conditional expression; defaulting to visible"
    );
    true
}

fn split_clause<'e>(expression: &'e str, operator: &str) -> Option<(&'e str, String)> {
    let (field, raw) = expression.split_once(operator)?;
    Some((field.trim(), raw.replace('\'', "").trim().to_string()))
}

// Arrays and selection objects only; any other shape, including unset, is
// false.
fn includes(stored: Option<&Value>, value: &str) -> bool {
    match stored {
        Some(Value::Array(items)) => items.iter().any(|item| item.as_str() == Some(value)),
        Some(Value::Object(map)) => map
            .get("selected")
            .and_then(Value::as_array)
            .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(value))),
        _ => false,
    }
}
