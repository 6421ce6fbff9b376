use std::sync::OnceLock;

use regex::Regex;

use crate::answer::{AnswerMap, MultiSelect, TypedAnswer, WeeklySchedule};
use crate::spec::QuestionSpec;

pub const CURRENCY_MARKER: &str = "R$";

const NOT_AVAILABLE_LABEL: &str = "Not available";
const SCHEDULE_DELIMITER: &str = " | ";

/// Human-readable rendering of a stored answer, shared by the review screen
/// and the outbound payloads. `None` when there is nothing to show.
pub fn format_answer(question: &QuestionSpec, answers: &AnswerMap) -> Option<String> {
    let stored = answers.get(&question.id)?;
    if stored.as_str() == Some("") {
        return None;
    }
    match TypedAnswer::from_stored(question.kind, Some(stored)) {
        TypedAnswer::Informational | TypedAnswer::Unset => None,
        TypedAnswer::Text(text) | TypedAnswer::Url(text) | TypedAnswer::OptionalUrl(text) => {
            non_empty(text)
        }
        TypedAnswer::NotAvailable => Some(NOT_AVAILABLE_LABEL.to_string()),
        TypedAnswer::Number(number) => number.map(format_number),
        TypedAnswer::Currency(number) => {
            number.map(|amount| format!("{CURRENCY_MARKER} {}", format_number(amount)))
        }
        TypedAnswer::Time(time) => Some(time.to_string()),
        TypedAnswer::Schedule(schedule) => Some(format_schedule(&schedule)),
        TypedAnswer::Single(value) => Some(
            question
                .option_label(&value)
                .map(String::from)
                .unwrap_or(value),
        ),
        TypedAnswer::Multi(selection) => format_multi(question, &selection),
    }
}

fn format_multi(question: &QuestionSpec, selection: &MultiSelect) -> Option<String> {
    let mut labels: Vec<String> = selection
        .selected
        .iter()
        .map(|value| {
            question
                .option_label(value)
                .map(String::from)
                .unwrap_or_else(|| value.clone())
        })
        .collect();
    if !selection.other_text.is_empty() {
        labels.push(selection.other_text.clone());
    }
    if labels.is_empty() {
        None
    } else {
        Some(labels.join(", "))
    }
}

fn format_schedule(schedule: &WeeklySchedule) -> String {
    [
        ("Mon-Fri", &schedule.weekday),
        ("Saturday", &schedule.saturday),
        ("Sunday/Holiday", &schedule.sunday_or_holiday),
    ]
    .iter()
    .map(|(label, period)| {
        if period.closed {
            format!("{label}: closed")
        } else {
            format!("{label}: {} to {}", period.start, period.end)
        }
    })
    .collect::<Vec<_>>()
    .join(SCHEDULE_DELIMITER)
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoStep {
    pub number: u32,
    pub text: String,
}

/// Splits `"1. ... 2. ..."` style text into discrete steps. `None` unless
/// more than one step matches.
pub fn info_steps(text: &str) -> Option<Vec<InfoStep>> {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    let marker = MARKER.get_or_init(|| Regex::new(r"(\d+)\.\s*").expect("static pattern"));

    let marks: Vec<(usize, usize, u32)> = marker
        .captures_iter(text)
        .filter_map(|capture| {
            let whole = capture.get(0)?;
            let number = capture.get(1)?.as_str().parse().ok()?;
            Some((whole.start(), whole.end(), number))
        })
        .collect();

    let mut steps = Vec::with_capacity(marks.len());
    for (index, (_, body_start, number)) in marks.iter().enumerate() {
        let body_end = marks
            .get(index + 1)
            .map(|next| next.0)
            .unwrap_or(text.len());
        let body = text[*body_start..body_end].trim();
        if !body.is_empty() {
            steps.push(InfoStep {
                number: *number,
                text: body.to_string(),
            });
        }
    }

    (steps.len() > 1).then_some(steps)
}
