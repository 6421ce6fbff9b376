use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::spec::{QuestionSpec, QuestionType};

/// Answers keyed by question id, in the wire shape of their question type.
pub type AnswerMap = BTreeMap<String, Value>;

/// Sentinel meaning "intentionally not provided", distinct from empty/unset.
pub const NOT_AVAILABLE: &str = "NAO_POSSUI";

/// Reserved multi-select option value backing the free-text "other" entry.
pub const OTHER_OPTION: &str = "outro";

/// `"HH:MM"` wall-clock time with 5-minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.splitn(2, ':');
        let hour = parts
            .next()
            .and_then(|part| part.trim().parse().ok())
            .filter(|hour| *hour <= 23)
            .unwrap_or(8);
        let minute = parts
            .next()
            .and_then(|part| part.trim().parse().ok())
            .filter(|minute| *minute <= 59)
            .unwrap_or(0);
        Self { hour, minute }
    }

    pub fn inc_hour(self) -> Self {
        Self {
            hour: if self.hour >= 23 { 0 } else { self.hour + 1 },
            ..self
        }
    }

    pub fn dec_hour(self) -> Self {
        Self {
            hour: if self.hour == 0 { 23 } else { self.hour - 1 },
            ..self
        }
    }

    // Minutes wrap within the hour; the hour never carries.
    pub fn inc_minute(self) -> Self {
        Self {
            minute: if self.minute >= 55 { 0 } else { self.minute + 5 },
            ..self
        }
    }

    pub fn dec_minute(self) -> Self {
        Self {
            minute: if self.minute < 5 { 55 } else { self.minute - 5 },
            ..self
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchedulePeriod {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub closed: bool,
}

impl SchedulePeriod {
    fn open(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
            closed: false,
        }
    }
}

/// Canonical weekly-schedule shape: three independently closable periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeeklySchedule {
    pub weekday: SchedulePeriod,
    pub saturday: SchedulePeriod,
    pub sunday_or_holiday: SchedulePeriod,
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self {
            weekday: SchedulePeriod::open("08:00", "18:00"),
            saturday: SchedulePeriod::open("08:00", "12:00"),
            sunday_or_holiday: SchedulePeriod::open("08:00", "12:00"),
        }
    }
}

impl WeeklySchedule {
    pub fn from_stored(value: Option<&Value>) -> Self {
        value
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("schedule always serializes")
    }
}

/// Canonical multi-select shape; legacy plain arrays migrate into it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct MultiSelect {
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default, rename = "otherText")]
    pub other_text: String,
}

impl MultiSelect {
    pub fn from_stored(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Array(items)) => Self {
                selected: items
                    .iter()
                    .filter_map(|item| item.as_str().map(String::from))
                    .collect(),
                other_text: String::new(),
            },
            Some(value @ Value::Object(_)) => {
                serde_json::from_value(value.clone()).unwrap_or_default()
            }
            _ => Self::default(),
        }
    }

    /// Dropping the reserved "other" entry also clears its free text.
    pub fn toggle(&mut self, option: &str) {
        if let Some(position) = self.selected.iter().position(|value| value == option) {
            self.selected.remove(position);
            if option == OTHER_OPTION {
                self.other_text.clear();
            }
        } else {
            self.selected.push(option.to_string());
        }
    }

    /// The free text is editable only while the "other" option is selected.
    pub fn set_other_text(&mut self, text: &str) {
        if self.selected.iter().any(|value| value == OTHER_OPTION) {
            self.other_text = text.to_string();
        }
    }

    pub fn to_value(&self) -> Value {
        json!({ "selected": self.selected, "otherText": self.other_text })
    }
}

/// Flips an optional-url answer between the sentinel and an editable string.
pub fn toggle_not_available(current: Option<&Value>) -> Value {
    match current.and_then(Value::as_str) {
        Some(NOT_AVAILABLE) => Value::String(String::new()),
        _ => Value::String(NOT_AVAILABLE.to_string()),
    }
}

/// Numeric inputs store a number, or an empty string when the field is blank.
pub fn numeric_input(raw: &str) -> Value {
    match raw.trim() {
        "" => Value::String(String::new()),
        text => text
            .parse::<f64>()
            .map(|number| json!(number))
            .unwrap_or_else(|_| Value::String(text.to_string())),
    }
}

/// Typed view over a stored answer, discriminated by the question type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedAnswer {
    Text(String),
    Number(Option<f64>),
    Currency(Option<f64>),
    Url(String),
    NotAvailable,
    OptionalUrl(String),
    Time(TimeOfDay),
    Schedule(WeeklySchedule),
    Single(String),
    Multi(MultiSelect),
    Informational,
    Unset,
}

impl TypedAnswer {
    pub fn from_stored(kind: QuestionType, stored: Option<&Value>) -> Self {
        if kind.is_informational() {
            return TypedAnswer::Informational;
        }
        let Some(value) = stored else {
            return TypedAnswer::Unset;
        };
        match kind {
            QuestionType::ShortText | QuestionType::LongText => {
                TypedAnswer::Text(scalar_text(value))
            }
            QuestionType::Number => TypedAnswer::Number(value.as_f64()),
            QuestionType::Currency => TypedAnswer::Currency(value.as_f64()),
            QuestionType::Url => TypedAnswer::Url(scalar_text(value)),
            QuestionType::OptionalUrl => match value.as_str() {
                Some(NOT_AVAILABLE) => TypedAnswer::NotAvailable,
                other => TypedAnswer::OptionalUrl(other.unwrap_or_default().to_string()),
            },
            QuestionType::TimeOfDay => {
                TypedAnswer::Time(TimeOfDay::parse(value.as_str().unwrap_or_default()))
            }
            QuestionType::WeeklySchedule => {
                TypedAnswer::Schedule(WeeklySchedule::from_stored(Some(value)))
            }
            QuestionType::SingleSelect => TypedAnswer::Single(scalar_text(value)),
            QuestionType::MultiSelect => TypedAnswer::Multi(MultiSelect::from_stored(Some(value))),
            QuestionType::Info | QuestionType::InfoWithLink => TypedAnswer::Informational,
        }
    }
}

/// Commits the canonical shape for types that normalize eagerly: the default
/// weekly schedule on first observation, the migrated multi-select object
/// for legacy stored values. Returns whether the map changed.
pub fn canonicalize_in_place(question: &QuestionSpec, answers: &mut AnswerMap) -> bool {
    match question.kind {
        QuestionType::WeeklySchedule => {
            let canonical = answers
                .get(&question.id)
                .is_some_and(|value| serde_json::from_value::<WeeklySchedule>(value.clone()).is_ok());
            if !canonical {
                answers.insert(question.id.clone(), WeeklySchedule::default().to_value());
            }
            !canonical
        }
        QuestionType::MultiSelect => match answers.get(&question.id) {
            Some(Value::Object(map)) if map.contains_key("selected") => false,
            Some(value) => {
                let migrated = MultiSelect::from_stored(Some(value)).to_value();
                answers.insert(question.id.clone(), migrated);
                true
            }
            None => false,
        },
        _ => false,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}
