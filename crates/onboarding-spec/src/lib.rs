#![allow(missing_docs)]

pub mod answer;
pub mod catalog;
pub mod conditional;
pub mod format;
pub mod navigator;
pub mod progress;
pub mod spec;
pub mod validate;

pub use answer::{
    AnswerMap, MultiSelect, NOT_AVAILABLE, OTHER_OPTION, SchedulePeriod, TimeOfDay, TypedAnswer,
    WeeklySchedule, canonicalize_in_place, numeric_input, toggle_not_available,
};
pub use catalog::{Catalog, SchemaError};
pub use conditional::{evaluate, is_visible};
pub use format::{CURRENCY_MARKER, InfoStep, format_answer, info_steps};
pub use navigator::{EntryMode, Navigator, NextOutcome, SessionState, Step};
pub use progress::{ProgressSnapshot, is_answered, visible_questions};
pub use spec::{Department, DepartmentId, QuestionOption, QuestionSpec, QuestionType, Section};
pub use validate::{ValidationError, validate_answer};
