use serde_json::Value;

use crate::answer::AnswerMap;
use crate::conditional::is_visible;
use crate::spec::{Department, QuestionSpec, Section};

/// Order-preserving filter of a section's questions against the answers.
pub fn visible_questions<'s>(section: &'s Section, answers: &AnswerMap) -> Vec<&'s QuestionSpec> {
    section
        .questions
        .iter()
        .filter(|question| is_visible(question, answers))
        .collect()
}

/// Live completion counters over every visible question of a department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub answered: usize,
    pub total: usize,
}

impl ProgressSnapshot {
    pub fn compute(department: &Department, answers: &AnswerMap) -> Self {
        let mut answered = 0;
        let mut total = 0;
        for section in &department.sections {
            for question in visible_questions(section, answers) {
                total += 1;
                if is_answered(question, answers) {
                    answered += 1;
                }
            }
        }
        Self { answered, total }
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.answered as f64 / self.total as f64 * 100.0
        }
    }
}

/// Info questions count unconditionally.
pub fn is_answered(question: &QuestionSpec, answers: &AnswerMap) -> bool {
    if question.kind.is_informational() {
        return true;
    }
    match answers.get(&question.id) {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}
