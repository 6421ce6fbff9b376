use serde_json::Value;

use crate::answer::{AnswerMap, canonicalize_in_place};
use crate::catalog::Catalog;
use crate::progress::{ProgressSnapshot, visible_questions};
use crate::spec::{Department, DepartmentId, QuestionSpec, Section};
use crate::validate::validate_answer;

/// Top-level steps of the onboarding flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CompanyName,
    DepartmentSelect,
    Questions,
    Review,
    Success,
}

/// How the flow was entered: the full wizard, or a shared session link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    Full,
    TokenLink,
}

/// Result of a `next` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOutcome {
    Moved,
    /// The review step accepted the submitter name. The caller runs the
    /// submit collaborators and, on success, calls [`Navigator::finish`].
    ReadyToSubmit,
    /// Blocked; the error message is carried on the navigator.
    Blocked,
}

/// Mutable per-browser-session state. Everything else is derived live.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub company_name: String,
    pub department: Option<DepartmentId>,
    /// Indices are positions into the visible question sequence, re-clamped
    /// whenever answers change.
    pub section_index: usize,
    pub question_index: usize,
    pub answers: AnswerMap,
    pub submitter_name: String,
}

/// Drives one user through one department's question sequence against a
/// borrowed catalog. Derived views are recomputed from current answers on
/// every read, never cached.
pub struct Navigator<'c> {
    catalog: &'c Catalog,
    mode: EntryMode,
    step: Step,
    state: SessionState,
    error: Option<String>,
}

impl<'c> Navigator<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            mode: EntryMode::Full,
            step: Step::CompanyName,
            state: SessionState::default(),
            error: None,
        }
    }

    /// Token-link entry: jumps straight into the selected department.
    pub fn for_token_link(catalog: &'c Catalog, company_name: &str, department: DepartmentId) -> Self {
        let mut navigator = Self {
            catalog,
            mode: EntryMode::TokenLink,
            step: Step::Questions,
            state: SessionState {
                company_name: company_name.to_string(),
                department: Some(department),
                ..SessionState::default()
            },
            error: None,
        };
        navigator.prime_current();
        navigator
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn mode(&self) -> EntryMode {
        self.mode
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.state.answers
    }

    pub fn set_company_name(&mut self, name: &str) {
        self.state.company_name = name.to_string();
    }

    pub fn set_submitter_name(&mut self, name: &str) {
        self.state.submitter_name = name.to_string();
    }

    pub fn select_department(&mut self, department: DepartmentId) {
        self.state.department = Some(department);
        self.state.section_index = 0;
        self.state.question_index = 0;
    }

    pub fn department(&self) -> Option<&'c Department> {
        self.state
            .department
            .and_then(|id| self.catalog.department(id))
    }

    pub fn current_section(&self) -> Option<&'c Section> {
        self.department()
            .and_then(|department| department.sections.get(self.state.section_index))
    }

    pub fn visible(&self) -> Vec<&'c QuestionSpec> {
        self.current_section()
            .map(|section| visible_questions(section, &self.state.answers))
            .unwrap_or_default()
    }

    pub fn current_question(&self) -> Option<&'c QuestionSpec> {
        self.visible().get(self.state.question_index).copied()
    }

    /// True when no earlier visible question exists; fully hidden sections
    /// count as empty.
    pub fn is_first_question(&self) -> bool {
        if self.state.question_index > 0 {
            return false;
        }
        self.department().is_none_or(|department| {
            department.sections[..self.state.section_index]
                .iter()
                .all(|section| visible_questions(section, &self.state.answers).is_empty())
        })
    }

    pub fn is_last_question(&self) -> bool {
        let visible = self.visible();
        self.department()
            .is_some_and(|department| self.state.section_index + 1 == department.sections.len())
            && !visible.is_empty()
            && self.state.question_index + 1 == visible.len()
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.department()
            .map(|department| ProgressSnapshot::compute(department, &self.state.answers))
            .unwrap_or(ProgressSnapshot {
                answered: 0,
                total: 0,
            })
    }

    /// The only write path for answers: clears the active error and re-clamps
    /// the current index.
    pub fn set_answer(&mut self, question_id: &str, value: Value) {
        self.state.answers.insert(question_id.to_string(), value);
        self.error = None;
        self.reclamp();
        self.prime_current();
    }

    /// Forward transition, gated on the per-step rule.
    pub fn next(&mut self) -> NextOutcome {
        match self.step {
            Step::CompanyName => {
                if self.state.company_name.trim().is_empty() {
                    return self.block("Enter the company name");
                }
                self.error = None;
                self.step = Step::DepartmentSelect;
                NextOutcome::Moved
            }
            Step::DepartmentSelect => {
                if self.state.department.is_none() {
                    return self.block("Select a department");
                }
                self.error = None;
                self.step = Step::Questions;
                self.prime_current();
                NextOutcome::Moved
            }
            Step::Questions => {
                if let Some(question) = self.current_question()
                    && let Err(error) = validate_answer(question, &self.state.answers)
                {
                    self.error = Some(error.message);
                    return NextOutcome::Blocked;
                }
                self.error = None;
                self.advance();
                NextOutcome::Moved
            }
            Step::Review => {
                if self.state.submitter_name.trim().is_empty() {
                    return self.block("Enter your name");
                }
                self.error = None;
                NextOutcome::ReadyToSubmit
            }
            Step::Success => NextOutcome::Moved,
        }
    }

    /// Backward transition. Never validates.
    pub fn previous(&mut self) {
        self.error = None;
        match self.step {
            Step::CompanyName | Step::Success => {}
            Step::DepartmentSelect => {
                if self.mode == EntryMode::Full {
                    self.step = Step::CompanyName;
                }
            }
            Step::Questions => self.retreat(),
            Step::Review => {
                self.step = Step::Questions;
                self.reclamp();
                self.prime_current();
            }
        }
    }

    pub fn finish(&mut self) {
        if self.step == Step::Review {
            self.step = Step::Success;
        }
    }

    pub fn reset(&mut self) {
        self.state = SessionState::default();
        self.error = None;
        self.step = Step::DepartmentSelect;
    }

    fn block(&mut self, message: &str) -> NextOutcome {
        self.error = Some(message.to_string());
        NextOutcome::Blocked
    }

    fn advance(&mut self) {
        if self.state.question_index + 1 < self.visible().len() {
            self.state.question_index += 1;
            self.prime_current();
            return;
        }
        let section_count = self
            .department()
            .map(|department| department.sections.len())
            .unwrap_or(0);
        let mut section = self.state.section_index + 1;
        while section < section_count {
            self.state.section_index = section;
            self.state.question_index = 0;
            // A section can be fully hidden by conditionals; skip it.
            if !self.visible().is_empty() {
                self.prime_current();
                return;
            }
            section += 1;
        }
        self.step = Step::Review;
    }

    fn retreat(&mut self) {
        if self.state.question_index > 0 {
            self.state.question_index -= 1;
            self.prime_current();
            return;
        }
        // Search earlier sections without moving; a section can be fully
        // hidden by conditionals, and landing on one would strand the
        // position outside any visible sequence.
        if let Some(department) = self.department() {
            let mut section = self.state.section_index;
            while section > 0 {
                section -= 1;
                let visible_len = department
                    .sections
                    .get(section)
                    .map(|found| visible_questions(found, &self.state.answers).len())
                    .unwrap_or(0);
                if visible_len > 0 {
                    self.state.section_index = section;
                    self.state.question_index = visible_len - 1;
                    self.prime_current();
                    return;
                }
            }
        }
        // No earlier visible question: the current one is the first.
        if self.mode == EntryMode::Full {
            self.step = Step::DepartmentSelect;
        }
    }

    fn reclamp(&mut self) {
        let visible_len = self.visible().len();
        if visible_len == 0 {
            self.state.question_index = 0;
        } else if self.state.question_index >= visible_len {
            self.state.question_index = visible_len - 1;
        }
    }

    /// Commits canonical defaults/migrations whenever the current question
    /// changes, before any user interaction.
    fn prime_current(&mut self) {
        if self.step != Step::Questions {
            return;
        }
        if let Some(question) = self.current_question() {
            canonicalize_in_place(question, &mut self.state.answers);
        }
    }
}
