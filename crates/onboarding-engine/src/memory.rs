//! In-memory reference implementations of the collaborator contracts, used by
//! embedding hosts and tests. Real deployments swap these for a database.

use onboarding_spec::{AnswerMap, DepartmentId};

use crate::notify::{DepartmentPayload, MergedPayload, NotificationDispatcher};
use crate::session::{Session, SessionId};
use crate::store::{AnswerStore, EngineError, SessionStore, StoredAnswer};

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Vec<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }
}

impl SessionStore for MemorySessionStore {
    fn find_by_key(&self, key: &str) -> Result<Option<Session>, EngineError> {
        Ok(self
            .sessions
            .iter()
            .find(|session| session.matches_key(key))
            .cloned())
    }

    fn create(
        &mut self,
        company_name: &str,
        ceo_email: Option<&str>,
    ) -> Result<Session, EngineError> {
        let session = Session::new(company_name, ceo_email);
        self.sessions.push(session.clone());
        Ok(session)
    }

    fn update(&mut self, session: &Session) -> Result<(), EngineError> {
        let slot = self
            .sessions
            .iter_mut()
            .find(|existing| existing.id == session.id)
            .ok_or(EngineError::SessionNotFound)?;
        *slot = session.clone();
        Ok(())
    }

    fn delete(&mut self, id: &SessionId) -> Result<(), EngineError> {
        self.sessions.retain(|session| session.id != *id);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryAnswerStore {
    rows: Vec<StoredAnswer>,
}

impl MemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[StoredAnswer] {
        &self.rows
    }
}

impl AnswerStore for MemoryAnswerStore {
    fn upsert(
        &mut self,
        session_id: &SessionId,
        department: DepartmentId,
        answers: &AnswerMap,
    ) -> Result<(), EngineError> {
        for (question_id, value) in answers {
            let existing = self.rows.iter_mut().find(|row| {
                row.session_id == *session_id
                    && row.department == department
                    && row.question_id == *question_id
            });
            match existing {
                Some(row) => row.value = value.clone(),
                None => self.rows.push(StoredAnswer {
                    session_id: *session_id,
                    department,
                    question_id: question_id.clone(),
                    value: value.clone(),
                }),
            }
        }
        Ok(())
    }

    fn answers_for(&self, session_id: &SessionId) -> Result<Vec<StoredAnswer>, EngineError> {
        Ok(self
            .rows
            .iter()
            .filter(|row| row.session_id == *session_id)
            .cloned()
            .collect())
    }
}

/// Dispatcher that records payloads instead of delivering them.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    pub department_payloads: Vec<DepartmentPayload>,
    pub merged_payloads: Vec<MergedPayload>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn department_completed(&mut self, payload: &DepartmentPayload) -> Result<(), EngineError> {
        self.department_payloads.push(payload.clone());
        Ok(())
    }

    fn all_departments_completed(&mut self, payload: &MergedPayload) -> Result<(), EngineError> {
        self.merged_payloads.push(payload.clone());
        Ok(())
    }
}
