use serde_json::Value;
use thiserror::Error;

use onboarding_spec::{AnswerMap, DepartmentId};

use crate::session::{Session, SessionId};

/// Failures crossing the collaborator boundary. Store and dispatch failures
/// are retryable: the caller's in-memory answers survive them, and reapplying
/// an upsert is idempotent.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("session not found")]
    SessionNotFound,
    #[error("department '{0}' was already completed")]
    AlreadyCompleted(DepartmentId),
    #[error("every department of this session is already completed")]
    NothingPending,
    #[error("store failure: {0}")]
    Store(String),
    #[error("notification dispatch failed: {0}")]
    Dispatch(String),
}

/// One persisted answer row, keyed by (session, department, question).
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAnswer {
    pub session_id: SessionId,
    pub department: DepartmentId,
    pub question_id: String,
    pub value: Value,
}

/// CRUD contract over the opaque session backing store.
pub trait SessionStore {
    /// Looks a session up by slug or access token.
    fn find_by_key(&self, key: &str) -> Result<Option<Session>, EngineError>;
    fn create(&mut self, company_name: &str, ceo_email: Option<&str>)
    -> Result<Session, EngineError>;
    fn update(&mut self, session: &Session) -> Result<(), EngineError>;
    fn delete(&mut self, id: &SessionId) -> Result<(), EngineError>;
}

/// Upsert-based answer persistence. Re-submission overwrites; it never
/// duplicates a (session, department, question) row.
pub trait AnswerStore {
    fn upsert(
        &mut self,
        session_id: &SessionId,
        department: DepartmentId,
        answers: &AnswerMap,
    ) -> Result<(), EngineError>;

    fn answers_for(&self, session_id: &SessionId) -> Result<Vec<StoredAnswer>, EngineError>;
}
