use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use onboarding_spec::DepartmentId;

use crate::store::{EngineError, SessionStore};

pub type SessionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentStatus {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DepartmentProgress {
    pub status: DepartmentStatus,
    pub completed_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// One company's onboarding, resumed by anyone holding the slug or token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub company_name: String,
    pub ceo_email: Option<String>,
    pub slug: String,
    /// Secret token; knowing it grants access to the whole session.
    pub access_token: String,
    pub created_at: DateTime<Utc>,
    pub departments: BTreeMap<DepartmentId, DepartmentProgress>,
}

impl Session {
    pub fn new(company_name: &str, ceo_email: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_name: company_name.trim().to_string(),
            ceo_email: ceo_email
                .map(|email| email.trim().to_string())
                .filter(|email| !email.is_empty()),
            slug: slugify(company_name),
            access_token: Uuid::new_v4().simple().to_string(),
            created_at: Utc::now(),
            departments: DepartmentId::ALL
                .iter()
                .map(|id| (*id, DepartmentProgress::default()))
                .collect(),
        }
    }

    pub fn matches_key(&self, key: &str) -> bool {
        self.slug == key || self.access_token == key
    }

    pub fn is_completed(&self, department: DepartmentId) -> bool {
        self.departments
            .get(&department)
            .is_some_and(|progress| progress.status == DepartmentStatus::Completed)
    }

    pub fn completed_count(&self) -> usize {
        DepartmentId::ALL
            .iter()
            .filter(|id| self.is_completed(**id))
            .count()
    }

    pub fn all_completed(&self) -> bool {
        self.completed_count() == DepartmentId::ALL.len()
    }

    pub fn mark_completed(
        &mut self,
        department: DepartmentId,
        submitter_name: &str,
        at: DateTime<Utc>,
    ) {
        let progress = self.departments.entry(department).or_default();
        progress.status = DepartmentStatus::Completed;
        progress.completed_by = Some(submitter_name.to_string());
        progress.completed_at = Some(at);
    }
}

/// Token-link entry point: find the session behind a slug or access token and
/// make sure there is still something left to fill in. Both failure modes are
/// terminal for the question flow.
pub fn resolve_entry<S: SessionStore>(store: &S, key: &str) -> Result<Session, EngineError> {
    let session = store
        .find_by_key(key)?
        .ok_or(EngineError::SessionNotFound)?;
    if session.all_completed() {
        return Err(EngineError::NothingPending);
    }
    Ok(session)
}

fn slugify(name: &str) -> String {
    let mut slug = String::new();
    for ch in name.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        format!("company-{}", &Uuid::new_v4().simple().to_string()[..8])
    } else {
        slug.to_string()
    }
}
