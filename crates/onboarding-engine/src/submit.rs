use chrono::Utc;

use onboarding_spec::{AnswerMap, Catalog, DepartmentId};

use crate::notify::{DepartmentPayload, MergedPayload, NotificationDispatcher};
use crate::session::Session;
use crate::store::{AnswerStore, EngineError, SessionStore};

/// Runs the whole submit side of a completed department: persist the answers,
/// notify, flip the department status. The merged notification goes out
/// exactly once, when the last pending department completes.
///
/// Failures surface as errors distinct from success. Completion is committed
/// only after every dispatch succeeds, so a failed dispatch leaves the
/// department pending; the caller's in-memory answers are untouched and a
/// retry reapplies the same idempotent upserts and re-dispatches.
#[allow(clippy::too_many_arguments)]
pub fn complete_department(
    catalog: &Catalog,
    sessions: &mut impl SessionStore,
    answer_store: &mut impl AnswerStore,
    dispatcher: &mut impl NotificationDispatcher,
    session: &mut Session,
    department: DepartmentId,
    submitter_name: &str,
    answers: &AnswerMap,
) -> Result<(), EngineError> {
    if session.is_completed(department) {
        return Err(EngineError::AlreadyCompleted(department));
    }

    answer_store.upsert(&session.id, department, answers)?;

    let department_name = catalog
        .department(department)
        .map(|found| found.name.clone())
        .unwrap_or_else(|| department.to_string());
    let payload = DepartmentPayload {
        company_name: session.company_name.clone(),
        department,
        department_name,
        submitter_name: submitter_name.to_string(),
        answers: answers.clone(),
        session_id: session.id,
    };
    dispatcher.department_completed(&payload)?;
    tracing::info!(session = %session.id, %department, "department completed");

    let mut completed = session.clone();
    completed.mark_completed(department, submitter_name, Utc::now());

    if completed.all_completed() {
        let stored = answer_store.answers_for(&completed.id)?;
        let merged = MergedPayload::build(&completed, &stored);
        dispatcher.all_departments_completed(&merged)?;
        tracing::info!(session = %completed.id, "all departments completed; merged payload dispatched");
    }

    sessions.update(&completed)?;
    *session = completed;
    Ok(())
}
