use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};

use onboarding_spec::{AnswerMap, DepartmentId, SchedulePeriod, WeeklySchedule};

use crate::session::{Session, SessionId};
use crate::store::{EngineError, StoredAnswer};

/// Dispatched once per completed department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentPayload {
    pub company_name: String,
    pub department: DepartmentId,
    pub department_name: String,
    pub submitter_name: String,
    pub answers: AnswerMap,
    pub session_id: SessionId,
}

/// Dispatched exactly once, when the fourth department completes: the merged
/// answer set grouped by department, schedules expanded per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedPayload {
    pub session_id: SessionId,
    pub company_name: String,
    pub ceo_email: Option<String>,
    pub completed_by: BTreeMap<DepartmentId, Option<String>>,
    pub completed_at: BTreeMap<DepartmentId, Option<DateTime<Utc>>>,
    pub answers: BTreeMap<DepartmentId, AnswerMap>,
}

impl MergedPayload {
    pub fn build(session: &Session, stored: &[StoredAnswer]) -> Self {
        let mut answers: BTreeMap<DepartmentId, AnswerMap> = DepartmentId::ALL
            .iter()
            .map(|id| (*id, AnswerMap::new()))
            .collect();
        for row in stored {
            let value = if looks_like_schedule(&row.value) {
                expand_schedule(&row.value)
            } else {
                row.value.clone()
            };
            if let Some(bucket) = answers.get_mut(&row.department) {
                bucket.insert(row.question_id.clone(), value);
            }
        }

        let completed_by = session
            .departments
            .iter()
            .map(|(id, progress)| (*id, progress.completed_by.clone()))
            .collect();
        let completed_at = session
            .departments
            .iter()
            .map(|(id, progress)| (*id, progress.completed_at))
            .collect();

        Self {
            session_id: session.id,
            company_name: session.company_name.clone(),
            ceo_email: session.ceo_email.clone(),
            completed_by,
            completed_at,
            answers,
        }
    }
}

/// Outbound notification contract. Transport and retry live outside the core.
pub trait NotificationDispatcher {
    fn department_completed(&mut self, payload: &DepartmentPayload) -> Result<(), EngineError>;
    fn all_departments_completed(&mut self, payload: &MergedPayload) -> Result<(), EngineError>;
}

/// Fans a weekly schedule out to one entry per calendar day; values that are
/// not a schedule pass through unchanged.
pub fn expand_schedule(value: &Value) -> Value {
    let Ok(schedule) = serde_json::from_value::<WeeklySchedule>(value.clone()) else {
        return value.clone();
    };
    let mut days = Map::new();
    for day in ["monday", "tuesday", "wednesday", "thursday", "friday"] {
        days.insert(day.to_string(), period_value(&schedule.weekday));
    }
    days.insert("saturday".to_string(), period_value(&schedule.saturday));
    days.insert(
        "sunday".to_string(),
        period_value(&schedule.sunday_or_holiday),
    );
    days.insert(
        "holiday".to_string(),
        period_value(&schedule.sunday_or_holiday),
    );
    Value::Object(days)
}

fn period_value(period: &SchedulePeriod) -> Value {
    json!({
        "start": period.start,
        "end": period.end,
        "closed": period.closed,
    })
}

fn looks_like_schedule(value: &Value) -> bool {
    value.as_object().is_some_and(|map| {
        map.contains_key("weekday")
            || map.contains_key("saturday")
            || map.contains_key("sunday_or_holiday")
    })
}
