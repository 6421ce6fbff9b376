use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::{Department, DepartmentId};

/// Fatal schema defects. A catalog either loads cleanly or not at all; no
/// defect is deferred to answer time.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed schema document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate question id '{question}' in department '{department}'")]
    DuplicateQuestion {
        department: DepartmentId,
        question: String,
    },
    #[error("duplicate option value '{value}' on question '{question}'")]
    DuplicateOption { question: String, value: String },
    #[error("select question '{0}' declares no options")]
    NoOptions(String),
}

/// Immutable set of departments, loaded once and passed by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Catalog {
    pub departments: Vec<Department>,
}

impl Catalog {
    /// Parses and validates a schema document.
    pub fn from_json(raw: &str) -> Result<Self, SchemaError> {
        let catalog: Catalog = serde_json::from_str(raw)?;
        catalog.check()?;
        Ok(catalog)
    }

    pub fn department(&self, id: DepartmentId) -> Option<&Department> {
        self.departments
            .iter()
            .find(|department| department.id == id)
    }

    fn check(&self) -> Result<(), SchemaError> {
        for department in &self.departments {
            let mut seen = BTreeSet::new();
            for question in department.questions() {
                if !seen.insert(question.id.as_str()) {
                    return Err(SchemaError::DuplicateQuestion {
                        department: department.id,
                        question: question.id.clone(),
                    });
                }
                if question.kind.has_options() {
                    if question.options.is_empty() {
                        return Err(SchemaError::NoOptions(question.id.clone()));
                    }
                    let mut values = BTreeSet::new();
                    for option in &question.options {
                        if !values.insert(option.value.as_str()) {
                            return Err(SchemaError::DuplicateOption {
                                question: question.id.clone(),
                                value: option.value.clone(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
