use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::QuestionSpec;

/// The four independent question tracks of an onboarding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentId {
    SacGeral,
    Financeiro,
    Suporte,
    Vendas,
}

impl DepartmentId {
    /// Canonical filling order.
    pub const ALL: [DepartmentId; 4] = [
        DepartmentId::SacGeral,
        DepartmentId::Financeiro,
        DepartmentId::Suporte,
        DepartmentId::Vendas,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DepartmentId::SacGeral => "sac_geral",
            DepartmentId::Financeiro => "financeiro",
            DepartmentId::Suporte => "suporte",
            DepartmentId::Vendas => "vendas",
        }
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Section {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<QuestionSpec>,
}

/// One onboarding track, loaded once from the schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sections: Vec<Section>,
}

impl Department {
    pub fn questions(&self) -> impl Iterator<Item = &QuestionSpec> {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter())
    }

    pub fn question(&self, id: &str) -> Option<&QuestionSpec> {
        self.questions().find(|question| question.id == id)
    }
}
