use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::organization::domain::{DepartmentId, EmployeeId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CriterionId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvaluationId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvaluationDetailId(pub String);

/// Weighted rubric line. Weights within a scope are expected to sum to 100 but nothing enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCriterion {
    pub id: CriterionId,
    pub name: String,
    pub description: Option<String>,
    pub weight: f64,
    pub department_id: Option<DepartmentId>,
    pub is_active: bool,
}

impl EvaluationCriterion {
    /// Unscoped criteria apply to every department.
    pub fn applies_to(&self, department: Option<&DepartmentId>) -> bool {
        match (&self.department_id, department) {
            (None, _) => true,
            (Some(scope), Some(department)) => scope == department,
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Draft,
    Submitted,
    Approved,
}

impl EvaluationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EvaluationStatus::Draft => "draft",
            EvaluationStatus::Submitted => "submitted",
            EvaluationStatus::Approved => "approved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub employee_id: EmployeeId,
    pub evaluator_id: EmployeeId,
    pub evaluation_date: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub overall_score: u8,
    pub comments: Option<String>,
    pub status: EvaluationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationDetail {
    pub id: EvaluationDetailId,
    pub evaluation_id: EvaluationId,
    pub criterion_id: CriterionId,
    pub score: u8,
    pub notes: Option<String>,
}

/// Score given to one criterion on the evaluation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion_id: CriterionId,
    pub score: u8,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Evaluation form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSubmission {
    pub employee_id: EmployeeId,
    pub evaluator_id: EmployeeId,
    /// Defaults to the day the submission is processed.
    #[serde(default)]
    pub evaluation_date: Option<NaiveDate>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub criteria_scores: Vec<CriterionScore>,
    #[serde(default)]
    pub comments: Option<String>,
    pub status: EvaluationStatus,
}
