use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::domain::{
    Evaluation, EvaluationDetail, EvaluationDetailId, EvaluationId, EvaluationStatus,
    EvaluationSubmission,
};
use super::repository::EvaluationRepository;
use super::scoring::{overall_score, ScoreBand, WeightedScore};
use crate::workflows::organization::domain::{Employee, EmployeeId};
use crate::workflows::organization::OrganizationRepository;
use crate::workflows::repository::RepositoryError;

/// Evaluation with its details, as returned to the evaluation pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationView {
    pub evaluation: Evaluation,
    pub details: Vec<EvaluationDetail>,
    pub band: ScoreBand,
    pub band_label: &'static str,
}

impl EvaluationView {
    fn new(evaluation: Evaluation, details: Vec<EvaluationDetail>) -> Self {
        let band = ScoreBand::for_score(f64::from(evaluation.overall_score));
        Self {
            evaluation,
            details,
            band,
            band_label: band.label(),
        }
    }
}

/// Service validating evaluation forms, scoring them and driving their status transitions.
pub struct EvaluationService<E, O> {
    evaluations: Arc<E>,
    organization: Arc<O>,
    sequence: AtomicU64,
}

impl<E, O> EvaluationService<E, O>
where
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    pub fn new(evaluations: Arc<E>, organization: Arc<O>) -> Self {
        Self {
            evaluations,
            organization,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Validate and score a submission, persisting the evaluation and one detail per criterion.
    ///
    /// `today` is used when the submission carries no evaluation date.
    pub fn submit(
        &self,
        submission: EvaluationSubmission,
        today: NaiveDate,
    ) -> Result<EvaluationView, EvaluationError> {
        let EvaluationSubmission {
            employee_id,
            evaluator_id,
            evaluation_date,
            period_start,
            period_end,
            criteria_scores,
            comments,
            status,
        } = submission;

        if status == EvaluationStatus::Approved {
            return Err(EvaluationError::ApprovedOnSubmission);
        }
        if period_start > period_end {
            return Err(EvaluationError::InvalidPeriod {
                start: period_start,
                end: period_end,
            });
        }
        if criteria_scores.is_empty() {
            return Err(EvaluationError::NoCriteria);
        }

        let employee = self
            .organization
            .employee(&employee_id)?
            .ok_or_else(|| EvaluationError::UnknownEmployee(employee_id.0.clone()))?;
        let evaluator = self.evaluator(&evaluator_id)?;
        if !evaluator.role.can_evaluate() {
            return Err(EvaluationError::NotPermitted(evaluator_id.0));
        }

        let mut seen = HashSet::new();
        let mut weighted = Vec::with_capacity(criteria_scores.len());
        for entry in &criteria_scores {
            if entry.score > 100 {
                return Err(EvaluationError::ScoreOutOfRange {
                    criterion: entry.criterion_id.0.clone(),
                    score: entry.score,
                });
            }
            if !seen.insert(entry.criterion_id.clone()) {
                return Err(EvaluationError::DuplicateCriterion(
                    entry.criterion_id.0.clone(),
                ));
            }
            let criterion = self
                .organization
                .criterion(&entry.criterion_id)?
                .ok_or_else(|| EvaluationError::UnknownCriterion(entry.criterion_id.0.clone()))?;
            if !criterion.is_active {
                return Err(EvaluationError::InactiveCriterion(criterion.id.0));
            }
            if !criterion.applies_to(employee.department_id.as_ref()) {
                return Err(EvaluationError::CriterionOutOfScope {
                    criterion: criterion.id.0,
                    employee: employee.id.0,
                });
            }
            weighted.push(WeightedScore::new(criterion.weight, f64::from(entry.score)));
        }

        // The overall score is weighted over the whole rubric, so every line must be scored.
        let missing = self
            .organization
            .criteria()?
            .into_iter()
            .filter(|criterion| {
                criterion.is_active
                    && criterion.applies_to(employee.department_id.as_ref())
                    && !seen.contains(&criterion.id)
            })
            .map(|criterion| criterion.id)
            .min();
        if let Some(criterion) = missing {
            return Err(EvaluationError::MissingCriterion(criterion.0));
        }

        let evaluation_id = EvaluationId(format!("eval-{:06}", self.next_sequence()));
        let details = criteria_scores
            .into_iter()
            .map(|entry| EvaluationDetail {
                id: EvaluationDetailId(format!("detail-{:06}", self.next_sequence())),
                evaluation_id: evaluation_id.clone(),
                criterion_id: entry.criterion_id,
                score: entry.score,
                notes: entry.notes.filter(|notes| !notes.trim().is_empty()),
            })
            .collect::<Vec<_>>();

        let evaluation = Evaluation {
            id: evaluation_id,
            employee_id: employee.id,
            evaluator_id: evaluator.id,
            evaluation_date: evaluation_date.unwrap_or(today),
            period_start,
            period_end,
            overall_score: overall_score(&weighted),
            comments: comments.filter(|text| !text.trim().is_empty()),
            status,
        };

        let stored = self.evaluations.insert(evaluation, details.clone())?;
        info!(
            evaluation = %stored.id.0,
            employee = %stored.employee_id.0,
            overall_score = stored.overall_score,
            status = stored.status.label(),
            "evaluation recorded"
        );
        Ok(EvaluationView::new(stored, details))
    }

    /// Move a draft to `submitted`.
    pub fn mark_submitted(&self, id: &EvaluationId) -> Result<EvaluationView, EvaluationError> {
        self.transition(id, EvaluationStatus::Draft, EvaluationStatus::Submitted)
    }

    /// Approve a submitted evaluation; only managers may approve.
    pub fn approve(
        &self,
        id: &EvaluationId,
        approver_id: &EmployeeId,
    ) -> Result<EvaluationView, EvaluationError> {
        let approver = self.evaluator(approver_id)?;
        if !approver.role.can_approve_evaluations() {
            return Err(EvaluationError::NotPermitted(approver_id.0.clone()));
        }
        self.transition(id, EvaluationStatus::Submitted, EvaluationStatus::Approved)
    }

    /// Delete a draft or submitted evaluation. Approved evaluations are kept for the record.
    pub fn delete(&self, id: &EvaluationId) -> Result<(), EvaluationError> {
        let evaluation = self.fetch(id)?;
        if evaluation.status == EvaluationStatus::Approved {
            return Err(EvaluationError::ApprovedLocked(id.0.clone()));
        }
        self.evaluations.delete(id)?;
        info!(evaluation = %id.0, "evaluation deleted");
        Ok(())
    }

    pub fn get(&self, id: &EvaluationId) -> Result<EvaluationView, EvaluationError> {
        let evaluation = self.fetch(id)?;
        let details = self.evaluations.details(id)?;
        Ok(EvaluationView::new(evaluation, details))
    }

    fn transition(
        &self,
        id: &EvaluationId,
        from: EvaluationStatus,
        to: EvaluationStatus,
    ) -> Result<EvaluationView, EvaluationError> {
        let mut evaluation = self.fetch(id)?;
        if evaluation.status != from {
            return Err(EvaluationError::InvalidTransition {
                from: evaluation.status,
                to,
            });
        }

        evaluation.status = to;
        self.evaluations.update(evaluation.clone())?;
        info!(evaluation = %id.0, status = to.label(), "evaluation status changed");

        let details = self.evaluations.details(id)?;
        Ok(EvaluationView::new(evaluation, details))
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Evaluation, EvaluationError> {
        self.evaluations
            .fetch(id)?
            .ok_or_else(|| EvaluationError::UnknownEvaluation(id.0.clone()))
    }

    fn evaluator(&self, id: &EmployeeId) -> Result<Employee, EvaluationError> {
        let employee = self
            .organization
            .employee(id)?
            .ok_or_else(|| EvaluationError::UnknownEvaluator(id.0.clone()))?;
        if !employee.is_active {
            return Err(EvaluationError::NotPermitted(id.0.clone()));
        }
        Ok(employee)
    }
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("at least one criterion score is required")]
    NoCriteria,
    #[error("evaluation period start {start} is after its end {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
    #[error("evaluations must be submitted as draft or submitted")]
    ApprovedOnSubmission,
    #[error("score {score} for criterion {criterion} exceeds 100")]
    ScoreOutOfRange { criterion: String, score: u8 },
    #[error("criterion {0} was scored more than once")]
    DuplicateCriterion(String),
    #[error("criterion {0} not found")]
    UnknownCriterion(String),
    #[error("criterion {0} is disabled")]
    InactiveCriterion(String),
    #[error("criterion {criterion} does not apply to employee {employee}'s department")]
    CriterionOutOfScope { criterion: String, employee: String },
    #[error("active criterion {0} was left unscored")]
    MissingCriterion(String),
    #[error("employee {0} not found")]
    UnknownEmployee(String),
    #[error("evaluator {0} not found")]
    UnknownEvaluator(String),
    #[error("evaluation {0} not found")]
    UnknownEvaluation(String),
    #[error("employee {0} is not permitted to perform this evaluation action")]
    NotPermitted(String),
    #[error("cannot move evaluation from {} to {}", .from.label(), .to.label())]
    InvalidTransition {
        from: EvaluationStatus,
        to: EvaluationStatus,
    },
    #[error("evaluation {0} is approved and cannot be deleted")]
    ApprovedLocked(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
