use chrono::NaiveDate;

use super::domain::{Evaluation, EvaluationDetail, EvaluationId};
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for evaluations and their per-criterion details.
pub trait EvaluationRepository: Send + Sync {
    /// Persist an evaluation together with its details in one step.
    fn insert(
        &self,
        evaluation: Evaluation,
        details: Vec<EvaluationDetail>,
    ) -> Result<Evaluation, RepositoryError>;
    fn update(&self, evaluation: Evaluation) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError>;
    fn details(&self, id: &EvaluationId) -> Result<Vec<EvaluationDetail>, RepositoryError>;
    /// Removes the evaluation and its details.
    fn delete(&self, id: &EvaluationId) -> Result<(), RepositoryError>;
    /// Evaluations whose evaluation date falls inside `start..=end`.
    fn dated_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Evaluation>, RepositoryError>;
}
