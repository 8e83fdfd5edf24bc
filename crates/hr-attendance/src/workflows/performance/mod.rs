//! Weighted evaluation scoring and the draft, submitted, approved lifecycle.

pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

pub use domain::{
    CriterionId, CriterionScore, Evaluation, EvaluationCriterion, EvaluationDetail,
    EvaluationDetailId, EvaluationId, EvaluationStatus, EvaluationSubmission,
};
pub use repository::EvaluationRepository;
pub use router::evaluation_router;
pub use scoring::{overall_score, ScoreBand, WeightedScore};
pub use service::{EvaluationError, EvaluationService, EvaluationView};
