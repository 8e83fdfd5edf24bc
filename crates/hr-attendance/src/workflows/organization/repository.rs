use super::domain::{Department, DepartmentId, Employee, EmployeeId};
use crate::workflows::attendance::domain::{ShiftId, WorkShift};
use crate::workflows::performance::domain::{CriterionId, EvaluationCriterion};
use crate::workflows::repository::RepositoryError;

/// Reference data every workflow reads: departments, staff, shifts and evaluation criteria.
///
/// `save_*` methods upsert by identifier.
pub trait OrganizationRepository: Send + Sync {
    fn department(&self, id: &DepartmentId) -> Result<Option<Department>, RepositoryError>;
    fn departments(&self) -> Result<Vec<Department>, RepositoryError>;
    fn save_department(&self, department: Department) -> Result<Department, RepositoryError>;

    fn employee(&self, id: &EmployeeId) -> Result<Option<Employee>, RepositoryError>;
    fn employees(&self) -> Result<Vec<Employee>, RepositoryError>;
    fn save_employee(&self, employee: Employee) -> Result<Employee, RepositoryError>;
    fn remove_employee(&self, id: &EmployeeId) -> Result<(), RepositoryError>;

    fn shift(&self, id: &ShiftId) -> Result<Option<WorkShift>, RepositoryError>;
    fn shifts(&self) -> Result<Vec<WorkShift>, RepositoryError>;
    fn save_shift(&self, shift: WorkShift) -> Result<WorkShift, RepositoryError>;

    fn criterion(&self, id: &CriterionId) -> Result<Option<EvaluationCriterion>, RepositoryError>;
    fn criteria(&self) -> Result<Vec<EvaluationCriterion>, RepositoryError>;
    fn save_criterion(
        &self,
        criterion: EvaluationCriterion,
    ) -> Result<EvaluationCriterion, RepositoryError>;
}
