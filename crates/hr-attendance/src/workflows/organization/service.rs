use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::domain::{
    CriterionDraft, Department, DepartmentDraft, DepartmentId, Employee, EmployeeDraft,
    EmployeeId, ShiftDraft,
};
use super::repository::OrganizationRepository;
use crate::workflows::attendance::domain::{ShiftId, WorkShift};
use crate::workflows::performance::domain::{CriterionId, EvaluationCriterion};
use crate::workflows::repository::RepositoryError;

/// Manager-facing maintenance of departments, staff, shifts and evaluation criteria.
pub struct OrganizationService<O> {
    repository: Arc<O>,
    sequence: AtomicU64,
}

impl<O> OrganizationService<O>
where
    O: OrganizationRepository + 'static,
{
    pub fn new(repository: Arc<O>) -> Self {
        Self {
            repository,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-{id:06}")
    }

    pub fn create_department(&self, draft: DepartmentDraft) -> Result<Department, OrganizationError> {
        let id = DepartmentId(self.next_id("dept"));
        self.save_department(id, draft)
    }

    pub fn update_department(
        &self,
        id: &DepartmentId,
        draft: DepartmentDraft,
    ) -> Result<Department, OrganizationError> {
        self.department(id)?;
        self.save_department(id.clone(), draft)
    }

    pub fn create_employee(&self, draft: EmployeeDraft) -> Result<Employee, OrganizationError> {
        let id = EmployeeId(self.next_id("emp"));
        self.save_employee(id, draft, true)
    }

    pub fn update_employee(
        &self,
        id: &EmployeeId,
        draft: EmployeeDraft,
    ) -> Result<Employee, OrganizationError> {
        let existing = self.employee(id)?;
        self.save_employee(id.clone(), draft, existing.is_active)
    }

    /// Normal removal path: the employee disappears from rosters but keeps their history.
    pub fn deactivate_employee(&self, id: &EmployeeId) -> Result<Employee, OrganizationError> {
        let mut employee = self.employee(id)?;
        employee.is_active = false;
        let saved = self.repository.save_employee(employee)?;
        info!(employee = %id.0, "employee deactivated");
        Ok(saved)
    }

    pub fn delete_employee(&self, id: &EmployeeId) -> Result<(), OrganizationError> {
        self.employee(id)?;
        self.repository.remove_employee(id)?;
        info!(employee = %id.0, "employee deleted");
        Ok(())
    }

    pub fn create_shift(&self, draft: ShiftDraft) -> Result<WorkShift, OrganizationError> {
        let id = ShiftId(self.next_id("shift"));
        self.save_shift(id, draft, true)
    }

    pub fn update_shift(&self, id: &ShiftId, draft: ShiftDraft) -> Result<WorkShift, OrganizationError> {
        let existing = self.shift(id)?;
        self.save_shift(id.clone(), draft, existing.is_active)
    }

    /// Disabling hides the shift from new check-ins; existing records keep referencing it.
    pub fn set_shift_active(&self, id: &ShiftId, active: bool) -> Result<WorkShift, OrganizationError> {
        let mut shift = self.shift(id)?;
        shift.is_active = active;
        let saved = self.repository.save_shift(shift)?;
        info!(shift = %id.0, active, "shift availability changed");
        Ok(saved)
    }

    /// Active shifts offered on the check-in form, earliest start first.
    pub fn selectable_shifts(
        &self,
        department: Option<&DepartmentId>,
    ) -> Result<Vec<WorkShift>, OrganizationError> {
        let mut shifts: Vec<WorkShift> = self
            .repository
            .shifts()?
            .into_iter()
            .filter(|shift| shift.is_selectable_for(department))
            .collect();
        shifts.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.name.cmp(&b.name)));
        Ok(shifts)
    }

    pub fn create_criterion(
        &self,
        draft: CriterionDraft,
    ) -> Result<EvaluationCriterion, OrganizationError> {
        let id = CriterionId(self.next_id("crit"));
        self.save_criterion(id, draft, true)
    }

    pub fn update_criterion(
        &self,
        id: &CriterionId,
        draft: CriterionDraft,
    ) -> Result<EvaluationCriterion, OrganizationError> {
        let existing = self
            .repository
            .criterion(id)?
            .ok_or_else(|| OrganizationError::UnknownCriterion(id.0.clone()))?;
        self.save_criterion(id.clone(), draft, existing.is_active)
    }

    /// Active criteria applicable to a department, sorted by name like the evaluation form.
    pub fn active_criteria(
        &self,
        department: Option<&DepartmentId>,
    ) -> Result<Vec<EvaluationCriterion>, OrganizationError> {
        let mut criteria: Vec<EvaluationCriterion> = self
            .repository
            .criteria()?
            .into_iter()
            .filter(|criterion| criterion.is_active && criterion.applies_to(department))
            .collect();
        criteria.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(criteria)
    }

    /// Sum of active weights for the scope. Expected to be 100, reported rather than enforced.
    pub fn criteria_weight_total(
        &self,
        department: Option<&DepartmentId>,
    ) -> Result<f64, OrganizationError> {
        Ok(self
            .active_criteria(department)?
            .iter()
            .map(|criterion| criterion.weight)
            .sum())
    }

    fn save_department(
        &self,
        id: DepartmentId,
        draft: DepartmentDraft,
    ) -> Result<Department, OrganizationError> {
        let name = required("name", draft.name)?;
        let department = Department {
            id,
            name,
            description: optional(draft.description),
        };
        Ok(self.repository.save_department(department)?)
    }

    fn save_employee(
        &self,
        id: EmployeeId,
        draft: EmployeeDraft,
        is_active: bool,
    ) -> Result<Employee, OrganizationError> {
        let full_name = required("full_name", draft.full_name)?;
        let email = required("email", draft.email)?;
        let employee_number = required("employee_number", draft.employee_number)?;

        if let Some(department_id) = &draft.department_id {
            self.department(department_id)?;
        }

        let taken = self.repository.employees()?.into_iter().any(|employee| {
            employee.id != id && employee.employee_number.eq_ignore_ascii_case(&employee_number)
        });
        if taken {
            return Err(OrganizationError::DuplicateEmployeeNumber(employee_number));
        }

        let employee = Employee {
            id,
            full_name,
            email,
            phone: optional(draft.phone),
            department_id: draft.department_id,
            role: draft.role,
            employee_number,
            hire_date: draft.hire_date,
            is_active,
        };
        let saved = self.repository.save_employee(employee)?;
        info!(employee = %saved.id.0, role = saved.role.label(), "employee saved");
        Ok(saved)
    }

    fn save_shift(
        &self,
        id: ShiftId,
        draft: ShiftDraft,
        is_active: bool,
    ) -> Result<WorkShift, OrganizationError> {
        let name = required("name", draft.name)?;
        if let Some(department_id) = &draft.department_id {
            self.department(department_id)?;
        }

        let shift = WorkShift {
            id,
            name,
            start_time: draft.start_time,
            end_time: draft.end_time,
            shift_type: draft.shift_type,
            grace_period_minutes: draft.grace_period_minutes,
            department_id: draft.department_id,
            is_active,
        };
        Ok(self.repository.save_shift(shift)?)
    }

    fn save_criterion(
        &self,
        id: CriterionId,
        draft: CriterionDraft,
        is_active: bool,
    ) -> Result<EvaluationCriterion, OrganizationError> {
        let name = required("name", draft.name)?;
        if !(draft.weight.is_finite() && (0.0..=100.0).contains(&draft.weight)) {
            return Err(OrganizationError::InvalidWeight(draft.weight));
        }
        if let Some(department_id) = &draft.department_id {
            self.department(department_id)?;
        }

        let criterion = EvaluationCriterion {
            id,
            name,
            description: optional(draft.description),
            weight: draft.weight,
            department_id: draft.department_id,
            is_active,
        };
        Ok(self.repository.save_criterion(criterion)?)
    }

    fn department(&self, id: &DepartmentId) -> Result<Department, OrganizationError> {
        self.repository
            .department(id)?
            .ok_or_else(|| OrganizationError::UnknownDepartment(id.0.clone()))
    }

    fn employee(&self, id: &EmployeeId) -> Result<Employee, OrganizationError> {
        self.repository
            .employee(id)?
            .ok_or_else(|| OrganizationError::UnknownEmployee(id.0.clone()))
    }

    fn shift(&self, id: &ShiftId) -> Result<WorkShift, OrganizationError> {
        self.repository
            .shift(id)?
            .ok_or_else(|| OrganizationError::UnknownShift(id.0.clone()))
    }
}

fn required(field: &'static str, value: String) -> Result<String, OrganizationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OrganizationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Error raised while maintaining organisation records.
#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("employee number {0} is already in use")]
    DuplicateEmployeeNumber(String),
    #[error("criterion weight {0} must be between 0 and 100")]
    InvalidWeight(f64),
    #[error("department {0} not found")]
    UnknownDepartment(String),
    #[error("employee {0} not found")]
    UnknownEmployee(String),
    #[error("shift {0} not found")]
    UnknownShift(String),
    #[error("criterion {0} not found")]
    UnknownCriterion(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
