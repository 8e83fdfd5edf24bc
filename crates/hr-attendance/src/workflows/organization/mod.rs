//! Departments, employees and the role rules that gate every other workflow.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    CriterionDraft, Department, DepartmentDraft, DepartmentId, Employee, EmployeeDraft,
    EmployeeId, Role, ShiftDraft,
};
pub use repository::OrganizationRepository;
pub use router::organization_router;
pub use service::{OrganizationError, OrganizationService};
