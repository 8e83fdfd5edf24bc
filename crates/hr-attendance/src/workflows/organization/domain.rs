use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::attendance::clock;
use crate::workflows::attendance::domain::ShiftType;

/// Identifier wrapper for departments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DepartmentId(pub String);

/// Identifier wrapper for employees (managers and supervisors included).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub role: Role,
    pub employee_number: String,
    pub hire_date: NaiveDate,
    pub is_active: bool,
}

impl Employee {
    pub fn belongs_to(&self, department: &DepartmentId) -> bool {
        self.department_id.as_ref() == Some(department)
    }
}

/// Access level carried by an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Manager,
    Supervisor,
    Employee,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Supervisor => "supervisor",
            Role::Employee => "employee",
        }
    }

    /// Supervisor check-in/out on behalf of another employee.
    pub const fn can_record_for_others(self) -> bool {
        matches!(self, Role::Manager | Role::Supervisor)
    }

    pub const fn can_evaluate(self) -> bool {
        matches!(self, Role::Manager | Role::Supervisor)
    }

    pub const fn can_approve_evaluations(self) -> bool {
        matches!(self, Role::Manager)
    }
}

/// Manager form payload for creating or editing a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Manager form payload for creating or editing an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    pub role: Role,
    pub employee_number: String,
    pub hire_date: NaiveDate,
}

/// Manager form payload for creating or editing a work shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDraft {
    pub name: String,
    #[serde(with = "clock")]
    pub start_time: chrono::NaiveTime,
    #[serde(with = "clock")]
    pub end_time: chrono::NaiveTime,
    pub shift_type: ShiftType,
    #[serde(default)]
    pub grace_period_minutes: u32,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
}

/// Manager form payload for creating or editing an evaluation criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub weight: f64,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
}
