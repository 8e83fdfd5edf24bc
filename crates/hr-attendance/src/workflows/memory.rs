use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use super::attendance::domain::{AttendanceId, AttendanceRecord, ShiftId, WorkShift};
use super::attendance::repository::AttendanceRepository;
use super::organization::domain::{Department, DepartmentId, Employee, EmployeeId};
use super::organization::repository::OrganizationRepository;
use super::performance::domain::{
    CriterionId, Evaluation, EvaluationCriterion, EvaluationDetail, EvaluationId,
};
use super::performance::repository::EvaluationRepository;
use super::repository::RepositoryError;

#[derive(Default)]
struct WorkforceTables {
    departments: HashMap<DepartmentId, Department>,
    employees: HashMap<EmployeeId, Employee>,
    shifts: HashMap<ShiftId, WorkShift>,
    criteria: HashMap<CriterionId, EvaluationCriterion>,
    attendance: HashMap<AttendanceId, AttendanceRecord>,
    evaluations: HashMap<EvaluationId, Evaluation>,
    details: HashMap<EvaluationId, Vec<EvaluationDetail>>,
}

/// Process-local store backing every repository trait.
///
/// Clones share the same tables, so one store can be handed to each service.
#[derive(Default, Clone)]
pub struct InMemoryWorkforceStore {
    tables: Arc<Mutex<WorkforceTables>>,
}

impl InMemoryWorkforceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tables<T>(&self, f: impl FnOnce(&mut WorkforceTables) -> T) -> T {
        let mut guard = self.tables.lock().expect("workforce store mutex poisoned");
        f(&mut guard)
    }
}

fn sorted_by_key<K: Ord, V: Clone>(values: impl Iterator<Item = V>, key: impl Fn(&V) -> K) -> Vec<V> {
    let mut collected: Vec<V> = values.collect();
    collected.sort_by_key(|value| key(value));
    collected
}

impl AttendanceRepository for InMemoryWorkforceStore {
    fn insert(&self, record: AttendanceRecord) -> Result<AttendanceRecord, RepositoryError> {
        self.with_tables(|tables| {
            let duplicate_day = tables
                .attendance
                .values()
                .any(|existing| existing.employee_id == record.employee_id && existing.date == record.date);
            if duplicate_day || tables.attendance.contains_key(&record.id) {
                return Err(RepositoryError::Conflict);
            }
            tables.attendance.insert(record.id.clone(), record.clone());
            Ok(record)
        })
    }

    fn update(&self, record: AttendanceRecord) -> Result<(), RepositoryError> {
        self.with_tables(|tables| match tables.attendance.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        })
    }

    fn fetch(&self, id: &AttendanceId) -> Result<Option<AttendanceRecord>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.attendance.get(id).cloned()))
    }

    fn for_employee_on(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepositoryError> {
        Ok(self.with_tables(|tables| {
            tables
                .attendance
                .values()
                .find(|record| &record.employee_id == employee_id && record.date == date)
                .cloned()
        }))
    }

    fn between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, RepositoryError> {
        Ok(self.with_tables(|tables| {
            sorted_by_key(
                tables
                    .attendance
                    .values()
                    .filter(|record| record.falls_within(start, end))
                    .cloned(),
                |record| (record.date, record.id.clone()),
            )
        }))
    }
}

impl EvaluationRepository for InMemoryWorkforceStore {
    fn insert(
        &self,
        evaluation: Evaluation,
        details: Vec<EvaluationDetail>,
    ) -> Result<Evaluation, RepositoryError> {
        self.with_tables(|tables| {
            if tables.evaluations.contains_key(&evaluation.id) {
                return Err(RepositoryError::Conflict);
            }
            tables.details.insert(evaluation.id.clone(), details);
            tables
                .evaluations
                .insert(evaluation.id.clone(), evaluation.clone());
            Ok(evaluation)
        })
    }

    fn update(&self, evaluation: Evaluation) -> Result<(), RepositoryError> {
        self.with_tables(|tables| match tables.evaluations.get_mut(&evaluation.id) {
            Some(slot) => {
                *slot = evaluation;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        })
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.evaluations.get(id).cloned()))
    }

    fn details(&self, id: &EvaluationId) -> Result<Vec<EvaluationDetail>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.details.get(id).cloned().unwrap_or_default()))
    }

    fn delete(&self, id: &EvaluationId) -> Result<(), RepositoryError> {
        self.with_tables(|tables| {
            tables.details.remove(id);
            tables
                .evaluations
                .remove(id)
                .map(|_| ())
                .ok_or(RepositoryError::NotFound)
        })
    }

    fn dated_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Evaluation>, RepositoryError> {
        Ok(self.with_tables(|tables| {
            sorted_by_key(
                tables
                    .evaluations
                    .values()
                    .filter(|evaluation| {
                        evaluation.evaluation_date >= start && evaluation.evaluation_date <= end
                    })
                    .cloned(),
                |evaluation| (evaluation.evaluation_date, evaluation.id.clone()),
            )
        }))
    }
}

impl OrganizationRepository for InMemoryWorkforceStore {
    fn department(&self, id: &DepartmentId) -> Result<Option<Department>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.departments.get(id).cloned()))
    }

    fn departments(&self) -> Result<Vec<Department>, RepositoryError> {
        Ok(self.with_tables(|tables| {
            sorted_by_key(tables.departments.values().cloned(), |department| {
                department.id.clone()
            })
        }))
    }

    fn save_department(&self, department: Department) -> Result<Department, RepositoryError> {
        self.with_tables(|tables| {
            tables
                .departments
                .insert(department.id.clone(), department.clone());
        });
        Ok(department)
    }

    fn employee(&self, id: &EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.employees.get(id).cloned()))
    }

    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(self.with_tables(|tables| {
            sorted_by_key(tables.employees.values().cloned(), |employee| employee.id.clone())
        }))
    }

    fn save_employee(&self, employee: Employee) -> Result<Employee, RepositoryError> {
        self.with_tables(|tables| {
            tables.employees.insert(employee.id.clone(), employee.clone());
        });
        Ok(employee)
    }

    fn remove_employee(&self, id: &EmployeeId) -> Result<(), RepositoryError> {
        self.with_tables(|tables| {
            tables
                .employees
                .remove(id)
                .map(|_| ())
                .ok_or(RepositoryError::NotFound)
        })
    }

    fn shift(&self, id: &ShiftId) -> Result<Option<WorkShift>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.shifts.get(id).cloned()))
    }

    fn shifts(&self) -> Result<Vec<WorkShift>, RepositoryError> {
        Ok(self.with_tables(|tables| {
            sorted_by_key(tables.shifts.values().cloned(), |shift| shift.id.clone())
        }))
    }

    fn save_shift(&self, shift: WorkShift) -> Result<WorkShift, RepositoryError> {
        self.with_tables(|tables| {
            tables.shifts.insert(shift.id.clone(), shift.clone());
        });
        Ok(shift)
    }

    fn criterion(&self, id: &CriterionId) -> Result<Option<EvaluationCriterion>, RepositoryError> {
        Ok(self.with_tables(|tables| tables.criteria.get(id).cloned()))
    }

    fn criteria(&self) -> Result<Vec<EvaluationCriterion>, RepositoryError> {
        Ok(self.with_tables(|tables| {
            sorted_by_key(tables.criteria.values().cloned(), |criterion| {
                criterion.id.clone()
            })
        }))
    }

    fn save_criterion(
        &self,
        criterion: EvaluationCriterion,
    ) -> Result<EvaluationCriterion, RepositoryError> {
        self.with_tables(|tables| {
            tables.criteria.insert(criterion.id.clone(), criterion.clone());
        });
        Ok(criterion)
    }
}
