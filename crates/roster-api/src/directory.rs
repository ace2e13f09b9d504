//! In-memory HR collections behind the list endpoints.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveTime};
use roster_core::record::{
  AttendanceRecord,
  AttendanceStatus,
  Employee,
  EmploymentStatus,
  OnboardingStage,
  OnboardingStep,
};
use tokio::sync::RwLock;
use uuid::Uuid;

const DEPARTMENTS: [&str; 5] =
  ["Engineering", "Finance", "People Ops", "Sales", "Support"];

const GIVEN: [&str; 12] = [
  "Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Frances", "Ken",
  "Margaret", "Niklaus", "Radia", "Tony",
];

const FAMILY: [&str; 10] = [
  "Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth", "Allen",
  "Thompson", "Hamilton", "Wirth",
];

const DESIGNATIONS: [&str; 4] = ["Associate", "Analyst", "Lead", "Manager"];

const ONBOARDING_TASKS: [&str; 4] = [
  "Sign contract",
  "Collect equipment",
  "Benefits enrolment",
  "Meet your buddy",
];

/// Days of attendance generated per employee.
const ATTENDANCE_DAYS: i64 = 5;

/// All data served by the API. Rows are kept in insertion order, which is the
/// order pages are cut from.
#[derive(Debug, Default)]
pub struct Directory {
  employees:  RwLock<Vec<Employee>>,
  attendance: RwLock<Vec<AttendanceRecord>>,
  onboarding: RwLock<Vec<OnboardingStep>>,
}

impl Directory {
  pub fn new(
    employees: Vec<Employee>,
    attendance: Vec<AttendanceRecord>,
    onboarding: Vec<OnboardingStep>,
  ) -> Self {
    Self {
      employees:  RwLock::new(employees),
      attendance: RwLock::new(attendance),
      onboarding: RwLock::new(onboarding),
    }
  }

  /// A deterministic demo directory of `size` employees, with attendance for
  /// the five days ending `today` and onboarding steps for everyone on
  /// probation.
  pub fn demo(size: usize, today: NaiveDate) -> Self {
    let employees: Vec<Employee> = (0..size).map(demo_employee).collect();

    let mut attendance = Vec::with_capacity(size * ATTENDANCE_DAYS as usize);
    for day in 0..ATTENDANCE_DAYS {
      let date = today - Duration::days(day);
      for (i, e) in employees.iter().enumerate() {
        attendance.push(demo_attendance(e, date, i + day as usize));
      }
    }

    let onboarding = employees
      .iter()
      .filter(|e| e.status == EmploymentStatus::Probation)
      .flat_map(|e| {
        ONBOARDING_TASKS
          .iter()
          .enumerate()
          .map(move |(n, title)| OnboardingStep {
            id:            Uuid::new_v4(),
            employee_no:   e.employee_no.clone(),
            employee_name: e.full_name.clone(),
            title:         (*title).to_string(),
            stage:         match n {
              0 => OnboardingStage::Completed,
              1 => OnboardingStage::InProgress,
              _ => OnboardingStage::Pending,
            },
            due_on:        Some(today + Duration::days(n as i64 * 7)),
          })
      })
      .collect();

    Self::new(employees, attendance, onboarding)
  }

  pub async fn employees(&self) -> Vec<Employee> { self.employees.read().await.clone() }

  pub async fn employee(&self, employee_no: &str) -> Option<Employee> {
    self
      .employees
      .read()
      .await
      .iter()
      .find(|e| e.employee_no == employee_no)
      .cloned()
  }

  pub async fn attendance(&self) -> Vec<AttendanceRecord> {
    self.attendance.read().await.clone()
  }

  pub async fn onboarding(&self) -> Vec<OnboardingStep> {
    self.onboarding.read().await.clone()
  }

  /// Distinct departments, sorted.
  pub async fn departments(&self) -> Vec<String> {
    self
      .employees
      .read()
      .await
      .iter()
      .map(|e| e.department.clone())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect()
  }

  /// Remove an employee and everything recorded against them. Returns
  /// whether the employee existed.
  pub async fn remove_employee(&self, employee_no: &str) -> bool {
    let mut employees = self.employees.write().await;
    let before = employees.len();
    employees.retain(|e| e.employee_no != employee_no);
    let removed = employees.len() != before;
    drop(employees);

    self
      .attendance
      .write()
      .await
      .retain(|a| a.employee_no != employee_no);
    self
      .onboarding
      .write()
      .await
      .retain(|s| s.employee_no != employee_no);
    removed
  }
}

fn demo_employee(i: usize) -> Employee {
  let given = GIVEN[i % GIVEN.len()];
  let family = FAMILY[(i / GIVEN.len()) % FAMILY.len()];
  Employee {
    employee_no: format!("EMP-{:04}", i + 1),
    full_name:   format!("{given} {family}"),
    department:  DEPARTMENTS[i % DEPARTMENTS.len()].to_string(),
    designation: DESIGNATIONS[i % DESIGNATIONS.len()].to_string(),
    status:      match i % 10 {
      0 | 5 => EmploymentStatus::Probation,
      7 => EmploymentStatus::OnLeave,
      9 => EmploymentStatus::Terminated,
      _ => EmploymentStatus::Active,
    },
  }
}

fn demo_attendance(e: &Employee, date: NaiveDate, salt: usize) -> AttendanceRecord {
  let (status, check_in) = match salt % 8 {
    0 => (AttendanceStatus::Absent, None),
    3 => (AttendanceStatus::Late, NaiveTime::from_hms_opt(10, 5, 0)),
    6 if e.status == EmploymentStatus::OnLeave => (AttendanceStatus::OnLeave, None),
    _ => (AttendanceStatus::Present, NaiveTime::from_hms_opt(9, 0, 0)),
  };
  AttendanceRecord {
    id: Uuid::new_v4(),
    employee_no: e.employee_no.clone(),
    employee_name: e.full_name.clone(),
    department: e.department.clone(),
    date,
    status,
    check_in,
    check_out: check_in.and_then(|_| NaiveTime::from_hms_opt(17, 30, 0)),
  }
}
