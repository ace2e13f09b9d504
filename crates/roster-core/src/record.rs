//! Records served by the HR list endpoints, and the identity trait that lets
//! a list view deduplicate them across pages.

use std::{fmt::Debug, hash::Hash};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

// ─── Identity ────────────────────────────────────────────────────────────────

/// An item with a stable identity key.
///
/// Two items with equal keys are the same record, whichever page they arrived
/// on.
pub trait Identified {
  type Key: Eq + Hash + Clone + Debug;

  fn identity(&self) -> Self::Key;
}

// ─── Employees ───────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmploymentStatus {
  Active,
  Probation,
  OnLeave,
  Terminated,
}

/// A directory entry, keyed by the HR employee number rather than a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
  pub employee_no: String,
  pub full_name:   String,
  pub department:  String,
  pub designation: String,
  pub status:      EmploymentStatus,
}

impl Identified for Employee {
  type Key = String;

  fn identity(&self) -> String { self.employee_no.clone() }
}

// ─── Attendance ──────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
  Present,
  Late,
  Absent,
  OnLeave,
}

/// One employee's attendance for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub id:            Uuid,
  pub employee_no:   String,
  pub employee_name: String,
  pub department:    String,
  pub date:          NaiveDate,
  pub status:        AttendanceStatus,
  pub check_in:      Option<NaiveTime>,
  pub check_out:     Option<NaiveTime>,
}

impl Identified for AttendanceRecord {
  type Key = Uuid;

  fn identity(&self) -> Uuid { self.id }
}

// ─── Onboarding ──────────────────────────────────────────────────────────────

/// Column of the onboarding board a step sits in.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OnboardingStage {
  Pending,
  InProgress,
  Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingStep {
  pub id:            Uuid,
  pub employee_no:   String,
  pub employee_name: String,
  pub title:         String,
  pub stage:         OnboardingStage,
  pub due_on:        Option<NaiveDate>,
}

impl Identified for OnboardingStep {
  type Key = Uuid;

  fn identity(&self) -> Uuid { self.id }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn status_round_trips_through_strum_and_serde() {
    assert_eq!(EmploymentStatus::OnLeave.to_string(), "on_leave");
    assert_eq!(
      EmploymentStatus::from_str("probation").unwrap(),
      EmploymentStatus::Probation
    );
    let json = serde_json::to_string(&OnboardingStage::InProgress).unwrap();
    assert_eq!(json, "\"in_progress\"");
  }

  #[test]
  fn employee_identity_is_employee_no() {
    let e = Employee {
      employee_no: "EMP-0042".into(),
      full_name:   "Ada Byron".into(),
      department:  "Engineering".into(),
      designation: "Analyst".into(),
      status:      EmploymentStatus::Active,
    };
    assert_eq!(e.identity(), "EMP-0042");
  }
}
