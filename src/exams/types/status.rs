//! Exam status pipeline. Values are stored as text and match what the
//! calendar UI sends.

use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamStatus {
    #[serde(rename = "registered")] Registered,
    #[serde(rename = "toPrint")] ToPrint,
    #[serde(rename = "printing")] Printing,
    #[serde(rename = "finished")] Finished,
    #[serde(rename = "delivered")] Delivered,
    #[serde(rename = "canceled")] Canceled,
    #[serde(rename = "prep_teach")] PrepTeach,
    #[serde(rename = "prep_2compile")] PrepToCompile,
    #[serde(rename = "prep_2check")] PrepToCheck,
    #[serde(rename = "pick_up")] PickUp,
    #[serde(rename = "picked_up")] PickedUp,
    #[serde(rename = "wait_scan")] WaitScan,
    #[serde(rename = "rep_cut")] RepCut,
    #[serde(rename = "2scan")] ToScan,
    #[serde(rename = "scanned")] Scanned,
    #[serde(rename = "wait_teach")] WaitTeach,
    #[serde(rename = "to_contact")] ToContact
}

/// Display information sent to the UI alongside a status
#[derive(Clone, Serialize)]
pub struct StatusInfo {
    pub value: ExamStatus,
    pub label: &'static str,
    pub hex_color: &'static str,
    pub needs_admin: bool
}

impl ExamStatus {
    pub const ALL: [ExamStatus; 17] = [
        ExamStatus::Registered, ExamStatus::ToPrint, ExamStatus::Printing, ExamStatus::Finished,
        ExamStatus::Delivered, ExamStatus::Canceled, ExamStatus::PrepTeach, ExamStatus::PrepToCompile,
        ExamStatus::PrepToCheck, ExamStatus::PickUp, ExamStatus::PickedUp, ExamStatus::WaitScan,
        ExamStatus::RepCut, ExamStatus::ToScan, ExamStatus::Scanned, ExamStatus::WaitTeach,
        ExamStatus::ToContact
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExamStatus::Registered => "registered",
            ExamStatus::ToPrint => "toPrint",
            ExamStatus::Printing => "printing",
            ExamStatus::Finished => "finished",
            ExamStatus::Delivered => "delivered",
            ExamStatus::Canceled => "canceled",
            ExamStatus::PrepTeach => "prep_teach",
            ExamStatus::PrepToCompile => "prep_2compile",
            ExamStatus::PrepToCheck => "prep_2check",
            ExamStatus::PickUp => "pick_up",
            ExamStatus::PickedUp => "picked_up",
            ExamStatus::WaitScan => "wait_scan",
            ExamStatus::RepCut => "rep_cut",
            ExamStatus::ToScan => "2scan",
            ExamStatus::Scanned => "scanned",
            ExamStatus::WaitTeach => "wait_teach",
            ExamStatus::ToContact => "to_contact"
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExamStatus::Registered => "Registered",
            ExamStatus::ToPrint => "To Print",
            ExamStatus::Printing => "Printing",
            ExamStatus::Finished => "Finished",
            ExamStatus::Delivered => "Delivered",
            ExamStatus::Canceled => "Canceled",
            ExamStatus::PrepTeach => "Prep-Teach",
            ExamStatus::PrepToCompile => "Prep-2compile",
            ExamStatus::PrepToCheck => "Prep-2check",
            ExamStatus::PickUp => "Pick-up",
            ExamStatus::PickedUp => "Picked-up",
            ExamStatus::WaitScan => "Wait-Scan",
            ExamStatus::RepCut => "Rep-Cut",
            ExamStatus::ToScan => "2Scan",
            ExamStatus::Scanned => "Scanned",
            ExamStatus::WaitTeach => "Wait-Teach",
            ExamStatus::ToContact => "To-Contact"
        }
    }

    pub fn hex_color(&self) -> &'static str {
        match self {
            ExamStatus::Registered => "#3b82f6",
            ExamStatus::ToPrint => "#eab308",
            ExamStatus::Printing => "#22c55e",
            ExamStatus::Finished => "#ef4444",
            ExamStatus::Delivered => "#8b5cf6",
            _ => "#020617"
        }
    }

    pub fn needs_admin(&self) -> bool {
        !matches!(self, ExamStatus::ToPrint | ExamStatus::Printing | ExamStatus::Finished | ExamStatus::Delivered)
    }

    pub fn info(&self) -> StatusInfo {
        StatusInfo {
            value: *self,
            label: self.label(),
            hex_color: self.hex_color(),
            needs_admin: self.needs_admin()
        }
    }

    /// Statuses a user may see and set
    pub fn allowed(is_admin: bool) -> Vec<ExamStatus> {
        ExamStatus::ALL.iter()
            .copied()
            .filter(|status| is_admin || !status.needs_admin())
            .collect()
    }

    /// Statuses shown on the calendar of non-admin staff
    pub fn staff_visible() -> [ExamStatus; 3] {
        [ExamStatus::ToPrint, ExamStatus::Printing, ExamStatus::Finished]
    }
}

impl fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExamStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExamStatus::ALL.iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown exam status `{}`", s))
    }
}
