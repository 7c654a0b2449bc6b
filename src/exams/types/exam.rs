use crate::exams::scheduler::{PrintSlotAllocator, ScheduledJob};
use crate::exams::types::status::ExamStatus;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Deserialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperFormat {
    #[default]
    A3,
    A4
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperColor {
    #[default]
    Greyscale,
    Color
}

impl PaperFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperFormat::A3 => "A3",
            PaperFormat::A4 => "A4"
        }
    }
}

impl FromStr for PaperFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A3" => Ok(PaperFormat::A3),
            "A4" => Ok(PaperFormat::A4),
            _ => Err(format!("Unknown paper format `{}`", s))
        }
    }
}

impl PaperColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperColor::Greyscale => "greyscale",
            PaperColor::Color => "color"
        }
    }
}

impl FromStr for PaperColor {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greyscale" => Ok(PaperColor::Greyscale),
            "color" => Ok(PaperColor::Color),
            _ => Err(format!("Unknown paper color `{}`", s))
        }
    }
}

/// Person allowed to pick up the printed copies
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedPerson {
    pub id: String,
    pub email: String,
    pub name: String
}

/// A row of the crep table
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exam {
    pub id: i32,
    pub exam_code: String,
    pub exam_name: String,
    pub exam_date: NaiveDate,
    pub desired_date: Option<NaiveDate>,
    pub print_date: Option<NaiveDateTime>,
    pub exam_students: i32,
    pub exam_pages: i32,
    pub paper_format: PaperFormat,
    pub paper_color: PaperColor,
    pub need_scan: bool,
    pub financial_center: String,
    pub contact: String,
    pub authorized_persons: String,
    pub remark: Option<String>,
    pub repro_remark: Option<String>,
    pub status: ExamStatus,
    pub registered_by: String
}

/// An exam about to be inserted, before it has an id
#[derive(Clone, Debug)]
pub struct NewExam {
    pub exam_code: String,
    pub exam_name: String,
    pub exam_date: NaiveDate,
    pub desired_date: NaiveDate,
    pub exam_students: i32,
    pub exam_pages: i32,
    pub paper_format: PaperFormat,
    pub paper_color: PaperColor,
    pub need_scan: bool,
    pub financial_center: String,
    pub contact: String,
    pub authorized_persons: Vec<AuthorizedPerson>,
    pub remark: Option<String>,
    pub registered_by: String
}

/// Calendar entry for an exam holding a print slot
#[derive(Clone, Debug, Serialize)]
pub struct CalendarEvent {
    pub id: i32,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: ExamStatus,
    pub color: &'static str
}

impl Exam {
    pub fn scheduled_job(&self) -> Option<ScheduledJob> {
        Some(ScheduledJob {
            id: Some(self.id),
            student_count: self.exam_students.max(0) as u32,
            print_start: self.print_date?
        })
    }

    pub fn calendar_event(&self, allocator: &PrintSlotAllocator) -> Option<CalendarEvent> {
        let job = self.scheduled_job()?;
        Some(CalendarEvent {
            id: self.id,
            title: format!("{} - {}", self.exam_code, self.exam_name),
            start: job.print_start,
            end: allocator.print_end(&job),
            status: self.status,
            color: self.status.hex_color()
        })
    }
}
