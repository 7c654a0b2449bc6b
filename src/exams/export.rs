//! CSV export of exams for accounting

use crate::exams::types::exam::Exam;

use chrono::NaiveDate;
use std::collections::HashSet;

pub const CSV_HEADER: &str = "Date,Titre,Tirage,Nbre de pages";

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Exams matching either selection, each listed once, in order of first appearance
pub fn merge_unique(by_dates: Vec<Exam>, by_status: Vec<Exam>) -> Vec<Exam> {
    let mut seen = HashSet::new();
    by_dates.into_iter()
        .chain(by_status)
        .filter(|exam| seen.insert(exam.id))
        .collect()
}

pub fn exams_to_csv(exams: &[Exam]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for exam in exams {
        out.push_str(&format!("{},{},{},{}\n",
            exam.exam_date.format("%d/%m/%Y"),
            csv_field(&exam.exam_name),
            exam.exam_students,
            exam.exam_pages));
    }
    out
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("exported_exams_{}.csv", today.format("%Y-%m-%d"))
}
