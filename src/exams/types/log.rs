use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Deserialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    Insert,
    Update,
    Delete
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::Insert => "insert",
            LogAction::Update => "update",
            LogAction::Delete => "delete"
        }
    }

    pub fn from_db(s: &str) -> LogAction {
        match s {
            "insert" => LogAction::Insert,
            "delete" => LogAction::Delete,
            _ => LogAction::Update
        }
    }
}

/// Notification shown to the person who registered an exam
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExamLog {
    pub id: i32,
    pub exam_id: i32,
    pub action: LogAction,
    pub contact: String,
    pub date_time: NaiveDateTime,
    pub delivery_date: Option<NaiveDate>,
    pub exam_date: NaiveDate,
    pub exam_name: String,
    pub exam_code: String,
    pub is_read: bool,
    pub read_at: Option<NaiveDateTime>
}
