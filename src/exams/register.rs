//! Registration of a new exam print job: validating the submitted form and
//! resolving the people it names. Slot allocation and persistence happen in
//! the Postgres handler so they share one transaction.

use crate::directory::client::DirectoryClient;
use crate::exams::types::exam::{AuthorizedPerson, NewExam, PaperColor, PaperFormat};
use crate::shared::util::calendar::{needs_attention, suggested_delivery_date, business_days_between};

use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct CourseChoice {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>
}

fn default_true() -> bool { true }

#[derive(Clone, Debug, Deserialize)]
pub struct RegisterExamForm {
    pub course: Option<CourseChoice>,
    pub exam_date: NaiveDate,
    pub desired_date: Option<NaiveDate>,
    pub nb_students: i32,
    pub nb_pages: i32,
    #[serde(default)]
    pub paper_format: PaperFormat,
    #[serde(default)]
    pub paper_color: PaperColor,
    #[serde(default = "default_true")]
    pub need_scan: bool,
    pub financial_center: String,
    pub contact: String,
    #[serde(default)]
    pub authorized_persons: Vec<String>,
    pub remark: Option<String>,
    #[serde(default)]
    pub acknowledge_short_lead_time: bool
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("{0}")]
    Validation(String),
    #[error("There must be at least {required} business days between the desired delivery date and the exam date (got {business_days})")]
    ShortLeadTime { business_days: u32, required: u32 }
}

/// Form fields that survived validation, with defaults filled in
#[derive(Clone, Debug)]
pub struct ValidatedForm {
    pub course: CourseChoice,
    pub desired_date: NaiveDate,
    pub needs_attention: bool
}

/// People named on the form, as they will be stored
#[derive(Clone, Debug)]
pub struct ResolvedPeople {
    pub contact: String,
    pub contact_lastname: String,
    pub authorized_persons: Vec<AuthorizedPerson>
}

pub const MAX_FINANCIAL_CENTER_LENGTH: usize = 8;

pub fn validate(form: &RegisterExamForm, min_lead_days: u32) -> Result<ValidatedForm, RegisterError> {
    let invalid = |msg: &str| Err(RegisterError::Validation(msg.to_string()));

    let course = match &form.course {
        Some(course) if !course.code.trim().is_empty() && !course.name.trim().is_empty() => course.clone(),
        _ => return invalid("Please select a course.")
    };
    if form.nb_students < 1 {
        return invalid("Number of copies must be at least 1.");
    }
    if form.nb_pages < 1 {
        return invalid("Pages per copy must be at least 1.");
    }

    let financial_center = form.financial_center.trim();
    if financial_center.is_empty() || financial_center.chars().count() > MAX_FINANCIAL_CENTER_LENGTH {
        return invalid("Financial center is required and must be at most 8 characters.");
    }
    if form.contact.trim().is_empty() {
        return invalid("Please select a contact.");
    }

    let desired_date = form.desired_date
        .unwrap_or_else(|| suggested_delivery_date(form.exam_date, min_lead_days));
    if desired_date > form.exam_date {
        return invalid("Desired delivery date cannot be later than the exam date.");
    }

    let needs_attention = needs_attention(desired_date, form.exam_date, min_lead_days);
    if needs_attention && !form.acknowledge_short_lead_time {
        return Err(RegisterError::ShortLeadTime {
            business_days: business_days_between(desired_date, form.exam_date),
            required: min_lead_days
        });
    }

    Ok(ValidatedForm { course, desired_date, needs_attention })
}

/// Looks the contact and authorized persons up in the directory. Scipers are
/// kept as-is when the directory is disabled or unreachable.
pub async fn resolve_people(form: &RegisterExamForm, directory: &DirectoryClient) -> ResolvedPeople {
    let contact_sciper = form.contact.trim();
    let mut people = ResolvedPeople {
        contact: contact_sciper.to_string(),
        contact_lastname: contact_sciper.to_string(),
        authorized_persons: form.authorized_persons.iter()
            .map(|id| AuthorizedPerson { id: id.clone(), email: String::new(), name: String::new() })
            .collect()
    };
    if !directory.enabled() {
        return people;
    }

    match directory.person_by_sciper(contact_sciper).await {
        Ok(person) => {
            people.contact = person.contact_label();
            people.contact_lastname = person.lastname.clone();
        },
        Err(err) => log::warn!("Could not resolve contact {}: {}", contact_sciper, err)
    }

    match directory.persons_by_scipers(&form.authorized_persons).await {
        Ok(persons) => {
            people.authorized_persons = persons.iter().map(|p| p.authorized_person()).collect();
        },
        Err(err) => log::warn!("Could not resolve authorized persons: {}", err)
    }

    people
}

pub fn build_new_exam(form: &RegisterExamForm, validated: &ValidatedForm, people: ResolvedPeople, registered_by: &str) -> NewExam {
    NewExam {
        exam_code: validated.course.code.trim().to_string(),
        exam_name: validated.course.name.trim().to_string(),
        exam_date: form.exam_date,
        desired_date: validated.desired_date,
        exam_students: form.nb_students,
        exam_pages: form.nb_pages,
        paper_format: form.paper_format,
        paper_color: form.paper_color,
        need_scan: form.need_scan,
        financial_center: form.financial_center.trim().to_string(),
        contact: people.contact,
        authorized_persons: people.authorized_persons,
        remark: form.remark.clone().filter(|r| !r.trim().is_empty()),
        registered_by: registered_by.to_string()
    }
}

/// Folder on the exam share where the files of an exam are uploaded
pub fn upload_folder_name(exam_code: &str, contact_lastname: &str, desired_date: NaiveDate) -> String {
    format!("{}_{}_{}", exam_code, contact_lastname, desired_date.format("%Y-%m-%d"))
}

impl CourseChoice {
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => format!("{} - {}", self.code, self.name)
        }
    }
}
