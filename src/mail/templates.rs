use chrono::{NaiveDate, NaiveDateTime};

/// What the requester is told after registering an exam
#[derive(Clone, Debug)]
pub struct RegistrationSummary {
    pub course_label: String,
    pub exam_date: NaiveDate,
    pub desired_date: NaiveDate,
    pub contact: String,
    pub authorized_emails: Vec<String>,
    pub remark: Option<String>,
    pub print_date: Option<NaiveDateTime>,
    pub needs_attention: bool,
    pub min_lead_days: u32
}

pub const ATTENTION_PREFIX: &str = "REQUIRES ATTENTION - ";
const SUBJECT: &str = "CePro - Exam printing service subscription confirmation";

/// Subject and body of the registration confirmation
pub fn registration_confirmation(summary: &RegistrationSummary) -> (String, String) {
    let subject = if summary.needs_attention {
        format!("{}{}", ATTENTION_PREFIX, SUBJECT)
    } else {
        SUBJECT.to_string()
    };

    let mut body = String::from("Hello,\nYour subscription to our exam printing service has been successfully registered:\n\n");
    if summary.needs_attention {
        body.push_str(&format!(
            "Warning: the desired delivery date you chose is less than {} business days before the exam.\n\
            The CePro team will get in touch with you shortly to discuss your situation.\n\
            Next time, please register earlier so that the printing team has enough time to print your exam correctly.\n\n",
            summary.min_lead_days));
    }

    body.push_str(&format!("- Course: {}\n", summary.course_label));
    body.push_str(&format!("- Exam date: {}\n", summary.exam_date.format("%Y-%m-%d")));
    body.push_str(&format!("- Desired delivery date: {}\n", summary.desired_date.format("%Y-%m-%d")));
    body.push_str(&format!("- Contact: {}\n", summary.contact));
    body.push_str(&format!("- Authorized persons: {}\n", summary.authorized_emails.join(", ")));
    match summary.print_date {
        Some(date) => body.push_str(&format!("- Planned printing: {}\n", date.format("%Y-%m-%d %H:%M"))),
        None => body.push_str("- Planned printing: to be scheduled by the CePro team\n")
    }
    if let Some(remark) = summary.remark.as_ref().filter(|r| !r.trim().is_empty()) {
        body.push_str(&format!("- Additional remarks: {}\n", remark));
    }

    (subject, body)
}
