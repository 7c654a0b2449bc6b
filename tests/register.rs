#[cfg(test)]
mod tests {
    use crep_server::directory::client::DirectoryClient;
    use crep_server::exams::register::*;
    use crep_server::exams::types::exam::{PaperColor, PaperFormat};
    use crep_server::shared::util::config::DirectoryConfig;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    // Exam on Friday the 14th, delivery eight business days earlier
    fn form() -> RegisterExamForm {
        serde_json::from_value(serde_json::json!({
            "course": { "code": "MATH-101", "name": "Analysis I" },
            "exam_date": "2025-03-14",
            "desired_date": "2025-03-04",
            "nb_students": 250,
            "nb_pages": 12,
            "financial_center": "F1234",
            "contact": "123456",
            "authorized_persons": ["234567"],
            "remark": "Stapled please"
        })).unwrap()
    }

    fn disabled_directory() -> DirectoryClient {
        DirectoryClient::new(DirectoryConfig {
            enabled: false,
            persons_url: String::new(),
            username: String::new(),
            password: String::new(),
            courses_url: String::new(),
            courses_bearer: String::new(),
            academic_year: "2024-2025".to_string()
        }).unwrap()
    }

    #[test]
    fn form_defaults() {
        let form = form();
        assert_eq!(form.paper_format, PaperFormat::A3);
        assert_eq!(form.paper_color, PaperColor::Greyscale);
        assert!(form.need_scan, "scanning is requested unless declined");
        assert!(!form.acknowledge_short_lead_time);
    }

    #[test]
    fn valid_form() {
        let validated = validate(&form(), 8).unwrap();
        assert_eq!(validated.desired_date, day(4));
        assert!(!validated.needs_attention);
        assert_eq!(validated.course.display_label(), "MATH-101 - Analysis I");
    }

    #[test]
    fn missing_desired_date_is_suggested() {
        let mut form = form();
        form.desired_date = None;
        let validated = validate(&form, 8).unwrap();
        assert_eq!(validated.desired_date, day(4));
    }

    #[test]
    fn rejected_fields() {
        let mut no_course = form();
        no_course.course = None;
        assert!(matches!(validate(&no_course, 8), Err(RegisterError::Validation(_))), "course is required");

        let mut no_copies = form();
        no_copies.nb_students = 0;
        assert!(matches!(validate(&no_copies, 8), Err(RegisterError::Validation(_))), "at least one copy");

        let mut no_pages = form();
        no_pages.nb_pages = 0;
        assert!(matches!(validate(&no_pages, 8), Err(RegisterError::Validation(_))), "at least one page");

        let mut long_center = form();
        long_center.financial_center = "123456789".to_string();
        assert!(matches!(validate(&long_center, 8), Err(RegisterError::Validation(_))), "financial center length");

        let mut no_contact = form();
        no_contact.contact = " ".to_string();
        assert!(matches!(validate(&no_contact, 8), Err(RegisterError::Validation(_))), "contact is required");

        let mut late = form();
        late.desired_date = Some(day(17));
        assert!(matches!(validate(&late, 8), Err(RegisterError::Validation(_))), "delivery after the exam");
    }

    #[test]
    fn short_lead_time_needs_acknowledgement() {
        let mut short = form();
        short.desired_date = Some(day(5));
        match validate(&short, 8) {
            Err(RegisterError::ShortLeadTime { business_days, required }) => {
                assert_eq!(business_days, 7);
                assert_eq!(required, 8);
            },
            other => panic!("expected a short lead time, got {:?}", other.map(|v| v.desired_date))
        }

        short.acknowledge_short_lead_time = true;
        let validated = validate(&short, 8).unwrap();
        assert!(validated.needs_attention, "acknowledged short lead time is flagged");
    }

    #[tokio::test]
    async fn people_without_directory() {
        let form = form();
        let people = resolve_people(&form, &disabled_directory()).await;
        assert_eq!(people.contact, "123456");
        assert_eq!(people.contact_lastname, "123456");
        assert_eq!(people.authorized_persons.len(), 1);
        assert_eq!(people.authorized_persons[0].id, "234567");

        let validated = validate(&form, 8).unwrap();
        let exam = build_new_exam(&form, &validated, people, "111111");
        assert_eq!(exam.exam_code, "MATH-101");
        assert_eq!(exam.desired_date, day(4));
        assert_eq!(exam.exam_students, 250);
        assert_eq!(exam.remark.as_deref(), Some("Stapled please"));
        assert_eq!(exam.registered_by, "111111");
    }

    #[test]
    fn blank_remark_is_dropped() {
        let mut form = form();
        form.remark = Some("   ".to_string());
        let validated = validate(&form, 8).unwrap();
        let people = ResolvedPeople { contact: "c".to_string(), contact_lastname: "Doe".to_string(), authorized_persons: Vec::new() };
        assert_eq!(build_new_exam(&form, &validated, people, "111111").remark, None);
    }

    #[test]
    fn folder_name() {
        assert_eq!(upload_folder_name("MATH-101", "Lovelace", day(4)), "MATH-101_Lovelace_2025-03-04");
    }
}
