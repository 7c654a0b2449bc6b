#[cfg(test)]
mod tests {
    use crep_server::exams::export::*;
    use crep_server::exams::types::exam::{Exam, PaperColor, PaperFormat};
    use crep_server::exams::types::status::ExamStatus;
    use chrono::NaiveDate;

    fn exam(id: i32, name: &str, day: u32) -> Exam {
        Exam {
            id,
            exam_code: "MATH-101".to_string(),
            exam_name: name.to_string(),
            exam_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            desired_date: None,
            print_date: None,
            exam_students: 120,
            exam_pages: 12,
            paper_format: PaperFormat::A3,
            paper_color: PaperColor::Greyscale,
            need_scan: true,
            financial_center: "F1234".to_string(),
            contact: "Ada Lovelace (ada@example.org)".to_string(),
            authorized_persons: "[]".to_string(),
            remark: None,
            repro_remark: None,
            status: ExamStatus::Finished,
            registered_by: "123456".to_string()
        }
    }

    #[test]
    fn csv_rows() {
        let csv = exams_to_csv(&[exam(1, "Analysis I", 14), exam(2, "Linear algebra, part 2", 5)]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "14/03/2025,Analysis I,120,12");
        assert_eq!(lines[2], "05/03/2025,\"Linear algebra, part 2\",120,12", "commas are quoted");
        assert!(csv.ends_with('\n'));
    }

    #[test]
    fn csv_quotes_are_doubled() {
        let csv = exams_to_csv(&[exam(1, "The \"hard\" one", 14)]);
        assert!(csv.contains("\"The \"\"hard\"\" one\""));
    }

    #[test]
    fn empty_export_has_header_only() {
        assert_eq!(exams_to_csv(&[]), format!("{}\n", CSV_HEADER));
    }

    #[test]
    fn merged_selections_list_each_exam_once() {
        let by_dates = vec![exam(1, "A", 3), exam(2, "B", 4)];
        let by_status = vec![exam(2, "B", 4), exam(3, "C", 5), exam(1, "A", 3)];
        let ids: Vec<i32> = merge_unique(by_dates, by_status).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn file_name_has_date() {
        assert_eq!(export_file_name(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()), "exported_exams_2025-03-03.csv");
    }
}
