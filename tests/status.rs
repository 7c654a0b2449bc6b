#[cfg(test)]
mod tests {
    use crep_server::exams::types::status::ExamStatus;
    use std::collections::HashSet;

    #[test]
    fn string_values_round_trip() {
        let values: HashSet<&str> = ExamStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(values.len(), ExamStatus::ALL.len(), "values are unique");

        for status in ExamStatus::ALL {
            assert_eq!(status.as_str().parse::<ExamStatus>(), Ok(status));
            assert_eq!(serde_json::to_value(status).unwrap(), status.as_str(), "serde matches as_str for {}", status);
        }
        assert!("toprint".parse::<ExamStatus>().is_err(), "values are case sensitive");
    }

    #[test]
    fn staff_may_only_use_print_statuses() {
        let staff = ExamStatus::allowed(false);
        assert_eq!(staff, vec![ExamStatus::ToPrint, ExamStatus::Printing, ExamStatus::Finished, ExamStatus::Delivered]);
        assert_eq!(ExamStatus::allowed(true).len(), ExamStatus::ALL.len(), "admins may use every status");

        for status in ExamStatus::staff_visible() {
            assert!(!status.needs_admin(), "{} is visible to staff", status);
        }
        assert!(ExamStatus::Registered.needs_admin());
        assert!(ExamStatus::Canceled.needs_admin());
    }

    #[test]
    fn info_for_the_ui() {
        let info = serde_json::to_value(ExamStatus::ToScan.info()).unwrap();
        assert_eq!(info["value"], "2scan");
        assert_eq!(info["label"], "2Scan");
        assert_eq!(info["needs_admin"], true);
        assert_eq!(ExamStatus::Printing.hex_color(), "#22c55e");
    }
}
