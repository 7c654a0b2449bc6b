#[cfg(test)]
mod tests {
    use crep_server::shared::util::calendar::*;
    use chrono::NaiveDate;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn weekends_are_not_business_days() {
        assert!(is_business_day(day(3, 3)), "Monday");
        assert!(is_business_day(day(3, 7)), "Friday");
        assert!(!is_business_day(day(3, 8)), "Saturday");
        assert!(!is_business_day(day(3, 9)), "Sunday");
    }

    #[test]
    fn range_excludes_end() {
        assert_eq!(business_days_in_range(day(3, 3), day(3, 6)), vec![day(3, 3), day(3, 4), day(3, 5)]);
        assert_eq!(business_days_in_range(day(3, 7), day(3, 11)), vec![day(3, 7), day(3, 10)], "weekend skipped");
        assert!(business_days_in_range(day(3, 8), day(3, 10)).is_empty(), "weekend only");
        assert!(business_days_in_range(day(3, 5), day(3, 5)).is_empty(), "empty range");
        assert!(business_days_in_range(day(3, 6), day(3, 5)).is_empty(), "reversed range");
    }

    #[test]
    fn days_between_is_symmetric() {
        assert_eq!(business_days_between(day(3, 4), day(3, 14)), 8);
        assert_eq!(business_days_between(day(3, 14), day(3, 4)), 8);
        assert_eq!(business_days_between(day(3, 10), day(3, 10)), 0);
    }

    #[test]
    fn suggested_date_walks_back_business_days() {
        assert_eq!(suggested_delivery_date(day(3, 14), 8), day(3, 4), "Friday exam");
        assert_eq!(suggested_delivery_date(day(3, 10), 1), day(3, 7), "Monday exam lands on Friday");
        assert_eq!(suggested_delivery_date(day(3, 9), 1), day(3, 7), "Sunday exam lands on Friday");
        assert_eq!(suggested_delivery_date(day(3, 8), 1), day(3, 7), "Saturday exam lands on Friday");
        assert_eq!(suggested_delivery_date(day(3, 12), 0), day(3, 12), "no lead time");
    }

    #[test]
    fn attention_below_lead_time() {
        assert!(!needs_attention(day(3, 4), day(3, 14), 8), "exactly the lead time");
        assert!(needs_attention(day(3, 5), day(3, 14), 8), "one day short");
        assert!(!needs_attention(suggested_delivery_date(day(6, 20), 8), day(6, 20), 8), "suggested date never needs attention");
    }
}
