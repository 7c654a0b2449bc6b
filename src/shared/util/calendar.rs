//! Business day arithmetic. No holiday calendar is modeled: a business day
//! is any Monday to Friday.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Business days in `[start, end)`, in chronological order
pub fn business_days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current < end {
        if is_business_day(current) {
            days.push(current);
        }
        current += Duration::days(1);
    }
    days
}

/// Number of business days separating two dates, regardless of their order.
/// The later date itself is not counted.
pub fn business_days_between(a: NaiveDate, b: NaiveDate) -> u32 {
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    business_days_in_range(start, end).len() as u32
}

/// Default delivery date offered for an exam: `lead_days` business days earlier
pub fn suggested_delivery_date(exam_date: NaiveDate, lead_days: u32) -> NaiveDate {
    let mut date = exam_date;
    for _ in 0..lead_days {
        let back = match date.weekday() {
            Weekday::Sun => 2,
            Weekday::Mon => 3,
            _ => 1
        };
        date -= Duration::days(back);
    }
    date
}

/// Whether the reprographics team must be warned about a short lead time
pub fn needs_attention(desired_date: NaiveDate, exam_date: NaiveDate, lead_days: u32) -> bool {
    business_days_between(desired_date, exam_date) < lead_days
}
