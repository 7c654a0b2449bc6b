#[cfg(test)]
mod tests {
    use crep_server::exams::scheduler::{Allocation, PrintSlotAllocator, ScheduledJob, SlotRequest};
    use crep_server::shared::util::config::ScheduleConfig;
    use chrono::{NaiveDate, NaiveDateTime};

    // March 2025: the 3rd is a Monday, the 8th and 9th are a weekend
    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        day(d).and_hms_opt(h, m, 0).unwrap()
    }

    fn job(start: NaiveDateTime, student_count: u32) -> ScheduledJob {
        ScheduledJob { id: None, student_count, print_start: start }
    }

    fn request(student_count: u32, desired: NaiveDate) -> SlotRequest {
        SlotRequest { student_count, desired_delivery_date: desired, exam_date: desired }
    }

    fn overlaps(allocator: &PrintSlotAllocator, start: NaiveDateTime, student_count: u32, other: &ScheduledJob) -> bool {
        let end = start + allocator.printing_duration(student_count);
        start < allocator.print_end(other) && other.print_start < end
    }

    #[test]
    fn printing_duration() {
        let allocator = PrintSlotAllocator::default();
        for (copies, minutes) in [(0, 60), (1, 120), (100, 120), (179, 120), (180, 120), (181, 180), (500, 240)] {
            assert_eq!(allocator.printing_duration_minutes(copies), minutes, "duration of {} copies", copies);
        }
    }

    #[test]
    fn empty_calendar_takes_first_morning() {
        let allocator = PrintSlotAllocator::default();
        let result = allocator.allocate(&request(300, day(7)), day(3), &[]);
        assert_eq!(result, Allocation::Allocated(at(3, 7, 0)), "07:00 on today when today is a business day");

        // Saturday the 1st: the first business day is Monday
        let saturday = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let result = allocator.allocate(&request(300, day(5)), saturday, &[]);
        assert_eq!(result, Allocation::Allocated(at(3, 7, 0)), "weekend today moves to Monday");
    }

    #[test]
    fn scans_back_from_the_deadline() {
        let allocator = PrintSlotAllocator::default();
        let existing = [job(at(3, 7, 0), 10)];
        let result = allocator.allocate(&request(10, day(7)), day(3), &existing);
        assert_eq!(result, Allocation::Allocated(at(6, 7, 0)), "empty Thursday is scanned before busy Monday");
    }

    #[test]
    fn queues_after_single_job() {
        let allocator = PrintSlotAllocator::default();
        // Job of the day runs 08:00 to 10:00
        let existing = [job(at(4, 8, 0), 1)];
        let result = allocator.allocate(&request(100, day(5)), day(3), &existing);
        assert_eq!(result, Allocation::Allocated(at(4, 10, 0)));
    }

    #[test]
    fn single_job_too_late_in_the_day() {
        let allocator = PrintSlotAllocator::default();
        // Only Monday is a candidate; its job ends at 21:00
        let existing = [job(at(3, 19, 0), 1)];
        let result = allocator.allocate(&request(100, day(4)), day(3), &existing);
        assert_eq!(result, Allocation::NoAvailableSlot);
        assert_eq!(result.print_start(), None);
    }

    #[test]
    fn fills_first_wide_enough_gap() {
        let allocator = PrintSlotAllocator::default();
        // 07:00-09:00 then 12:00-14:00, given out of order
        let existing = [job(at(3, 12, 0), 1), job(at(3, 7, 0), 1)];
        let result = allocator.allocate(&request(100, day(4)), day(3), &existing);
        assert_eq!(result, Allocation::Allocated(at(3, 9, 0)));

        let start = result.print_start().unwrap();
        assert!(existing.iter().all(|other| !overlaps(&allocator, start, 100, other)), "no overlap with the day's jobs");
    }

    #[test]
    fn appends_after_last_job_without_gap() {
        let allocator = PrintSlotAllocator::default();
        // Back to back from 07:00 to 17:00
        let existing = [job(at(3, 7, 0), 500), job(at(3, 11, 0), 500), job(at(3, 15, 0), 1)];
        let result = allocator.allocate(&request(100, day(4)), day(3), &existing);
        assert_eq!(result, Allocation::Allocated(at(3, 17, 0)));

        let start = result.print_start().unwrap();
        assert!(existing.iter().all(|other| !overlaps(&allocator, start, 100, other)), "no overlap with the day's jobs");
    }

    #[test]
    fn skips_a_full_day() {
        let allocator = PrintSlotAllocator::default();
        let existing = [
            // Tuesday booked 07:30 to 21:30 without gaps
            job(at(4, 7, 30), 500),
            job(at(4, 11, 30), 500),
            job(at(4, 15, 30), 500),
            job(at(4, 19, 30), 1),
            // Monday has room after its only job
            job(at(3, 7, 0), 1)
        ];
        let result = allocator.allocate(&request(500, day(5)), day(3), &existing);
        assert_eq!(result, Allocation::Allocated(at(3, 9, 0)), "Tuesday is skipped, Monday is used");
    }

    #[test]
    fn closing_time_is_inclusive() {
        let allocator = PrintSlotAllocator::default();
        // Ends at 20:00, the new job ends at exactly 22:00
        let result = allocator.allocate(&request(1, day(4)), day(3), &[job(at(3, 18, 0), 1)]);
        assert_eq!(result, Allocation::Allocated(at(3, 20, 0)));

        // Ends at 20:30, the new job would end at 22:30
        let result = allocator.allocate(&request(1, day(4)), day(3), &[job(at(3, 18, 30), 1)]);
        assert_eq!(result, Allocation::NoAvailableSlot);
    }

    #[test]
    fn same_snapshot_same_answer() {
        let allocator = PrintSlotAllocator::default();
        let existing = [job(at(4, 9, 0), 250), job(at(3, 7, 0), 10), job(at(4, 15, 0), 40)];
        let req = request(120, day(6));
        let first = allocator.allocate(&req, day(3), &existing);
        let second = allocator.allocate(&req, day(3), &existing);
        assert_eq!(first, second);
    }

    #[test]
    fn no_business_day_left() {
        let allocator = PrintSlotAllocator::default();
        assert_eq!(allocator.allocate(&request(10, day(10)), day(8), &[]), Allocation::NoAvailableSlot, "weekend only window");
        assert_eq!(allocator.allocate(&request(10, day(5)), day(5), &[]), Allocation::NoAvailableSlot, "desired date is today");
        assert_eq!(allocator.allocate(&request(10, day(4)), day(5), &[]), Allocation::NoAvailableSlot, "desired date has passed");
    }

    #[test]
    fn window_bounds() {
        let allocator = PrintSlotAllocator::default();
        let before = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap().and_hms_opt(7, 0, 0).unwrap();
        let outside = [job(before, 10), job(at(10, 7, 0), 10)];
        let result = allocator.allocate(&request(10, day(7)), day(3), &outside);
        assert_eq!(result, Allocation::Allocated(at(3, 7, 0)), "jobs outside the window are ignored");

        // A job on the desired date is inside the window but never a candidate day
        let on_desired = [job(at(7, 7, 0), 10)];
        let result = allocator.allocate(&request(10, day(7)), day(3), &on_desired);
        assert_eq!(result, Allocation::Allocated(at(6, 7, 0)));
    }

    #[test]
    fn gaps_are_sorted() {
        let allocator = PrintSlotAllocator::default();
        let jobs = [job(at(3, 12, 0), 0), job(at(3, 7, 0), 0), job(at(3, 9, 0), 0)];
        let gaps = allocator.compute_gaps(jobs.iter());
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].before.print_start, at(3, 7, 0));
        assert_eq!(gaps[0].gap_minutes, 60);
        assert_eq!(gaps[1].after.print_start, at(3, 12, 0));
        assert_eq!(gaps[1].gap_minutes, 120);

        assert!(allocator.compute_gaps(jobs[..1].iter()).is_empty(), "a single job has no gap");
    }

    #[test]
    fn configured_opening_hours() {
        let allocator = PrintSlotAllocator::from_config(&ScheduleConfig {
            opening_hour: 8,
            closing_hour: 18,
            ..ScheduleConfig::default()
        });
        assert_eq!(allocator.allocate(&request(10, day(5)), day(3), &[]), Allocation::Allocated(at(3, 8, 0)));
        // Ends at 16:30, two more hours would pass 18:00
        let result = allocator.allocate(&request(1, day(4)), day(3), &[job(at(3, 14, 30), 1)]);
        assert_eq!(result, Allocation::NoAvailableSlot);
    }

    #[test]
    fn allocation_json() {
        let allocated = serde_json::to_value(Allocation::Allocated(at(3, 7, 0))).unwrap();
        assert_eq!(allocated, serde_json::json!({ "outcome": "allocated", "print_start": "2025-03-03T07:00:00" }));
        let none = serde_json::to_value(Allocation::NoAvailableSlot).unwrap();
        assert_eq!(none["outcome"], "no_available_slot");
    }

    #[test]
    fn never_starts_before_opening() {
        let allocator = PrintSlotAllocator::default();
        // A job moved by hand to 03:00-05:00
        let result = allocator.allocate(&request(100, day(4)), day(3), &[job(at(3, 3, 0), 1)]);
        assert_eq!(result, Allocation::Allocated(at(3, 7, 0)), "single job ending before opening");

        // Back to back from 02:00 to 04:00
        let early = [job(at(3, 2, 0), 0), job(at(3, 3, 0), 0)];
        let result = allocator.allocate(&request(1, day(4)), day(3), &early);
        assert_eq!(result, Allocation::Allocated(at(3, 7, 0)), "append after jobs ending before opening");

        // The 04:00-08:00 gap is four hours long but only one of them is after opening,
        // so the job goes after the 08:00 one
        let gap_before_opening = [job(at(3, 3, 0), 0), job(at(3, 8, 0), 1)];
        let result = allocator.allocate(&request(1, day(4)), day(3), &gap_before_opening);
        assert_eq!(result, Allocation::Allocated(at(3, 10, 0)));
    }

    #[test]
    fn gap_must_end_by_closing() {
        let allocator = PrintSlotAllocator::default();
        assert_eq!(allocator.printing_duration_minutes(2200), 840);
        // 09:00 to 23:30 is wide enough, but the job would end at 23:00
        let existing = [job(at(3, 7, 0), 1), job(at(3, 23, 30), 1)];
        let result = allocator.allocate(&request(2200, day(4)), day(3), &existing);
        assert_eq!(result, Allocation::NoAvailableSlot);
    }
}
