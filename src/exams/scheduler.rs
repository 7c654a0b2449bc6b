//! Print slot allocation for newly registered exams.
//!
//! The reprographics printer is a single shared resource. A new exam is
//! slotted into the printer calendar by scanning the business days before
//! its desired delivery date, starting from the day closest to that date and
//! walking back toward today. The first day that can hold the whole printing
//! window wins.
//!
//! All timestamps are naive wall-clock times of the print shop. They are
//! stored and read back in that form, so no offset correction happens here.

use crate::shared::util::calendar::business_days_in_range;
use crate::shared::util::config::ScheduleConfig;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Deserialize};

/// The exam being scheduled. Inputs are validated by the caller: the student
/// count is positive and the desired date is not after the exam date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotRequest {
    pub student_count: u32,
    pub desired_delivery_date: NaiveDate,
    pub exam_date: NaiveDate
}

/// An exam already holding a slot on the printer calendar
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub id: Option<i32>,
    pub student_count: u32,
    pub print_start: NaiveDateTime
}

/// Free printer time between two chronologically adjacent jobs of a day
#[derive(Clone, Debug, PartialEq)]
pub struct Gap<'a> {
    pub before: &'a ScheduledJob,
    pub after: &'a ScheduledJob,
    pub gap_minutes: i64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "print_start", rename_all = "snake_case")]
pub enum Allocation {
    Allocated(NaiveDateTime),
    NoAvailableSlot
}

impl Allocation {
    pub fn print_start(&self) -> Option<NaiveDateTime> {
        match self {
            Allocation::Allocated(start) => Some(*start),
            Allocation::NoAvailableSlot => None
        }
    }
}

#[derive(Clone, Debug)]
pub struct PrintSlotAllocator {
    opening: NaiveTime,
    closing: NaiveTime,
    seconds_per_copy: u32,
    setup_seconds: u32
}

impl Default for PrintSlotAllocator {
    fn default() -> Self {
        PrintSlotAllocator::from_config(&ScheduleConfig::default())
    }
}

impl PrintSlotAllocator {
    pub fn from_config(config: &ScheduleConfig) -> PrintSlotAllocator {
        let hour = |h: u32, fallback: u32| NaiveTime::from_hms_opt(h, 0, 0)
            .or_else(|| NaiveTime::from_hms_opt(fallback, 0, 0))
            .unwrap_or_default();
        PrintSlotAllocator {
            opening: hour(config.opening_hour, 7),
            closing: hour(config.closing_hour, 22),
            seconds_per_copy: config.seconds_per_copy,
            setup_seconds: config.setup_seconds
        }
    }

    /// Per-copy time plus a fixed setup cost, rounded up to whole hours
    pub fn printing_duration_minutes(&self, student_count: u32) -> i64 {
        let seconds = self.seconds_per_copy as i64 * student_count as i64 + self.setup_seconds as i64;
        let hours = (seconds + 3599) / 3600;
        hours * 60
    }

    pub fn printing_duration(&self, student_count: u32) -> Duration {
        Duration::minutes(self.printing_duration_minutes(student_count))
    }

    pub fn print_end(&self, job: &ScheduledJob) -> NaiveDateTime {
        job.print_start + self.printing_duration(job.student_count)
    }

    /// Gaps between adjacent jobs, ordered by print start. Input order does not matter.
    pub fn compute_gaps<'a, I>(&self, jobs: I) -> Vec<Gap<'a>>
            where I: IntoIterator<Item = &'a ScheduledJob> {
        let mut sorted: Vec<&ScheduledJob> = jobs.into_iter().collect();
        sorted.sort_by_key(|job| job.print_start);

        sorted.windows(2)
            .map(|pair| Gap {
                before: pair[0],
                after: pair[1],
                gap_minutes: (pair[1].print_start - self.print_end(pair[0])).num_minutes()
            })
            .collect()
    }

    /// Picks the print start of a new exam. `existing` is the snapshot of the
    /// printer calendar between today and the desired delivery date; jobs
    /// outside that window are ignored.
    pub fn allocate(&self, request: &SlotRequest, today: NaiveDate, existing: &[ScheduledJob]) -> Allocation {
        let desired = request.desired_delivery_date;
        let candidates = business_days_in_range(today, desired);
        if candidates.is_empty() {
            log::warn!("No business day between {} and {} to print in", today, desired);
            return Allocation::NoAvailableSlot;
        }

        let in_window: Vec<&ScheduledJob> = existing.iter()
            .filter(|job| {
                let day = job.print_start.date();
                day >= today && day <= desired
            })
            .collect();

        // Unconstrained calendar: soonest possible slot
        if in_window.is_empty() {
            return Allocation::Allocated(candidates[0].and_time(self.opening));
        }

        let needed = self.printing_duration(request.student_count);
        for day in candidates.into_iter().rev() {
            let jobs_of_day: Vec<&ScheduledJob> = in_window.iter()
                .copied()
                .filter(|job| job.print_start.date() == day)
                .collect();

            if let Some(start) = self.place_on_day(day, &jobs_of_day, needed) {
                log::debug!("Allocated print slot at {} for {} copies", start, request.student_count);
                return Allocation::Allocated(start);
            }
        }

        log::warn!("No print slot left before {} for {} copies", desired, request.student_count);
        Allocation::NoAvailableSlot
    }

    fn place_on_day(&self, day: NaiveDate, jobs: &[&ScheduledJob], needed: Duration) -> Option<NaiveDateTime> {
        let opening = day.and_time(self.opening);
        let limit = day.and_time(self.closing);
        // Never before opening, even behind a job placed earlier by hand
        let after = |job: &ScheduledJob| self.print_end(job).max(opening);

        match jobs {
            [] => Some(opening),
            [only] => {
                let start = after(only);
                (start + needed <= limit).then_some(start)
            },
            _ => {
                let gaps = self.compute_gaps(jobs.iter().copied());
                let fitting = gaps.iter()
                    .filter(|gap| gap.gap_minutes >= needed.num_minutes())
                    .map(|gap| (after(gap.before), gap.after.print_start))
                    .find(|(start, next)| *start + needed <= *next && *start + needed <= limit);
                if let Some((start, _)) = fitting {
                    return Some(start);
                }

                // No gap is wide enough, queue after the last job of the day
                let start = after(gaps.last()?.after);
                (start + needed <= limit).then_some(start)
            }
        }
    }
}
