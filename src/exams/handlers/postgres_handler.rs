use crate::exams::scheduler::{Allocation, PrintSlotAllocator, ScheduledJob, SlotRequest};
use crate::exams::types::exam::{Exam, NewExam};
use crate::exams::types::log::{ExamLog, LogAction};
use crate::exams::types::status::ExamStatus;
use crate::shared::types::account::UserId;
use crate::shared::util::config;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{PgConnection, Row};
use sqlx::postgres::{PgPool, PgRow};

/// Advisory lock key guarding the printer calendar ("CREP" in ASCII)
const PRINTER_CALENDAR_LOCK: i64 = 0x43524550;

#[derive(Clone)]
pub struct PostgresHandler {
    pool: PgPool
}

impl PostgresHandler {
    pub async fn new() -> Result<PostgresHandler, sqlx::Error> {
        Ok(PostgresHandler { pool: config::get_pool().await })
    }

    pub fn with_pool(pool: PgPool) -> PostgresHandler {
        PostgresHandler { pool }
    }
}

fn start_of(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::default())
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn exam_from_row(row: &PgRow) -> Exam {
    let status: String = row.get("status");
    let status = status.parse::<ExamStatus>().unwrap_or_else(|err| {
        log::warn!("{}, treating exam as registered", err);
        ExamStatus::Registered
    });

    Exam {
        id: row.get::<i32, &str>("id"),
        exam_code: row.get::<String, &str>("exam_code"),
        exam_name: row.get::<String, &str>("exam_name"),
        exam_date: row.get::<NaiveDate, &str>("exam_date"),
        desired_date: row.get::<Option<NaiveDate>, &str>("desired_date"),
        print_date: row.get::<Option<NaiveDateTime>, &str>("print_date"),
        exam_students: row.get::<i32, &str>("exam_students"),
        exam_pages: row.get::<i32, &str>("exam_pages"),
        paper_format: row.get::<String, &str>("paper_format").parse().unwrap_or_default(),
        paper_color: row.get::<String, &str>("paper_color").parse().unwrap_or_default(),
        need_scan: row.get::<bool, &str>("need_scan"),
        financial_center: row.get::<String, &str>("financial_center"),
        contact: row.get::<String, &str>("contact"),
        authorized_persons: row.get::<String, &str>("authorized_persons"),
        remark: row.get::<Option<String>, &str>("remark"),
        repro_remark: row.get::<Option<String>, &str>("repro_remark"),
        status,
        registered_by: row.get::<String, &str>("registered_by")
    }
}

fn log_from_row(row: &PgRow) -> ExamLog {
    ExamLog {
        id: row.get::<i32, &str>("id"),
        exam_id: row.get::<i32, &str>("exam_id"),
        action: LogAction::from_db(row.get::<String, &str>("action").as_str()),
        contact: row.get::<String, &str>("contact"),
        date_time: row.get::<NaiveDateTime, &str>("date_time"),
        delivery_date: row.get::<Option<NaiveDate>, &str>("delivery_date"),
        exam_date: row.get::<NaiveDate, &str>("exam_date"),
        exam_name: row.get::<String, &str>("exam_name"),
        exam_code: row.get::<String, &str>("exam_code"),
        is_read: row.get::<bool, &str>("is_read"),
        read_at: row.get::<Option<NaiveDateTime>, &str>("read_at")
    }
}

/// Notifies whoever registered the exam
async fn write_log(conn: &mut PgConnection, exam: &Exam, action: LogAction) -> Result<(), sqlx::Error> {
    sqlx::query(r#"INSERT INTO crep_logs(exam_id, action, contact, date_time, delivery_date, exam_date,
            exam_name, exam_code, user_id) VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9);"#)
        .bind(exam.id).bind(action.as_str()).bind(&exam.contact).bind(now())
        .bind(exam.desired_date).bind(exam.exam_date).bind(&exam.exam_name).bind(&exam.exam_code)
        .bind(&exam.registered_by)
        .execute(conn).await?;
    Ok(())
}

impl PostgresHandler {
    // Called on first launch for setup
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(r#"
        CREATE TABLE IF NOT EXISTS crep (
            id SERIAL PRIMARY KEY,
            exam_code text NOT NULL CHECK(length(exam_code) < 64),
            exam_name text NOT NULL CHECK(length(exam_name) < 1024),
            exam_date date NOT NULL,
            desired_date date,
            print_date timestamp,
            exam_students integer NOT NULL CHECK(exam_students > 0),
            exam_pages integer NOT NULL CHECK(exam_pages > 0),
            paper_format text NOT NULL,
            paper_color text NOT NULL,
            need_scan boolean NOT NULL DEFAULT true,
            financial_center text NOT NULL CHECK(length(financial_center) <= 8),
            contact text NOT NULL,
            authorized_persons text NOT NULL DEFAULT '[]',
            remark text CHECK(length(remark) < 16192),
            repro_remark text CHECK(length(repro_remark) < 16192),
            status text NOT NULL DEFAULT 'registered',
            registered_by text NOT NULL
        );"#).execute(&self.pool).await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS crep_print_date_idx ON crep(print_date);")
            .execute(&self.pool).await?;

        // No foreign key: delete notifications outlive their exam
        sqlx::query(r#"
        CREATE TABLE IF NOT EXISTS crep_logs (
            id SERIAL PRIMARY KEY,
            exam_id integer NOT NULL,
            action text NOT NULL,
            contact text NOT NULL,
            date_time timestamp NOT NULL,
            delivery_date date,
            exam_date date NOT NULL,
            exam_name text NOT NULL,
            exam_code text NOT NULL,
            user_id text NOT NULL,
            is_read boolean NOT NULL DEFAULT false,
            read_at timestamp
        );"#).execute(&self.pool).await?;
        Ok(())
    }

    /// Allocates a print slot and inserts the exam. The printer calendar is
    /// locked for the whole read-compute-write sequence so two concurrent
    /// registrations cannot be given the same slot.
    pub async fn register_exam(&self, exam: &NewExam, today: NaiveDate, allocator: &PrintSlotAllocator)
            -> Result<(i32, Allocation), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock($1);")
            .bind(PRINTER_CALENDAR_LOCK)
            .execute(&mut *tx).await?;

        let existing = sqlx::query("SELECT id, exam_students, print_date FROM crep
                WHERE print_date >= $1 AND print_date < $2;")
            .bind(start_of(today))
            .bind(start_of(exam.desired_date) + Duration::days(1))
            .map(|row: PgRow| ScheduledJob {
                id: Some(row.get::<i32, &str>("id")),
                student_count: row.get::<i32, &str>("exam_students").max(0) as u32,
                print_start: row.get::<NaiveDateTime, &str>("print_date")
            })
            .fetch_all(&mut *tx).await?;

        let request = SlotRequest {
            student_count: exam.exam_students.max(0) as u32,
            desired_delivery_date: exam.desired_date,
            exam_date: exam.exam_date
        };
        let allocation = allocator.allocate(&request, today, &existing);

        let authorized_persons = serde_json::to_string(&exam.authorized_persons)
            .unwrap_or_else(|_| "[]".to_string());
        let row = sqlx::query(r#"INSERT INTO crep(exam_code, exam_name, exam_date, desired_date, print_date,
                exam_students, exam_pages, paper_format, paper_color, need_scan, financial_center, contact,
                authorized_persons, remark, status, registered_by)
                VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) RETURNING *;"#)
            .bind(&exam.exam_code).bind(&exam.exam_name).bind(exam.exam_date).bind(exam.desired_date)
            .bind(allocation.print_start())
            .bind(exam.exam_students).bind(exam.exam_pages)
            .bind(exam.paper_format.as_str()).bind(exam.paper_color.as_str()).bind(exam.need_scan)
            .bind(&exam.financial_center).bind(&exam.contact).bind(authorized_persons)
            .bind(&exam.remark).bind(ExamStatus::Registered.as_str()).bind(&exam.registered_by)
            .fetch_one(&mut *tx).await?;
        let inserted = exam_from_row(&row);

        write_log(&mut *tx, &inserted, LogAction::Insert).await?;
        tx.commit().await?;

        log::info!("Registered exam {} ({}) with print slot {:?}", inserted.id, inserted.exam_code, allocation);
        Ok((inserted.id, allocation))
    }

    pub async fn get_exam(&self, id: i32) -> Result<Option<Exam>, sqlx::Error> {
        Ok(sqlx::query("SELECT * FROM crep WHERE id = $1;")
            .bind(id)
            .map(|row: PgRow| exam_from_row(&row))
            .fetch_optional(&self.pool).await?)
    }

    pub async fn get_all_exams(&self) -> Result<Vec<Exam>, sqlx::Error> {
        Ok(sqlx::query("SELECT * FROM crep ORDER BY print_date NULLS LAST, id;")
            .map(|row: PgRow| exam_from_row(&row))
            .fetch_all(&self.pool).await?)
    }

    pub async fn get_exams_by_status(&self, statuses: &[ExamStatus]) -> Result<Vec<Exam>, sqlx::Error> {
        let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
        Ok(sqlx::query("SELECT * FROM crep WHERE status = ANY($1) ORDER BY print_date NULLS LAST, id;")
            .bind(statuses)
            .map(|row: PgRow| exam_from_row(&row))
            .fetch_all(&self.pool).await?)
    }

    /// What non-admin staff see on the calendar
    pub async fn get_staff_exams(&self) -> Result<Vec<Exam>, sqlx::Error> {
        self.get_exams_by_status(&ExamStatus::staff_visible()).await
    }

    /// Exams printed between two days, both included
    pub async fn get_exams_between_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Exam>, sqlx::Error> {
        Ok(sqlx::query("SELECT * FROM crep WHERE print_date >= $1 AND print_date < $2 ORDER BY print_date, id;")
            .bind(start_of(start))
            .bind(start_of(end) + Duration::days(1))
            .map(|row: PgRow| exam_from_row(&row))
            .fetch_all(&self.pool).await?)
    }

    pub async fn get_exams_for_day(&self, day: NaiveDate) -> Result<Vec<Exam>, sqlx::Error> {
        self.get_exams_between_dates(day, day).await
    }

    pub async fn update_print_date(&self, id: i32, print_date: NaiveDateTime) -> Result<Option<Exam>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let exam = sqlx::query("UPDATE crep SET print_date = $1 WHERE id = $2 RETURNING *;")
            .bind(print_date).bind(id)
            .map(|row: PgRow| exam_from_row(&row))
            .fetch_optional(&mut *tx).await?;
        if let Some(exam) = &exam {
            write_log(&mut *tx, exam, LogAction::Update).await?;
        }
        tx.commit().await?;
        Ok(exam)
    }

    pub async fn update_status(&self, id: i32, status: ExamStatus) -> Result<Option<Exam>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let exam = sqlx::query("UPDATE crep SET status = $1 WHERE id = $2 RETURNING *;")
            .bind(status.as_str()).bind(id)
            .map(|row: PgRow| exam_from_row(&row))
            .fetch_optional(&mut *tx).await?;
        if let Some(exam) = &exam {
            write_log(&mut *tx, exam, LogAction::Update).await?;
        }
        tx.commit().await?;
        Ok(exam)
    }

    /// Remark written by the reprographics team
    pub async fn update_remark(&self, id: i32, remark: &str) -> Result<Option<Exam>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let exam = sqlx::query("UPDATE crep SET repro_remark = $1 WHERE id = $2 RETURNING *;")
            .bind(remark).bind(id)
            .map(|row: PgRow| exam_from_row(&row))
            .fetch_optional(&mut *tx).await?;
        if let Some(exam) = &exam {
            write_log(&mut *tx, exam, LogAction::Update).await?;
        }
        tx.commit().await?;
        Ok(exam)
    }

    pub async fn delete_exam(&self, id: i32) -> Result<Option<Exam>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let exam = sqlx::query("DELETE FROM crep WHERE id = $1 RETURNING *;")
            .bind(id)
            .map(|row: PgRow| exam_from_row(&row))
            .fetch_optional(&mut *tx).await?;
        if let Some(exam) = &exam {
            write_log(&mut *tx, exam, LogAction::Delete).await?;
        }
        tx.commit().await?;
        Ok(exam)
    }

    pub async fn get_logs(&self, user_id: &UserId) -> Result<Vec<ExamLog>, sqlx::Error> {
        Ok(sqlx::query("SELECT * FROM crep_logs WHERE user_id = $1 ORDER BY id DESC LIMIT 50;")
            .bind(user_id)
            .map(|row: PgRow| log_from_row(&row))
            .fetch_all(&self.pool).await?)
    }

    pub async fn mark_logs_read(&self, user_id: &UserId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE crep_logs SET is_read = true, read_at = $2 WHERE user_id = $1 AND NOT is_read;")
            .bind(user_id).bind(now())
            .execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
