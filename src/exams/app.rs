use crate::directory::client::DirectoryClient;
use crate::exams::export;
use crate::exams::handlers::postgres_handler::PostgresHandler;
use crate::exams::register::{self, RegisterError, RegisterExamForm};
use crate::exams::scheduler::{Allocation, PrintSlotAllocator};
use crate::exams::types::exam::{CalendarEvent, Exam};
use crate::exams::types::log::ExamLog;
use crate::exams::types::status::{ExamStatus, StatusInfo};
use crate::mail::mailer::Mailer;
use crate::mail::templates::{registration_confirmation, RegistrationSummary};
use crate::shared::app::current_account;
use crate::shared::handlers::postgres_handler::PostgresHandler as SharedPostgresHandler;
use crate::shared::types::account::AccessLevel;
use crate::shared::types::app::{ErrorResponse, Response, login_fail, no_update_permission, no_view_permission, bad_request};
use crate::shared::util::calendar::suggested_delivery_date;
use crate::shared::util::config;

use actix_identity::Identity;
use actix_web::{
    get, post, put, delete, HttpResponse, web::{self, Data}, Result
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Deserialize};


fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn database_failure(err: sqlx::Error, what: &str) -> HttpResponse {
    log::error!("{}: {}", what, err);
    HttpResponse::InternalServerError().json(ErrorResponse { error: what.to_string() })
}

/// Non-admin staff may only touch exams in a status they are allowed to set
fn can_modify(level: AccessLevel, exam: &Exam) -> bool {
    level.is_admin() || (level.is_staff() && !exam.status.needs_admin())
}


// Register an exam
#[derive(Serialize)]
struct RegisterReturn {
    id: i32,
    print_date: Option<NaiveDateTime>,
    slot_found: bool,
    lead_time_warning: bool,
    folder_name: String
}

#[post("/v1/exams/register")]
async fn register_exam(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>,
        directory: Data<DirectoryClient>, mailer: Data<Mailer>, allocator: Data<PrintSlotAllocator>,
        identity: Option<Identity>, params: web::Json<RegisterExamForm>) -> Result<HttpResponse> {
    // Any logged in user may register an exam
    let Some((account, _)) = current_account(&user_handler, identity).await else { login_fail!(); };
    let min_lead_days = config::get_config().schedule.min_lead_business_days;

    let validated = match register::validate(&params, min_lead_days) {
        Ok(v) => v,
        Err(err @ RegisterError::ShortLeadTime { .. }) => {
            return Ok(HttpResponse::Conflict().json(ErrorResponse { error: err.to_string() }));
        },
        Err(err) => bad_request!(err)
    };

    let people = register::resolve_people(&params, &directory).await;
    let folder_name = register::upload_folder_name(&validated.course.code, &people.contact_lastname, validated.desired_date);
    let authorized_emails: Vec<String> = people.authorized_persons.iter()
        .map(|p| if p.email.is_empty() { p.id.clone() } else { p.email.clone() })
        .collect();
    let contact = people.contact.clone();
    let new_exam = register::build_new_exam(&params, &validated, people, account.id.as_str());

    let (id, allocation) = match handler.register_exam(&new_exam, today(), &allocator).await {
        Ok(result) => result,
        Err(err) => return Ok(database_failure(err, "Error registering exam"))
    };
    if allocation == Allocation::NoAvailableSlot {
        log::warn!("Exam {} registered without a print slot", id);
    }

    let (subject, body) = registration_confirmation(&RegistrationSummary {
        course_label: validated.course.display_label(),
        exam_date: new_exam.exam_date,
        desired_date: new_exam.desired_date,
        contact,
        authorized_emails,
        remark: new_exam.remark.clone(),
        print_date: allocation.print_start(),
        needs_attention: validated.needs_attention,
        min_lead_days
    });
    if let Err(err) = mailer.send_mail(account.email.as_str(), &subject, body, Some(mailer.team_cc())).await {
        log::error!("Could not send confirmation for exam {}: {}", id, err);
    }

    Ok(HttpResponse::Ok().json(RegisterReturn {
        id,
        print_date: allocation.print_start(),
        slot_found: allocation != Allocation::NoAvailableSlot,
        lead_time_warning: validated.needs_attention,
        folder_name
    }))
}


// Get exams
#[derive(Serialize)]
struct ExamsReturn { exams: Vec<Exam> }

async fn visible_exams(handler: &PostgresHandler, level: AccessLevel) -> Result<Vec<Exam>, sqlx::Error> {
    if level.is_admin() {
        handler.get_all_exams().await
    } else {
        handler.get_staff_exams().await
    }
}

#[get("/v1/exams")]
async fn get_exams(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>, identity: Option<Identity>)
        -> Result<HttpResponse> {
    let Some((_, level)) = current_account(&user_handler, identity).await else { login_fail!(); };
    if !level.is_staff() { no_view_permission!(); }

    match visible_exams(&handler, level).await {
        Ok(exams) => Ok(HttpResponse::Ok().json(ExamsReturn { exams })),
        Err(err) => Ok(database_failure(err, "Error getting exams"))
    }
}

#[derive(Serialize)]
struct CalendarReturn { events: Vec<CalendarEvent> }

#[get("/v1/exams/calendar")]
async fn get_calendar(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>,
        allocator: Data<PrintSlotAllocator>, identity: Option<Identity>) -> Result<HttpResponse> {
    let Some((_, level)) = current_account(&user_handler, identity).await else { login_fail!(); };
    if !level.is_staff() { no_view_permission!(); }

    match visible_exams(&handler, level).await {
        Ok(exams) => Ok(HttpResponse::Ok().json(CalendarReturn {
            events: exams.iter().filter_map(|exam| exam.calendar_event(&allocator)).collect()
        })),
        Err(err) => Ok(database_failure(err, "Error getting calendar"))
    }
}

#[derive(Serialize)]
struct StatusesReturn { statuses: Vec<StatusInfo> }

#[get("/v1/exams/statuses")]
async fn get_statuses(user_handler: Data<SharedPostgresHandler>, identity: Option<Identity>) -> Result<HttpResponse> {
    let Some((_, level)) = current_account(&user_handler, identity).await else { login_fail!(); };
    Ok(HttpResponse::Ok().json(StatusesReturn {
        statuses: ExamStatus::allowed(level.is_admin()).iter().map(|s| s.info()).collect()
    }))
}

#[derive(Deserialize)]
struct SuggestedDeliveryParams { exam_date: NaiveDate }

#[derive(Serialize)]
struct SuggestedDeliveryReturn { desired_date: NaiveDate }

#[get("/v1/exams/suggested_delivery")]
async fn get_suggested_delivery(user_handler: Data<SharedPostgresHandler>, identity: Option<Identity>,
        params: web::Query<SuggestedDeliveryParams>) -> Result<HttpResponse> {
    if current_account(&user_handler, identity).await.is_none() { login_fail!(); }
    let lead = config::get_config().schedule.min_lead_business_days;
    Ok(HttpResponse::Ok().json(SuggestedDeliveryReturn {
        desired_date: suggested_delivery_date(params.exam_date, lead)
    }))
}


// Modify exams
async fn load_modifiable(handler: &PostgresHandler, level: AccessLevel, id: i32) -> Result<Option<Exam>, HttpResponse> {
    match handler.get_exam(id).await {
        Ok(Some(exam)) if can_modify(level, &exam) => Ok(Some(exam)),
        Ok(Some(_)) => Ok(None),
        Ok(None) => Err(HttpResponse::NotFound().json(ErrorResponse { error: "Exam does not exist".to_string() })),
        Err(err) => Err(database_failure(err, "Error getting exam"))
    }
}

fn updated(result: Result<Option<Exam>, sqlx::Error>, what: &str) -> HttpResponse {
    match result {
        Ok(Some(exam)) => HttpResponse::Ok().json(exam),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse { error: "Exam does not exist".to_string() }),
        Err(err) => database_failure(err, what)
    }
}

#[derive(Deserialize)]
struct PrintDateForm {
    id: i32,
    print_date: NaiveDateTime
}

#[put("/v1/exams/print_date")]
async fn update_print_date(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>,
        identity: Option<Identity>, params: web::Json<PrintDateForm>) -> Result<HttpResponse> {
    let Some((_, level)) = current_account(&user_handler, identity).await else { login_fail!(); };
    match load_modifiable(&handler, level, params.id).await {
        Ok(Some(_)) => (),
        Ok(None) => no_update_permission!(),
        Err(response) => return Ok(response)
    }
    Ok(updated(handler.update_print_date(params.id, params.print_date).await, "Error updating print date"))
}

#[derive(Deserialize)]
struct StatusForm {
    id: i32,
    status: ExamStatus
}

#[put("/v1/exams/status")]
async fn update_status(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>,
        identity: Option<Identity>, params: web::Json<StatusForm>) -> Result<HttpResponse> {
    let Some((_, level)) = current_account(&user_handler, identity).await else { login_fail!(); };
    if !ExamStatus::allowed(level.is_admin()).contains(&params.status) || !level.is_staff() {
        no_update_permission!();
    }
    match load_modifiable(&handler, level, params.id).await {
        Ok(Some(_)) => (),
        Ok(None) => no_update_permission!(),
        Err(response) => return Ok(response)
    }
    Ok(updated(handler.update_status(params.id, params.status).await, "Error updating status"))
}

#[derive(Deserialize)]
struct RemarkForm {
    id: i32,
    remark: String
}

#[put("/v1/exams/remark")]
async fn update_remark(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>,
        identity: Option<Identity>, params: web::Json<RemarkForm>) -> Result<HttpResponse> {
    let Some((_, level)) = current_account(&user_handler, identity).await else { login_fail!(); };
    match load_modifiable(&handler, level, params.id).await {
        Ok(Some(_)) => (),
        Ok(None) => no_update_permission!(),
        Err(response) => return Ok(response)
    }
    Ok(updated(handler.update_remark(params.id, params.remark.as_str()).await, "Error updating remark"))
}

#[derive(Deserialize)]
struct ExamIdForm { id: i32 }

#[delete("/v1/exams")]
async fn delete_exam(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>,
        identity: Option<Identity>, params: web::Json<ExamIdForm>) -> Result<HttpResponse> {
    let Some((account, level)) = current_account(&user_handler, identity).await else { login_fail!(); };
    if !level.is_admin() { no_update_permission!(); }

    match handler.delete_exam(params.id).await {
        Ok(Some(_)) => {
            log::info!("Exam {} deleted by {}", params.id, account.id);
            Ok(HttpResponse::Ok().json(Response { msg: "Deleted".to_string() }))
        },
        Ok(None) => Ok(HttpResponse::NotFound().json(ErrorResponse { error: "Exam does not exist".to_string() })),
        Err(err) => Ok(database_failure(err, "Error deleting exam"))
    }
}


// Export
#[derive(Deserialize)]
struct ExportParams {
    statuses: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>
}

#[get("/v1/exams/export")]
async fn export_exams(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>,
        identity: Option<Identity>, params: web::Query<ExportParams>) -> Result<HttpResponse> {
    let Some((_, level)) = current_account(&user_handler, identity).await else { login_fail!(); };
    if !level.is_staff() { no_view_permission!(); }

    let mut statuses: Vec<ExamStatus> = Vec::new();
    for value in params.statuses.as_deref().unwrap_or("").split(',').filter(|s| !s.is_empty()) {
        match value.parse::<ExamStatus>() {
            Ok(status) => statuses.push(status),
            Err(err) => bad_request!(err)
        }
    }
    let allowed = ExamStatus::allowed(level.is_admin());
    if statuses.iter().any(|s| !allowed.contains(s)) {
        no_view_permission!();
    }

    let by_dates = match (params.from, params.to) {
        (Some(from), Some(to)) => match handler.get_exams_between_dates(from, to).await {
            Ok(exams) => exams.into_iter().filter(|e| allowed.contains(&e.status)).collect(),
            Err(err) => return Ok(database_failure(err, "Error exporting exams"))
        },
        (None, None) => Vec::new(),
        _ => bad_request!("Both ends of the date range are required")
    };
    let by_status = if statuses.is_empty() {
        Vec::new()
    } else {
        match handler.get_exams_by_status(&statuses).await {
            Ok(exams) => exams,
            Err(err) => return Ok(database_failure(err, "Error exporting exams"))
        }
    };

    let exams = export::merge_unique(by_dates, by_status);
    if exams.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(("Content-Disposition", format!("attachment; filename=\"{}\"", export::export_file_name(today()))))
        .body(export::exams_to_csv(&exams)))
}


// Notifications
#[derive(Serialize)]
struct NotificationsReturn {
    logs: Vec<ExamLog>,
    unread: usize
}

#[get("/v1/notifications")]
async fn get_notifications(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>,
        identity: Option<Identity>) -> Result<HttpResponse> {
    let Some((account, _)) = current_account(&user_handler, identity).await else { login_fail!(); };
    match handler.get_logs(account.id.as_str()).await {
        Ok(logs) => {
            let unread = logs.iter().filter(|l| !l.is_read).count();
            Ok(HttpResponse::Ok().json(NotificationsReturn { logs, unread }))
        },
        Err(err) => Ok(database_failure(err, "Error getting notifications"))
    }
}

#[post("/v1/notifications/read")]
async fn read_notifications(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>,
        identity: Option<Identity>) -> Result<HttpResponse> {
    let Some((account, _)) = current_account(&user_handler, identity).await else { login_fail!(); };
    match handler.mark_logs_read(account.id.as_str()).await {
        Ok(_) => Ok(HttpResponse::Ok().json(Response { msg: "Notifications read".to_string() })),
        Err(err) => Ok(database_failure(err, "Error updating notifications"))
    }
}
