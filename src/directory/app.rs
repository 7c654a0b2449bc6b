use crate::directory::client::{DirectoryClient, DirectoryError};
use crate::directory::types::{CourseOption, Person};
use crate::shared::app::current_account;
use crate::shared::handlers::postgres_handler::PostgresHandler as SharedPostgresHandler;
use crate::shared::types::app::{ErrorResponse, login_fail, bad_request};

use actix_identity::Identity;
use actix_web::{get, HttpResponse, web::{self, Data}, Result};
use serde::{Serialize, Deserialize};


fn directory_failure(err: DirectoryError) -> HttpResponse {
    log::warn!("Directory lookup failed: {}", err);
    match err {
        DirectoryError::Disabled => HttpResponse::ServiceUnavailable().json(
            ErrorResponse { error: "Directory lookups are disabled".to_string() }),
        _ => HttpResponse::BadGateway().json(
            ErrorResponse { error: "Directory lookup failed".to_string() })
    }
}

#[derive(Deserialize)]
struct PersonSearchParams { query: String }

#[derive(Serialize)]
struct PersonSearchReturn { persons: Vec<Person> }

#[get("/v1/directory/persons")]
async fn search_persons(user_handler: Data<SharedPostgresHandler>, client: Data<DirectoryClient>, identity: Option<Identity>,
        params: web::Query<PersonSearchParams>) -> Result<HttpResponse> {
    if current_account(&user_handler, identity).await.is_none() {
        login_fail!();
    }
    if params.query.trim().len() < 2 {
        bad_request!("Query must be at least 2 characters long");
    }

    match client.search_persons(params.query.trim()).await {
        Ok(persons) => Ok(HttpResponse::Ok().json(PersonSearchReturn { persons })),
        Err(err) => Ok(directory_failure(err))
    }
}

#[derive(Serialize)]
struct CoursesReturn { courses: Vec<CourseOption> }

#[get("/v1/directory/courses")]
async fn get_courses(user_handler: Data<SharedPostgresHandler>, client: Data<DirectoryClient>, identity: Option<Identity>)
        -> Result<HttpResponse> {
    if current_account(&user_handler, identity).await.is_none() {
        login_fail!();
    }

    match client.courses().await {
        Ok(courses) => Ok(HttpResponse::Ok().json(CoursesReturn { courses })),
        Err(err) => Ok(directory_failure(err))
    }
}
