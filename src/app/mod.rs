use actix_identity::IdentityMiddleware;
use actix_session::{config::PersistentSession, storage::CookieSessionStore, SessionMiddleware};
use actix_web::{
    HttpResponse, web::{self, Data},
    cookie::time::Duration,
    middleware, App, HttpServer, Result
};
use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use std::io;
use std::time;

use crate::shared::util::{config, secret};

use crate::shared::handlers::postgres_handler::PostgresHandler as SharedPostgresHandler;
use crate::exams::handlers::postgres_handler::PostgresHandler as ExamsPostgresHandler;
use crate::files::postgres_handler::PostgresHandler as FilesPostgresHandler;
use crate::exams::scheduler::PrintSlotAllocator;
use crate::directory::client::DirectoryClient;
use crate::mail::mailer::Mailer;

use crate::shared::app as shared_app;
use crate::exams::app as exams_app;
use crate::files::app as files_app;
use crate::directory::app as directory_app;

use crate::shared::types::app as app_types;


async fn not_found() -> Result<HttpResponse> {
    let response = app_types::ErrorResponse{ error: "Resource not found".to_string() };
    Ok(HttpResponse::NotFound().json(response))
}

fn startup_error<E: std::error::Error + Send + Sync + 'static>(what: &str, err: E) -> io::Error {
    log::error!("{}: {}", what, err);
    io::Error::new(io::ErrorKind::Other, err)
}

fn routes(app: &mut web::ServiceConfig) {
    app
        // User handling
        .service(shared_app::login)
        .service(shared_app::logout)
        .service(shared_app::me)

        // Exams
        .service(exams_app::register_exam)
        .service(exams_app::get_exams)
        .service(exams_app::get_calendar)
        .service(exams_app::get_statuses)
        .service(exams_app::get_suggested_delivery)
        .service(exams_app::update_print_date)
        .service(exams_app::update_status)
        .service(exams_app::update_remark)
        .service(exams_app::delete_exam)
        .service(exams_app::export_exams)

        // Notifications
        .service(exams_app::get_notifications)
        .service(exams_app::read_notifications)

        // Files
        .service(files_app::upload_files)
        .service(files_app::get_files)
        .service(files_app::get_file)

        // Directory
        .service(directory_app::search_persons)
        .service(directory_app::get_courses);
}

pub async fn start() -> std::io::Result<()> {
    let config = config::get_config();
    if config.server.log {
        if std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", "debug");
        }
        env_logger::init();
    }

    let secret_key = secret::get_session_key(&config.server.session_key_file)?; // For sessions

    let handler1 = SharedPostgresHandler::new().await.map_err(|e| startup_error("Database unavailable", e))?;
    let handler2 = ExamsPostgresHandler::new().await.map_err(|e| startup_error("Database unavailable", e))?;
    let handler3 = FilesPostgresHandler::new().await.map_err(|e| startup_error("Database unavailable", e))?;

    // Exams and files reference users, so users go first
    handler1.init().await.map_err(|e| startup_error("Could not create users table", e))?;
    handler2.init().await.map_err(|e| startup_error("Could not create exam tables", e))?;
    handler3.init().await.map_err(|e| startup_error("Could not create files table", e))?;

    let allocator = PrintSlotAllocator::from_config(&config.schedule);
    let mailer = Mailer::new(&config.mail).map_err(|e| startup_error("Invalid mail configuration", e))?;
    let directory = DirectoryClient::new(config.directory.clone())
        .map_err(|e| startup_error("Invalid directory configuration", e))?;

    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(config.server.request_quota_replenish_ms)
        .burst_size(config.server.request_quota)
        .finish()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Request quota must be positive"))?;
    let session_ttl = Duration::seconds(config.server.login_cookie_valid_duration_seconds as i64);

    log::info!("starting HTTP server at http://{}:{}", config.server.host, config.server.port);

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(handler1.clone()))
            .app_data(Data::new(handler2.clone()))
            .app_data(Data::new(handler3.clone()))
            .app_data(Data::new(allocator.clone()))
            .app_data(Data::new(mailer.clone()))
            .app_data(Data::new(directory.clone()))
            .configure(routes)
            .wrap(Governor::new(&governor_conf))
            .wrap(IdentityMiddleware::default())
            .wrap(Cors::permissive())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_name("login".to_owned())
                    .cookie_secure(false)
                    .cookie_http_only(true)
                    .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
                    .build(),
            )
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::Logger::default())
            .default_service(web::route().to(not_found))
    })
        .keep_alive(time::Duration::from_secs(30))
        .bind((config.server.host.as_str(), config.server.port))?
        .run().await
}
