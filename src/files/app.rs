use actix_files;
use actix_multipart::Multipart;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::files::postgres_handler::{ExamFile, PostgresHandler, UploadError};
use crate::shared::app::current_account;
use crate::shared::handlers::postgres_handler::PostgresHandler as SharedPostgresHandler;
use crate::shared::types::app::{ErrorResponse, login_fail, no_view_permission, bad_request};

use actix_identity::Identity;
use actix_web::{get, post, web::{self, Data}, HttpRequest, HttpResponse, Result};


// Requesters upload the files of the exam they just registered
#[post("/v1/files")]
async fn upload_files(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>,
        identity: Option<Identity>, payload: Multipart) -> Result<HttpResponse> {
    let Some((account, _)) = current_account(&user_handler, identity).await else { login_fail!(); };

    match handler.upload_files(account.id.as_str(), payload).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(err @ (UploadError::MissingFolder | UploadError::NoFiles | UploadError::Multipart(_))) => bad_request!(err),
        Err(err) => {
            log::error!("File upload by {} failed: {}", account.id, err);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse { error: "File upload failed".to_string() }))
        }
    }
}

#[derive(Deserialize)]
struct FolderSearch { folder_name: String }

#[derive(Serialize)]
struct FilesReturn { files: Vec<ExamFile> }

#[get("/v1/files")]
async fn get_files(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>,
        identity: Option<Identity>, params: web::Query<FolderSearch>) -> Result<HttpResponse> {
    let Some((_, level)) = current_account(&user_handler, identity).await else { login_fail!(); };
    if !level.is_staff() { no_view_permission!(); }

    match handler.get_files(params.folder_name.as_str()).await {
        Ok(files) => Ok(HttpResponse::Ok().json(FilesReturn { files })),
        Err(err) => {
            log::error!("Error listing files: {}", err);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse { error: "Error listing files".to_string() }))
        }
    }
}

#[derive(Deserialize)]
struct SingleFileSearch { id: String }

#[get("/v1/files/single")]
async fn get_file(handler: Data<PostgresHandler>, user_handler: Data<SharedPostgresHandler>,
        identity: Option<Identity>, params: web::Query<SingleFileSearch>, req: HttpRequest) -> Result<HttpResponse> {
    let Some((_, level)) = current_account(&user_handler, identity).await else { login_fail!(); };
    if !level.is_staff() { no_view_permission!(); }

    let Ok(id) = Uuid::parse_str(params.id.as_str()) else { bad_request!("Invalid file id"); };
    let not_found = || HttpResponse::NotFound().json(ErrorResponse { error: "Not found".to_string() });

    match handler.file_path(&id).await {
        Ok(Some(path)) => match actix_files::NamedFile::open_async(&path).await {
            Ok(file) => Ok(file.into_response(&req)),
            Err(err) => {
                log::warn!("File {} is recorded but unreadable: {}", path.display(), err);
                Ok(not_found())
            }
        },
        Ok(None) => Ok(not_found()),
        Err(err) => {
            log::error!("Error getting file {}: {}", id, err);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse { error: "Error getting file".to_string() }))
        }
    }
}
