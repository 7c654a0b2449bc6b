use std::path::{Path, PathBuf};

use crate::shared::types::account::UserId;
use crate::shared::util::config;

use actix_multipart::{Field, Multipart};
use chrono::NaiveDateTime;
use futures::StreamExt;
use serde::Serialize;
use sqlx::Row;
use sqlx::postgres::PgPool;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("The upload folder name is missing")]
    MissingFolder,
    #[error("No files were sent")]
    NoFiles,
    #[error("Malformed upload: {0}")]
    Multipart(String),
    #[error("Could not write file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error)
}

#[derive(Clone)]
pub struct PostgresHandler {
    pool: PgPool,
    exam_files_dir: String,
    max_files_per_upload: usize
}

impl PostgresHandler {
    pub async fn new() -> Result<PostgresHandler, sqlx::Error> {
        let config = config::get_config();
        Ok(PostgresHandler {
            pool: config::get_pool().await,
            exam_files_dir: config.server.exam_files_dir,
            max_files_per_upload: config.server.max_files_per_upload
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ExamFile {
    pub id: Uuid,
    pub folder_name: String,
    pub file_name: String,
    pub file_size: i64,
    pub upload_date: NaiveDateTime
}

#[derive(Clone, Debug, Serialize)]
pub struct FileUploadResult {
    pub folder_name: String,
    pub saved: Vec<String>,
    pub failed: Vec<String>
}

/// Folder and file names come from the client and must not escape the exam share
pub fn safe_name(name: &str) -> String {
    sanitize_filename::sanitize(name.trim())
}

impl PostgresHandler {
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(r#"
        CREATE TABLE IF NOT EXISTS crep_files (
            id uuid primary key unique,
            folder_name text NOT NULL CHECK(length(folder_name) < 512),
            file_name text NOT NULL CHECK(length(file_name) < 2048),
            uploaded_by text NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            upload_date timestamp NOT NULL,
            file_size bigint NOT NULL,
            UNIQUE(folder_name, file_name)
          );"#).execute(&self.pool).await?;

        if let Err(err) = tokio::fs::create_dir_all(self.tmp_dir()).await {
            log::error!("Could not create exam files directory {}: {}", self.exam_files_dir, err);
        }
        Ok(())
    }

    fn tmp_dir(&self) -> PathBuf {
        Path::new(&self.exam_files_dir).join(".tmp")
    }

    fn stored_path(&self, folder_name: &str, file_name: &str) -> PathBuf {
        Path::new(&self.exam_files_dir).join(folder_name).join(file_name)
    }

    pub async fn get_files(&self, folder_name: &str) -> Result<Vec<ExamFile>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM crep_files WHERE folder_name = $1 ORDER BY file_name;")
            .bind(safe_name(folder_name))
            .fetch_all(&self.pool).await?;

        Ok(rows.iter().map(|row| ExamFile {
            id: row.get::<Uuid, &str>("id"),
            folder_name: row.get::<String, &str>("folder_name"),
            file_name: row.get::<String, &str>("file_name"),
            file_size: row.get::<i64, &str>("file_size"),
            upload_date: row.get::<NaiveDateTime, &str>("upload_date")
        }).collect())
    }

    /// Path on disk of a stored file, if it is known
    pub async fn file_path(&self, id: &Uuid) -> Result<Option<PathBuf>, sqlx::Error> {
        let row = sqlx::query("SELECT folder_name, file_name FROM crep_files WHERE id = $1;")
            .bind(id)
            .fetch_optional(&self.pool).await?;
        Ok(row.map(|row| self.stored_path(
            row.get::<String, &str>("folder_name").as_str(),
            row.get::<String, &str>("file_name").as_str())))
    }

    /// Streams one multipart field to a temporary file and returns its size
    async fn stage_field(&self, field: &mut Field, tmp_path: &Path) -> Result<u64, UploadError> {
        let mut async_file = tokio::fs::File::create(tmp_path).await?;
        let mut size: u64 = 0;
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|err| UploadError::Multipart(err.to_string()))?;
            async_file.write_all(&chunk).await?;
            size += chunk.len() as u64;
        }
        async_file.shutdown().await?;
        Ok(size)
    }

    async fn store_file(&self, user_id: &UserId, folder_name: &str, file_name: &str, field: &mut Field)
            -> Result<(), UploadError> {
        let tmp_path = self.tmp_dir().join(Uuid::new_v4().to_string());
        let size = match self.stage_field(field, &tmp_path).await {
            Ok(size) => size,
            Err(err) => {
                let _ = tokio::fs::remove_file(&tmp_path).await;
                return Err(err);
            }
        };

        let mut tx = self.pool.begin().await?;
        sqlx::query(r#"
            INSERT INTO crep_files (id, folder_name, file_name, uploaded_by, upload_date, file_size)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (folder_name, file_name)
            DO UPDATE SET uploaded_by = EXCLUDED.uploaded_by, upload_date = EXCLUDED.upload_date, file_size = EXCLUDED.file_size;"#)
            .bind(Uuid::new_v4())
            .bind(folder_name)
            .bind(file_name)
            .bind(user_id.to_lowercase())
            .bind(chrono::Local::now().naive_local())
            .bind(size as i64)
            .execute(&mut *tx).await?;

        if let Err(err) = tokio::fs::rename(&tmp_path, self.stored_path(folder_name, file_name)).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            tx.rollback().await?;
            return Err(err.into());
        }
        tx.commit().await?;
        Ok(())
    }

    /// Saves the files of an exam into its folder on the exam share.
    ///
    /// The `folder_name` field must come before the `files` fields. Files past
    /// the per-upload limit, or that fail to save, are reported in `failed`.
    pub async fn upload_files(&self, user_id: &UserId, mut payload: Multipart) -> Result<FileUploadResult, UploadError> {
        let mut folder_name: Option<String> = None;
        let mut saved: Vec<String> = Vec::new();
        let mut failed: Vec<String> = Vec::new();

        while let Some(item) = payload.next().await {
            let mut field = item.map_err(|err| UploadError::Multipart(err.to_string()))?;

            if field.name() == "folder_name" {
                let mut value = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|err| UploadError::Multipart(err.to_string()))?;
                    value.extend_from_slice(&chunk);
                }
                let name = safe_name(&String::from_utf8_lossy(&value));
                if name.is_empty() {
                    return Err(UploadError::MissingFolder);
                }
                tokio::fs::create_dir_all(Path::new(&self.exam_files_dir).join(&name)).await?;
                folder_name = Some(name);
                continue;
            }

            let Some(folder) = folder_name.as_deref() else {
                return Err(UploadError::MissingFolder);
            };
            let file_name = field.content_disposition().get_filename()
                .map(safe_name)
                .unwrap_or_default();
            if file_name.is_empty() {
                continue;
            }
            if saved.len() >= self.max_files_per_upload {
                failed.push(file_name);
                continue;
            }

            match self.store_file(user_id, folder, &file_name, &mut field).await {
                Ok(()) => saved.push(format!("{}/{}", folder, file_name)),
                Err(err) => {
                    log::warn!("Could not save {} in {}: {}", file_name, folder, err);
                    failed.push(file_name);
                }
            }
        }

        let Some(folder_name) = folder_name else {
            return Err(UploadError::MissingFolder);
        };
        if saved.is_empty() && failed.is_empty() {
            return Err(UploadError::NoFiles);
        }
        log::info!("{} uploaded {} file(s) to {}", user_id, saved.len(), folder_name);
        Ok(FileUploadResult { folder_name, saved, failed })
    }
}
