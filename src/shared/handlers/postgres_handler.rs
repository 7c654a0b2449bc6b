use crate::shared::util::config;
use crate::shared::types::account::{Account, UserId};

use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

#[derive(Clone)]
pub struct PostgresHandler {
    pool: PgPool
}

impl PostgresHandler {
    pub async fn new() -> Result<PostgresHandler, sqlx::Error> {
        Ok(PostgresHandler { pool: config::get_pool().await })
    }
}

fn account_from_row(row: &PgRow) -> Account {
    Account {
        name: row.get::<String, &str>("name"),
        id: row.get::<String, &str>("id"),
        email: row.try_get::<String, &str>("email").unwrap_or_default(),
        groups: row.try_get::<Vec<String>, &str>("groups").unwrap_or_default()
    }
}

impl PostgresHandler {
    // Called on first launch for setup
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(r#"
        CREATE TABLE IF NOT EXISTS users (
            id text primary key unique CHECK(length(id) < 25 and id ~ '^[a-zA-Z0-9_.-]+$'),
            name text NOT NULL CHECK(length(name) < 128),
            email text NOT NULL CHECK(length(email) < 320),
            groups text[] NOT NULL DEFAULT '{}',
            password_hash text NOT NULL
        );"#).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn can_login(&self, user_id: &UserId, mut password: &str) -> Result<bool, sqlx::Error> {
        // Too long password: replace password with a dummy and flag
        // that it should always be invalid
        let mut password_correct_override = true;
        if password.len() > config::get_config().count.max_password_length {
            password = "fake_password";
            password_correct_override = false;
        }

        let p = match sqlx::query("SELECT password_hash FROM users WHERE id = $1;")
            .bind(user_id.to_lowercase()).fetch_one(&self.pool).await {
            Ok(row) => row.get::<String, &str>("password_hash"),
            Err(_err) => "".to_string()
        };
        Ok(libpasta::verify_password(&p, &password) && password.chars().count() > 0 && password_correct_override)
    }

    pub async fn create_account(&self, user_id: &UserId, name: &str, email: &str, password: &str, groups: &[String])
            -> Result<(), sqlx::Error> {
        let password_hash = libpasta::hash_password(&password);
        sqlx::query("INSERT INTO users(id, name, email, groups, password_hash) VALUES($1, $2, $3, $4, $5);")
            .bind(user_id.to_lowercase()).bind(name).bind(email).bind(groups).bind(password_hash)
            .execute(&self.pool).await?;
        Ok(())
    }

    pub async fn change_password(&self, user_id: &UserId, password: &str) -> Result<(), sqlx::Error> {
        let password_hash = libpasta::hash_password(&password);
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2;")
            .bind(password_hash).bind(user_id.to_lowercase())
            .execute(&self.pool).await?;
        Ok(())
    }

    pub async fn set_groups(&self, user_id: &UserId, groups: &[String]) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET groups = $1 WHERE id = $2;")
            .bind(groups).bind(user_id.to_lowercase())
            .execute(&self.pool).await?;
        Ok(())
    }

    pub async fn delete_account(&self, user_id: &UserId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM users WHERE id = $1;")
            .bind(user_id.to_lowercase()).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn get_user(&self, user_id: &UserId) -> Result<Account, sqlx::Error> {
        let user = sqlx::query("SELECT * FROM users WHERE id = $1;")
            .bind(user_id.to_lowercase()).fetch_one(&self.pool).await?;
        Ok(account_from_row(&user))
    }
}
