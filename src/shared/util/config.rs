//! Loads config from config.toml

use serde_derive::Deserialize;
use cached::proc_macro::cached;
use std::env;
use std::fs;
use std::process::exit;
use toml;
use sqlx::postgres::{PgPoolOptions, PgPool};

#[derive(Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub count: CountConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    pub mail: MailConfig,
    pub directory: DirectoryConfig
}

#[derive(Deserialize, Clone)]
pub struct CountConfig {
    pub min_password_length: usize,
    pub max_password_length: usize
}

#[derive(Deserialize, Clone)]
pub struct DatabaseConfig {
    pub ip: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String
}

#[derive(Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log: bool,
    pub login_cookie_valid_duration_seconds: u64,
    pub session_key_file: String,

    pub exam_files_dir: String,
    pub max_files_per_upload: usize,
    pub request_quota_replenish_ms: u64,
    pub request_quota: u32
}

/// Group names as delivered by the identity provider
#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    pub access_group: String,
    pub admin_group: String
}

#[derive(Deserialize, Clone)]
pub struct ScheduleConfig {
    pub opening_hour: u32,
    pub closing_hour: u32,
    pub seconds_per_copy: u32,
    pub setup_seconds: u32,
    pub min_lead_business_days: u32
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            opening_hour: 7,
            closing_hour: 22,
            seconds_per_copy: 20,
            setup_seconds: 3600,
            min_lead_business_days: 8
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct MailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
    pub cc: String
}

#[derive(Deserialize, Clone)]
pub struct DirectoryConfig {
    pub enabled: bool,
    pub persons_url: String,
    pub username: String,
    pub password: String,
    pub courses_url: String,
    pub courses_bearer: String,
    pub academic_year: String
}

/// Secrets can live in the environment (or a .env file) instead of config.toml
fn apply_env_overrides(config: &mut Config) {
    if let Ok(v) = env::var("CREP_DATABASE_PASSWORD") { config.database.password = v; }
    if let Ok(v) = env::var("CREP_MAIL_PASSWORD") { config.mail.password = v; }
    if let Ok(v) = env::var("CREP_DIRECTORY_PASSWORD") { config.directory.password = v; }
    if let Ok(v) = env::var("CREP_COURSES_BEARER") { config.directory.courses_bearer = v; }
}

#[cached]
pub async fn get_pool() -> PgPool {
    let config = get_config();
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(format!("postgres://{}:{}@{}:{}/{}", // user:password / ip/db
            config.database.user,
            config.database.password,
            config.database.ip,
            config.database.port,
            config.database.name
        ).as_str())
        .await;
    match pool {
        Ok(pool) => pool,
        Err(err) => {
            eprintln!("Could not connect to the database: {}", err);
            exit(1);
        }
    }
}

#[cached]
pub fn get_config() -> Config {
    dotenv::dotenv().ok();

    let contents = match fs::read_to_string("config.toml") {
        Ok(c) => c,
        Err(_) => {
            eprintln!("Could not find config.toml, please create or ensure it's accessible");
            exit(1);
        }
    };

    let mut data: Config = match toml::from_str(&contents) {
        Ok(d) => d,
        Err(err) => {
            eprintln!("Unable to load data from config: {}", err);
            exit(1);
        }
    };
    apply_env_overrides(&mut data);
    return data;
}
