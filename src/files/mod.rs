pub mod app;
pub mod postgres_handler;
