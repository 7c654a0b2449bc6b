pub mod app;
pub mod export;
pub mod handlers;
pub mod register;
pub mod scheduler;
pub mod types;
