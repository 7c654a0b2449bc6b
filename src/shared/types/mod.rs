pub mod account;
pub mod app;
