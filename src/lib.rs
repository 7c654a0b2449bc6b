pub mod app;
pub mod directory;
pub mod exams;
pub mod files;
pub mod mail;
pub mod shared;
