pub mod exam;
pub mod log;
pub mod status;
