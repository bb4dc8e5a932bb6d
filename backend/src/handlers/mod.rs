pub mod dashboard;
pub mod status;
