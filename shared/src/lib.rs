//! Types shared between the fleet dashboard backend and its consumers.

pub mod api;
pub mod dates;
pub mod models;
