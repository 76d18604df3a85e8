//! Read-only tag API.

pub mod handlers;
pub mod routes;
