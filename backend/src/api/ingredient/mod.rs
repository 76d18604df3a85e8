//! Module for the ingredient API: public reads, admin-only writes.

pub mod handlers;
pub mod routes;
