//! Module for user profile and subscription API endpoints.
//!
//! This module handles functionalities related to user information that is
//! distinct from token handling, such as listing users, reading profiles and
//! subscribing to authors.

pub mod handlers;
pub mod routes;
