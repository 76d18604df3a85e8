//! Module for the recipe API.
//!
//! This module defines the public interface for reading and writing recipes
//! and for the favorite, cart and shopping-list endpoints hanging off them.

pub mod handlers;
pub mod routes;
