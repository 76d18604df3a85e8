//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business operations
//! and orchestrate interactions between different parts of the application,
//! such as toggling user relations, writing recipes or aggregating a cart into
//! a shopping list.

pub mod import;
pub mod recipes;
pub mod relations;
pub mod shopping_list;
