//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from SQLite. API representations live in `api::models` and are built from
//! these rows.

use serde::Serialize;
use sqlx::FromRow;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: String,
}

impl UserRow {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
    pub image: String,
}

/// Scalar recipe columns written on create and update.
#[derive(Debug, Clone)]
pub struct RecipeFields<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub cooking_time: i64,
    pub image: &'a str,
}

/// One ingredient line of a recipe, joined with the ingredient's name and unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct IngredientAmount {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Recipe listing filters. Tag slugs match any-of.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author: Option<i64>,
    pub tags: Vec<String>,
    pub favorited_by: Option<i64>,
    pub in_cart_of: Option<i64>,
}

/// The user-owned pair relations that share toggle semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Favorite,
    Cart,
    Follow,
}

impl RelationKind {
    pub fn table(&self) -> &'static str {
        match self {
            RelationKind::Favorite => "favorites",
            RelationKind::Cart => "carts",
            RelationKind::Follow => "follows",
        }
    }

    pub fn target_column(&self) -> &'static str {
        match self {
            RelationKind::Favorite | RelationKind::Cart => "recipe_id",
            RelationKind::Follow => "author_id",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RelationKind::Favorite => "favorites",
            RelationKind::Cart => "shopping cart",
            RelationKind::Follow => "subscriptions",
        }
    }
}
