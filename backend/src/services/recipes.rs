//! Recipe writes: validation, image storage and the transactional
//! create/update/delete of a recipe with its tag and ingredient links.

use std::collections::HashSet;

use foodgram_adapters::DecodedImage;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{
    database::{
        models::{RecipeFields, RecipeRow, UserRow},
        queries,
    },
    errors::{ApiError, ApiResult},
    state::AppState,
};

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_COOKING_TIME: i64 = 1000;
pub const MAX_AMOUNT: i64 = 10_000;

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientLine {
    pub id: i64,
    pub amount: i64,
}

/// Body of recipe create (POST) and update (PATCH) requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeWrite {
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<IngredientLine>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

struct Links {
    tags: Vec<i64>,
    amounts: Vec<(i64, i64)>,
}

pub fn can_modify(user: &UserRow, recipe: &RecipeRow) -> bool {
    recipe.author_id == user.id || user.is_admin()
}

fn check_name(name: &str) -> ApiResult<()> {
    let length = name.trim().chars().count();
    if length == 0 {
        return Err(ApiError::validation("Recipe name must not be empty."));
    }
    if length > MAX_NAME_LENGTH {
        return Err(ApiError::validation(format!(
            "Recipe name must be at most {MAX_NAME_LENGTH} characters."
        )));
    }
    Ok(())
}

fn check_text(text: &str) -> ApiResult<()> {
    if text.trim().is_empty() {
        return Err(ApiError::validation("Recipe text must not be empty."));
    }
    Ok(())
}

fn check_cooking_time(minutes: i64) -> ApiResult<()> {
    if !(1..=MAX_COOKING_TIME).contains(&minutes) {
        return Err(ApiError::validation(format!(
            "Cooking time must be between 1 and {MAX_COOKING_TIME} minutes."
        )));
    }
    Ok(())
}

fn check_lists(tags: Option<&[i64]>, ingredients: Option<&[IngredientLine]>) -> ApiResult<Links> {
    let ingredients = ingredients
        .filter(|lines| !lines.is_empty())
        .ok_or_else(|| ApiError::validation("At least one ingredient is required."))?;
    let tags = tags
        .filter(|tags| !tags.is_empty())
        .ok_or_else(|| ApiError::validation("At least one tag is required."))?;

    let unique_tags: HashSet<i64> = tags.iter().copied().collect();
    if unique_tags.len() != tags.len() {
        return Err(ApiError::validation("Tags must be unique."));
    }

    let unique_ingredients: HashSet<i64> = ingredients.iter().map(|line| line.id).collect();
    if unique_ingredients.len() != ingredients.len() {
        return Err(ApiError::validation("Ingredients must be unique."));
    }

    if let Some(line) = ingredients
        .iter()
        .find(|line| !(1..=MAX_AMOUNT).contains(&line.amount))
    {
        return Err(ApiError::validation(format!(
            "Amount of ingredient {} must be between 1 and {MAX_AMOUNT}.",
            line.id
        )));
    }

    Ok(Links {
        tags: tags.to_vec(),
        amounts: ingredients.iter().map(|line| (line.id, line.amount)).collect(),
    })
}

async fn check_references(pool: &SqlitePool, links: &Links) -> ApiResult<()> {
    let found: HashSet<i64> = queries::existing_ids(pool, "tags", &links.tags)
        .await?
        .into_iter()
        .collect();
    if let Some(missing) = links.tags.iter().find(|id| !found.contains(id)) {
        return Err(ApiError::validation(format!("Tag {missing} does not exist.")));
    }

    let ids: Vec<i64> = links.amounts.iter().map(|(id, _)| *id).collect();
    let found: HashSet<i64> = queries::existing_ids(pool, "ingredients", &ids)
        .await?
        .into_iter()
        .collect();
    if let Some(missing) = ids.iter().find(|id| !found.contains(id)) {
        return Err(ApiError::validation(format!("Ingredient {missing} does not exist.")));
    }

    Ok(())
}

async fn validate_links(pool: &SqlitePool, payload: &RecipeWrite) -> ApiResult<Links> {
    let links = check_lists(payload.tags.as_deref(), payload.ingredients.as_deref())?;
    check_references(pool, &links).await?;
    Ok(links)
}

fn decode_image(raw: Option<&str>) -> ApiResult<Option<DecodedImage>> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => Ok(Some(DecodedImage::from_data_uri(raw)?)),
        None => Ok(None),
    }
}

async fn discard_image(state: &AppState, path: &str) {
    if let Err(err) = state.images.delete(path).await {
        warn!(path, error = %err, "failed to remove image");
    }
}

async fn write_links(
    conn: &mut sqlx::SqliteConnection,
    recipe_id: i64,
    links: &Links,
) -> Result<(), sqlx::Error> {
    queries::replace_recipe_tags(conn, recipe_id, &links.tags).await?;
    queries::replace_recipe_ingredients(conn, recipe_id, &links.amounts).await
}

async fn insert_with_links(
    pool: &SqlitePool,
    author_id: i64,
    fields: &RecipeFields<'_>,
    links: &Links,
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let recipe_id = queries::insert_recipe(&mut *tx, author_id, fields).await?;
    write_links(&mut *tx, recipe_id, links).await?;
    tx.commit().await?;
    Ok(recipe_id)
}

async fn update_with_links(
    pool: &SqlitePool,
    recipe_id: i64,
    fields: &RecipeFields<'_>,
    links: &Links,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    queries::update_recipe(&mut *tx, recipe_id, fields).await?;
    write_links(&mut *tx, recipe_id, links).await?;
    tx.commit().await
}

pub async fn create(state: &AppState, author: &UserRow, payload: RecipeWrite) -> ApiResult<i64> {
    let name = payload.name.as_deref().unwrap_or_default();
    let text = payload.text.as_deref().unwrap_or_default();
    check_name(name)?;
    check_text(text)?;
    let cooking_time = payload
        .cooking_time
        .ok_or_else(|| ApiError::validation("Cooking time is required."))?;
    check_cooking_time(cooking_time)?;

    let image = decode_image(payload.image.as_deref())?
        .ok_or_else(|| ApiError::validation("An image is required."))?;
    let links = validate_links(&state.pool, &payload).await?;

    let image_path = state.images.save(&image).await?;
    let fields = RecipeFields {
        name: name.trim(),
        text,
        cooking_time,
        image: &image_path,
    };

    match insert_with_links(&state.pool, author.id, &fields, &links).await {
        Ok(recipe_id) => {
            info!(recipe_id, author_id = author.id, "recipe created");
            Ok(recipe_id)
        }
        Err(err) => {
            discard_image(state, &image_path).await;
            Err(err.into())
        }
    }
}

pub async fn update(state: &AppState, user: &UserRow, recipe_id: i64, payload: RecipeWrite) -> ApiResult<()> {
    let recipe = queries::find_recipe(&state.pool, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe"))?;
    if !can_modify(user, &recipe) {
        return Err(ApiError::forbidden());
    }

    let name = payload.name.as_deref().unwrap_or(&recipe.name);
    let text = payload.text.as_deref().unwrap_or(&recipe.text);
    let cooking_time = payload.cooking_time.unwrap_or(recipe.cooking_time);
    check_name(name)?;
    check_text(text)?;
    check_cooking_time(cooking_time)?;

    let image = decode_image(payload.image.as_deref())?;
    let links = validate_links(&state.pool, &payload).await?;

    let new_image = match &image {
        Some(image) => Some(state.images.save(image).await?),
        None => None,
    };
    let fields = RecipeFields {
        name: name.trim(),
        text,
        cooking_time,
        image: new_image.as_deref().unwrap_or(&recipe.image),
    };

    if let Err(err) = update_with_links(&state.pool, recipe_id, &fields, &links).await {
        if let Some(path) = &new_image {
            discard_image(state, path).await;
        }
        return Err(err.into());
    }

    if new_image.is_some() {
        discard_image(state, &recipe.image).await;
    }
    info!(recipe_id, user_id = user.id, "recipe updated");
    Ok(())
}

pub async fn delete(state: &AppState, user: &UserRow, recipe_id: i64) -> ApiResult<()> {
    let recipe = queries::find_recipe(&state.pool, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe"))?;
    if !can_modify(user, &recipe) {
        return Err(ApiError::forbidden());
    }

    queries::delete_recipe(&state.pool, recipe_id).await?;
    discard_image(state, &recipe.image).await;

    info!(recipe_id, user_id = user.id, "recipe deleted");
    Ok(())
}
