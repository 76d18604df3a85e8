//! JSON representations returned by the API.
//!
//! Rows from `database::models` are shaped here, together with the
//! per-viewer flags (`is_subscribed`, `is_favorited`, `is_in_shopping_cart`).

use serde::Serialize;

use crate::{
    config::Config,
    database::{
        models::{IngredientAmount, RecipeRow, Tag, UserRow},
        queries,
    },
    errors::{ApiError, ApiResult},
    services::relations::{self, RelationKind},
    state::AppState,
};

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserView {
    pub fn new(user: &UserRow, is_subscribed: bool) -> Self {
        Self {
            email: user.email.clone(),
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
        }
    }

    pub async fn for_viewer(state: &AppState, user: &UserRow, viewer: Option<&UserRow>) -> ApiResult<Self> {
        let is_subscribed = match viewer {
            Some(viewer) if viewer.id != user.id => {
                relations::exists(&state.pool, RelationKind::Follow, viewer.id, user.id).await?
            }
            _ => false,
        };
        Ok(Self::new(user, is_subscribed))
    }
}

/// Response to registration: the profile without viewer flags.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&UserRow> for RegisteredUser {
    fn from(user: &UserRow) -> Self {
        Self {
            email: user.email.clone(),
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeShort {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

impl RecipeShort {
    pub fn new(recipe: &RecipeRow, config: &Config) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: config.media_link(&recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<IngredientAmount>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
}

impl RecipeView {
    pub async fn for_viewer(state: &AppState, recipe: &RecipeRow, viewer: Option<&UserRow>) -> ApiResult<Self> {
        let pool = &state.pool;

        let author = queries::find_user_by_id(pool, recipe.author_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Author"))?;
        let tags = queries::tags_for_recipe(pool, recipe.id).await?;
        let ingredients = queries::ingredients_for_recipe(pool, recipe.id).await?;

        let (is_favorited, is_in_shopping_cart) = match viewer {
            Some(viewer) => (
                relations::exists(pool, RelationKind::Favorite, viewer.id, recipe.id).await?,
                relations::exists(pool, RelationKind::Cart, viewer.id, recipe.id).await?,
            ),
            None => (false, false),
        };

        Ok(Self {
            id: recipe.id,
            tags,
            author: UserView::for_viewer(state, &author, viewer).await?,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name.clone(),
            image: state.config.media_link(&recipe.image),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
        })
    }
}

/// An author the viewer follows, with a preview of their recipes.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub author: UserView,
    pub recipes: Vec<RecipeShort>,
    pub recipes_count: i64,
}

impl SubscriptionView {
    pub async fn for_viewer(
        state: &AppState,
        author: &UserRow,
        viewer: &UserRow,
        recipes_limit: Option<i64>,
    ) -> ApiResult<Self> {
        let recipes = queries::recipes_by_author(&state.pool, author.id, recipes_limit).await?;
        let recipes_count = queries::count_recipes_by_author(&state.pool, author.id).await?;

        Ok(Self {
            author: UserView::for_viewer(state, author, Some(viewer)).await?,
            recipes: recipes
                .iter()
                .map(|recipe| RecipeShort::new(recipe, &state.config))
                .collect(),
            recipes_count,
        })
    }
}
