//! Database query functions (Data Access Objects).
//!
//! This module centralizes all direct database operations, providing reusable
//! functions for interacting with the database and abstracting the query logic
//! from higher-level services and API handlers.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor, SqlitePool};

use super::models::{
    Ingredient, IngredientAmount, NewUser, RecipeFields, RecipeFilter, RecipeRow, RelationKind,
    Tag, UserRow,
};

// Users

pub async fn insert_user<'e, E>(executor: E, user: &NewUser<'_>) -> Result<UserRow, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (email, username, first_name, last_name, password_hash) \
         VALUES (?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(user.email)
    .bind(user.username)
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(user.password_hash)
    .fetch_one(executor)
    .await
}

pub async fn find_user_by_id<'e, E>(executor: E, id: i64) -> Result<Option<UserRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_user_by_email<'e, E>(
    executor: E,
    email: &str,
) -> Result<Option<UserRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ? COLLATE NOCASE")
        .bind(email)
        .fetch_optional(executor)
        .await
}

pub async fn user_exists_with_username<'e, E>(executor: E, username: &str) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
        .bind(username)
        .fetch_one(executor)
        .await?;
    Ok(found != 0)
}

pub async fn count_users(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

pub async fn list_users(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY id LIMIT ? OFFSET ?")
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn update_password_hash<'e, E>(executor: E, user_id: i64, hash: &str) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(hash)
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn set_role_by_email<'e, E>(executor: E, email: &str, role: &str) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE users SET role = ? WHERE email = ? COLLATE NOCASE")
        .bind(role)
        .bind(email)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

// Tokens

pub async fn find_token_for_user<'e, E>(executor: E, user_id: i64) -> Result<Option<String>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar("SELECT key FROM auth_tokens WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

pub async fn insert_token<'e, E>(executor: E, key: &str, user_id: i64) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("INSERT INTO auth_tokens (key, user_id) VALUES (?, ?)")
        .bind(key)
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn delete_tokens_for_user<'e, E>(executor: E, user_id: i64) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM auth_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn find_user_by_token<'e, E>(executor: E, key: &str) -> Result<Option<UserRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, UserRow>(
        "SELECT u.* FROM users u JOIN auth_tokens t ON t.user_id = u.id WHERE t.key = ?",
    )
    .bind(key)
    .fetch_optional(executor)
    .await
}

// Tags

pub async fn list_tags(pool: &SqlitePool) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find_tag(pool: &SqlitePool, id: i64) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Inserts a tag, refreshing name and color when the slug already exists.
pub async fn upsert_tag<'e, E>(executor: E, name: &str, color: &str, slug: &str) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO tags (name, color, slug) VALUES (?, ?, ?) \
         ON CONFLICT (slug) DO UPDATE SET name = excluded.name, color = excluded.color",
    )
    .bind(name)
    .bind(color)
    .bind(slug)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn tags_for_recipe<'e, E>(executor: E, recipe_id: i64) -> Result<Vec<Tag>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Tag>(
        "SELECT t.* FROM tags t JOIN recipe_tags rt ON rt.tag_id = t.id \
         WHERE rt.recipe_id = ? ORDER BY t.id",
    )
    .bind(recipe_id)
    .fetch_all(executor)
    .await
}

// Ingredients

pub async fn list_ingredients(pool: &SqlitePool, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, sqlx::Error> {
    match name_prefix.filter(|prefix| !prefix.is_empty()) {
        Some(prefix) => {
            sqlx::query_as::<_, Ingredient>(
                "SELECT * FROM ingredients WHERE name_lower LIKE ? ESCAPE '\\' ORDER BY name, id",
            )
            .bind(format!("{}%", escape_like(&prefix.to_lowercase())))
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients ORDER BY name, id")
                .fetch_all(pool)
                .await
        }
    }
}

pub async fn find_ingredient(pool: &SqlitePool, id: i64) -> Result<Option<Ingredient>, sqlx::Error> {
    sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_ingredient<'e, E>(executor: E, name: &str, unit: &str) -> Result<Ingredient, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Ingredient>(
        "INSERT INTO ingredients (name, measurement_unit, name_lower) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(name)
    .bind(unit)
    .bind(name.to_lowercase())
    .fetch_one(executor)
    .await
}

/// Inserts the ingredient unless the same name and unit pair is already stored.
pub async fn insert_ingredient_if_missing<'e, E>(executor: E, name: &str, unit: &str) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "INSERT INTO ingredients (name, measurement_unit, name_lower) SELECT ?1, ?2, ?3 \
         WHERE NOT EXISTS (SELECT 1 FROM ingredients WHERE name = ?1 AND measurement_unit = ?2)",
    )
    .bind(name)
    .bind(unit)
    .bind(name.to_lowercase())
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_ingredient(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    unit: &str,
) -> Result<Option<Ingredient>, sqlx::Error> {
    sqlx::query_as::<_, Ingredient>(
        "UPDATE ingredients SET name = ?, measurement_unit = ?, name_lower = ? WHERE id = ? RETURNING *",
    )
    .bind(name)
    .bind(unit)
    .bind(name.to_lowercase())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_ingredient(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ingredients WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn ingredients_for_recipe<'e, E>(executor: E, recipe_id: i64) -> Result<Vec<IngredientAmount>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, IngredientAmount>(
        "SELECT i.id, i.name, i.measurement_unit, ri.amount \
         FROM recipe_ingredients ri JOIN ingredients i ON i.id = ri.ingredient_id \
         WHERE ri.recipe_id = ? ORDER BY i.name, i.id",
    )
    .bind(recipe_id)
    .fetch_all(executor)
    .await
}

/// Returns which of `ids` exist in `table`. `table` is always a literal from this crate.
pub async fn existing_ids(pool: &SqlitePool, table: &'static str, ids: &[i64]) -> Result<Vec<i64>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!("SELECT id FROM {table} WHERE id IN ("));
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    builder.build_query_scalar::<i64>().fetch_all(pool).await
}

// Recipes

pub async fn find_recipe<'e, E>(executor: E, id: i64) -> Result<Option<RecipeRow>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, RecipeRow>("SELECT * FROM recipes WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn insert_recipe(
    conn: &mut SqliteConnection,
    author_id: i64,
    fields: &RecipeFields<'_>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO recipes (author_id, name, text, cooking_time, image) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(author_id)
    .bind(fields.name)
    .bind(fields.text)
    .bind(fields.cooking_time)
    .bind(fields.image)
    .execute(&mut *conn)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update_recipe(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    fields: &RecipeFields<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE recipes SET name = ?, text = ?, cooking_time = ?, image = ? WHERE id = ?")
        .bind(fields.name)
        .bind(fields.text)
        .bind(fields.cooking_time)
        .bind(fields.image)
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn delete_recipe(pool: &SqlitePool, recipe_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn replace_recipe_tags(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    tag_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    for tag_id in tag_ids {
        sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES (?, ?)")
            .bind(recipe_id)
            .bind(*tag_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn replace_recipe_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    amounts: &[(i64, i64)],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    for (ingredient_id, amount) in amounts {
        sqlx::query("INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES (?, ?, ?)")
            .bind(recipe_id)
            .bind(*ingredient_id)
            .bind(*amount)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

fn push_recipe_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &RecipeFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(author) = filter.author {
        builder.push(" AND r.author_id = ").push_bind(author);
    }

    if !filter.tags.is_empty() {
        builder.push(
            " AND r.id IN (SELECT rt.recipe_id FROM recipe_tags rt \
             JOIN tags t ON t.id = rt.tag_id WHERE t.slug IN (",
        );
        let mut separated = builder.separated(", ");
        for slug in &filter.tags {
            separated.push_bind(slug.clone());
        }
        separated.push_unseparated("))");
    }

    if let Some(user_id) = filter.favorited_by {
        builder
            .push(" AND r.id IN (SELECT recipe_id FROM favorites WHERE user_id = ")
            .push_bind(user_id)
            .push(")");
    }

    if let Some(user_id) = filter.in_cart_of {
        builder
            .push(" AND r.id IN (SELECT recipe_id FROM carts WHERE user_id = ")
            .push_bind(user_id)
            .push(")");
    }
}

pub async fn count_recipes(pool: &SqlitePool, filter: &RecipeFilter) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM recipes r");
    push_recipe_filters(&mut builder, filter);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn list_recipes(
    pool: &SqlitePool,
    filter: &RecipeFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<RecipeRow>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT r.* FROM recipes r");
    push_recipe_filters(&mut builder, filter);
    builder
        .push(" ORDER BY r.id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    builder.build_query_as::<RecipeRow>().fetch_all(pool).await
}

/// Newest recipes of `author_id`; `limit` of `None` returns all of them.
pub async fn recipes_by_author(
    pool: &SqlitePool,
    author_id: i64,
    limit: Option<i64>,
) -> Result<Vec<RecipeRow>, sqlx::Error> {
    sqlx::query_as::<_, RecipeRow>("SELECT * FROM recipes WHERE author_id = ? ORDER BY id DESC LIMIT ?")
        .bind(author_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(pool)
        .await
}

pub async fn count_recipes_by_author(pool: &SqlitePool, author_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = ?")
        .bind(author_id)
        .fetch_one(pool)
        .await
}

// Relations

pub async fn insert_relation<'e, E>(
    executor: E,
    kind: RelationKind,
    user_id: i64,
    target_id: i64,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO {} (user_id, {}) VALUES (?, ?)",
        kind.table(),
        kind.target_column()
    );
    sqlx::query(&sql)
        .bind(user_id)
        .bind(target_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn delete_relation<'e, E>(
    executor: E,
    kind: RelationKind,
    user_id: i64,
    target_id: i64,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "DELETE FROM {} WHERE user_id = ? AND {} = ?",
        kind.table(),
        kind.target_column()
    );
    let result = sqlx::query(&sql)
        .bind(user_id)
        .bind(target_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn relation_exists<'e, E>(
    executor: E,
    kind: RelationKind,
    user_id: i64,
    target_id: i64,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE user_id = ? AND {} = ?)",
        kind.table(),
        kind.target_column()
    );
    let found: i64 = sqlx::query_scalar(&sql)
        .bind(user_id)
        .bind(target_id)
        .fetch_one(executor)
        .await?;
    Ok(found != 0)
}

pub async fn count_followed_authors(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub async fn list_followed_authors(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT u.* FROM users u JOIN follows f ON f.author_id = u.id \
         WHERE f.user_id = ? ORDER BY u.id LIMIT ? OFFSET ?",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Reads one row per (cart recipe, ingredient) for `user_id` and empties the
/// cart in the same transaction.
pub async fn take_cart_ingredients(pool: &SqlitePool, user_id: i64) -> Result<Vec<IngredientAmount>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query_as::<_, IngredientAmount>(
        "SELECT i.id, i.name, i.measurement_unit, ri.amount \
         FROM carts c \
         JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id \
         JOIN ingredients i ON i.id = ri.ingredient_id \
         WHERE c.user_id = ?",
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM carts WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(rows)
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
