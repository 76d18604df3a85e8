//! Bulk loading of reference data (ingredients, tags) from headerless CSV files.

use std::io::Read;

use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::database::queries;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {line}: {message}")]
    InvalidRow { line: u64, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub read: usize,
    pub inserted: usize,
}

#[derive(Debug, Deserialize)]
struct IngredientRecord {
    name: String,
    measurement_unit: String,
}

#[derive(Debug, Deserialize)]
struct TagRecord {
    name: String,
    color: String,
    slug: String,
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(source)
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or_default()
}

/// Reads `name,measurement_unit` rows and inserts the pairs not yet stored.
pub async fn import_ingredients<R: Read>(pool: &SqlitePool, source: R) -> Result<ImportSummary, ImportError> {
    let mut rows = Vec::new();
    for record in reader(source).records() {
        let record = record?;
        let row: IngredientRecord = record.deserialize(None)?;
        if row.name.is_empty() || row.measurement_unit.is_empty() {
            return Err(ImportError::InvalidRow {
                line: line_of(&record),
                message: "name and measurement unit are required".to_string(),
            });
        }
        rows.push(row);
    }

    let mut summary = ImportSummary {
        read: rows.len(),
        inserted: 0,
    };
    let mut tx = pool.begin().await?;
    for row in &rows {
        if queries::insert_ingredient_if_missing(&mut *tx, &row.name, &row.measurement_unit).await? {
            summary.inserted += 1;
        }
    }
    tx.commit().await?;

    info!(read = summary.read, inserted = summary.inserted, "ingredients imported");
    Ok(summary)
}

/// Reads `name,color,slug` rows; existing slugs are updated in place.
pub async fn import_tags<R: Read>(pool: &SqlitePool, source: R) -> Result<ImportSummary, ImportError> {
    let mut rows = Vec::new();
    for record in reader(source).records() {
        let record = record?;
        let row: TagRecord = record.deserialize(None)?;
        if !is_hex_color(&row.color) {
            return Err(ImportError::InvalidRow {
                line: line_of(&record),
                message: format!("invalid color {:?}", row.color),
            });
        }
        if row.slug.is_empty() || !row.slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(ImportError::InvalidRow {
                line: line_of(&record),
                message: format!("invalid slug {:?}", row.slug),
            });
        }
        rows.push(row);
    }

    let mut tx = pool.begin().await?;
    for row in &rows {
        queries::upsert_tag(&mut *tx, &row.name, &row.color, &row.slug).await?;
    }
    tx.commit().await?;

    let summary = ImportSummary {
        read: rows.len(),
        inserted: rows.len(),
    };
    info!(read = summary.read, "tags imported");
    Ok(summary)
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}
