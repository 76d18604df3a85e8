//! Logic for turning a user's cart into a shopping list.
//!
//! Every (cart recipe, ingredient) pair is collected, amounts are summed per
//! ingredient and the totals are rendered as `"{name} - {amount} {unit}"`
//! lines. Downloading the list empties the cart.

use std::collections::BTreeMap;

use sqlx::SqlitePool;
use tracing::info;

use crate::database::{models::IngredientAmount, queries};

pub const FILE_NAME: &str = "shopping_list.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    pub ingredient_id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: u64,
}

/// Groups entries by ingredient id and sums their amounts.
///
/// Items are ordered by name, then id, so the result depends only on the
/// multiset of entries and never on their order.
pub fn aggregate<'a, I>(entries: I) -> Vec<ShoppingItem>
where
    I: IntoIterator<Item = &'a IngredientAmount>,
{
    let mut totals: BTreeMap<i64, ShoppingItem> = BTreeMap::new();

    for entry in entries {
        let amount = u64::try_from(entry.amount).unwrap_or(0);
        totals
            .entry(entry.id)
            .and_modify(|item| item.amount += amount)
            .or_insert_with(|| ShoppingItem {
                ingredient_id: entry.id,
                name: entry.name.clone(),
                measurement_unit: entry.measurement_unit.clone(),
                amount,
            });
    }

    let mut items: Vec<ShoppingItem> = totals.into_values().collect();
    items.sort_by(|a, b| a.name.cmp(&b.name).then(a.ingredient_id.cmp(&b.ingredient_id)));
    items
}

pub fn render(items: &[ShoppingItem]) -> String {
    items
        .iter()
        .map(|item| format!("{} - {} {}\n", item.name, item.amount, item.measurement_unit))
        .collect()
}

/// Builds the shopping list for `user_id` and clears their cart.
///
/// Reading and clearing happen in one transaction. An empty cart yields an
/// empty list, so repeating the download is harmless.
pub async fn download(pool: &SqlitePool, user_id: i64) -> Result<String, sqlx::Error> {
    let entries = queries::take_cart_ingredients(pool, user_id).await?;
    let items = aggregate(&entries);

    info!(
        user_id,
        entries = entries.len(),
        items = items.len(),
        "shopping list generated, cart cleared"
    );

    Ok(render(&items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, name: &str, unit: &str, amount: i64) -> IngredientAmount {
        IngredientAmount {
            id,
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn sums_amounts_per_ingredient() {
        let entries = vec![
            entry(1, "sugar", "g", 100),
            entry(2, "milk", "ml", 250),
            entry(1, "sugar", "g", 50),
        ];

        let items = aggregate(&entries);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "milk");
        assert_eq!(items[0].amount, 250);
        assert_eq!(items[1].name, "sugar");
        assert_eq!(items[1].amount, 150);
    }

    #[test]
    fn order_of_entries_does_not_matter() {
        let entries = vec![
            entry(3, "eggs", "pcs", 2),
            entry(1, "sugar", "g", 100),
            entry(3, "eggs", "pcs", 4),
            entry(2, "flour", "g", 300),
            entry(1, "sugar", "g", 20),
        ];
        let mut reversed = entries.clone();
        reversed.reverse();
        let mut rotated = entries.clone();
        rotated.rotate_left(2);

        let expected = aggregate(&entries);
        assert_eq!(aggregate(&reversed), expected);
        assert_eq!(aggregate(&rotated), expected);
    }

    #[test]
    fn same_name_different_ingredients_stay_separate() {
        let entries = vec![entry(1, "salt", "g", 5), entry(2, "salt", "pinch", 1)];

        let items = aggregate(&entries);

        assert_eq!(items.len(), 2);
        assert_eq!(render(&items), "salt - 5 g\nsalt - 1 pinch\n");
    }

    #[test]
    fn large_totals_do_not_overflow() {
        let entries: Vec<_> = (0..1000).map(|_| entry(1, "water", "ml", 10_000)).collect();

        let items = aggregate(&entries);

        assert_eq!(items[0].amount, 10_000_000);
    }

    #[test]
    fn renders_lines() {
        let items = aggregate(&[entry(7, "butter", "g", 200)]);
        assert_eq!(render(&items), "butter - 200 g\n");
    }

    #[test]
    fn empty_cart_renders_empty_text() {
        assert!(aggregate(&Vec::<IngredientAmount>::new()).is_empty());
        assert_eq!(render(&[]), "");
    }
}
