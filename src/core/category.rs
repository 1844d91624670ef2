//! Category directory - maps raw aggregator subcategories onto user-defined categories.
//!
//! Adding a mapping is not only a directory change: every stored transaction carrying the
//! mapped subcategory is relabelled so existing history lands in the new category.
//! Category names are compared by exact, case- and whitespace-sensitive equality after the
//! input has been trimmed once on the way in.

use crate::{
    config::settings::CategorySeed,
    core::transaction::relabel_subcategory,
    entities::{Category, category},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::{HashMap, HashSet};
use tracing::{error, info, instrument, warn};

/// A custom category and the raw labels that roll up into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    /// Custom category name
    pub name: String,
    /// Raw subcategory labels, sorted
    pub subcategories: Vec<String>,
}

/// Result of [`add_category_mapping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingOutcome {
    /// The stored mapping row
    pub mapping: category::Model,
    /// Transactions relabelled into the category
    pub relabeled: u64,
}

/// Result of [`seed_default_categories`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Mappings inserted
    pub added: usize,
    /// Seeds skipped because the user already had the exact pair
    pub already_present: usize,
    /// Transactions relabelled across all inserted mappings
    pub relabeled: u64,
}

/// Lists the user's categories with their subcategories, sorted by category name.
pub async fn list_categories(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<CategoryGroup>> {
    let rows = Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::CustomCategory)
        .order_by_asc(category::Column::Subcategory)
        .all(db)
        .await?;

    let mut groups: Vec<CategoryGroup> = Vec::new();
    for row in rows {
        match groups.last_mut() {
            Some(group) if group.name == row.custom_category => {
                group.subcategories.push(row.subcategory);
            }
            _ => groups.push(CategoryGroup {
                name: row.custom_category,
                subcategories: vec![row.subcategory],
            }),
        }
    }
    Ok(groups)
}

/// Distinct category names for the user, sorted.
pub async fn category_names(db: &DatabaseConnection, user_id: &str) -> Result<Vec<String>> {
    Ok(list_categories(db, user_id)
        .await?
        .into_iter()
        .map(|group| group.name)
        .collect())
}

/// Subcategory → category map for the user. When a label is mapped more than once, the
/// newest mapping wins, matching the relabel done when that mapping was added.
pub async fn subcategory_lookup<C>(db: &C, user_id: &str) -> Result<HashMap<String, String>>
where
    C: ConnectionTrait,
{
    let rows = Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?;

    let mut lookup = HashMap::new();
    for row in rows {
        lookup.insert(row.subcategory, row.custom_category);
    }
    Ok(lookup)
}

/// Category a raw subcategory currently maps to, if any.
pub async fn category_for_subcategory(
    db: &DatabaseConnection,
    user_id: &str,
    subcategory: &str,
) -> Result<Option<String>> {
    Ok(Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::Subcategory.eq(subcategory))
        .order_by_desc(category::Column::Id)
        .one(db)
        .await?
        .map(|row| row.custom_category))
}

/// Adds a `(category, subcategory)` mapping and relabels matching transactions.
///
/// Both values are trimmed; empty values and exact duplicate pairs are rejected. The insert
/// and the relabel are separate writes: if the relabel fails the mapping stays in place and
/// the error says so.
///
/// # Arguments
/// * `db` - Database connection
/// * `user_id` - Owner of the mapping
/// * `custom_category` - User-facing category name
/// * `subcategory` - Aggregator subcategory to file under it
///
/// # Returns
/// A [`MappingOutcome`] with the stored mapping and the number of relabeled transactions
#[instrument(skip(db))]
pub async fn add_category_mapping(
    db: &DatabaseConnection,
    user_id: &str,
    custom_category: &str,
    subcategory: &str,
) -> Result<MappingOutcome> {
    let custom_category = custom_category.trim();
    let subcategory = subcategory.trim();
    if custom_category.is_empty() || subcategory.is_empty() {
        return Err(Error::InvalidInput {
            message: "Both category and subcategory are required".to_string(),
        });
    }

    let existing = Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::CustomCategory.eq(custom_category))
        .filter(category::Column::Subcategory.eq(subcategory))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicateMapping {
            category: custom_category.to_string(),
            subcategory: subcategory.to_string(),
        });
    }

    let mapping = category::ActiveModel {
        user_id: Set(user_id.to_string()),
        custom_category: Set(custom_category.to_string()),
        subcategory: Set(subcategory.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let relabeled = relabel_subcategory(db, user_id, subcategory, custom_category)
        .await
        .map_err(|e| {
            error!(
                "Mapping {} -> {} saved but relabelling failed: {}",
                custom_category, subcategory, e
            );
            Error::Database {
                message: format!(
                    "Mapping '{custom_category}' -> '{subcategory}' was saved but existing transactions could not be updated: {e}"
                ),
            }
        })?;

    info!(
        "Added mapping {} -> {} ({} transactions relabelled)",
        custom_category, subcategory, relabeled
    );
    Ok(MappingOutcome { mapping, relabeled })
}

/// Removes a category and all of its subcategory mappings. Returns the number of mappings
/// deleted. Transactions keep their current `custom_category`.
#[instrument(skip(db))]
pub async fn delete_category(
    db: &DatabaseConnection,
    user_id: &str,
    custom_category: &str,
) -> Result<u64> {
    let result = Category::delete_many()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::CustomCategory.eq(custom_category))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::CategoryNotFound {
            name: custom_category.to_string(),
        });
    }
    info!(
        "Deleted category {} ({} mappings)",
        custom_category, result.rows_affected
    );
    Ok(result.rows_affected)
}

/// Inserts every seed mapping the user does not have yet, then relabels transactions for
/// each inserted mapping. A relabel failure for one mapping is logged and does not stop
/// the others.
#[instrument(skip(db, seeds), fields(seeds = seeds.len()))]
pub async fn seed_default_categories(
    db: &DatabaseConnection,
    user_id: &str,
    seeds: &[CategorySeed],
) -> Result<SeedOutcome> {
    let mut existing: HashSet<(String, String)> = Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| (row.custom_category, row.subcategory))
        .collect();

    let to_add: Vec<&CategorySeed> = seeds
        .iter()
        .filter(|seed| existing.insert((seed.category.clone(), seed.subcategory.clone())))
        .collect();

    let mut outcome = SeedOutcome {
        added: to_add.len(),
        already_present: seeds.len() - to_add.len(),
        relabeled: 0,
    };
    if to_add.is_empty() {
        info!("All default categories already exist for {}", user_id);
        return Ok(outcome);
    }

    let now = Utc::now();
    let rows = to_add.iter().map(|seed| category::ActiveModel {
        user_id: Set(user_id.to_string()),
        custom_category: Set(seed.category.clone()),
        subcategory: Set(seed.subcategory.clone()),
        created_at: Set(now),
        ..Default::default()
    });
    Category::insert_many(rows).exec(db).await?;

    for seed in to_add {
        match relabel_subcategory(db, user_id, &seed.subcategory, &seed.category).await {
            Ok(count) => outcome.relabeled += count,
            Err(e) => warn!(
                "Failed to relabel transactions for {} -> {}: {}",
                seed.category, seed.subcategory, e
            ),
        }
    }

    info!(
        "Seeded {} default mappings for {} ({} transactions relabelled)",
        outcome.added, user_id, outcome.relabeled
    );
    Ok(outcome)
}
