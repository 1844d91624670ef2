//! Allocation registry - weekly allocation rates per category and the per-user income.
//!
//! Rates are always stored per week, whatever granularity the user was looking at when
//! they typed the amount: monthly entries are divided by 4.33, yearly ones by 52, and the
//! result is rounded to cents. A rate that resolves to zero (or below) removes the row
//! instead of storing it.
//!
//! Each user has one income sentinel row (`category = NULL`). It is written with the same
//! find-then-update-or-insert pattern as category rows.

use crate::{
    core::period::{Granularity, round_to_cents},
    entities::{Allocation, allocation},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Parses a user-entered amount. Anything that is not a finite number counts as zero.
#[must_use]
pub fn parse_display_amount(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            if !input.trim().is_empty() {
                warn!("Treating non-numeric amount '{}' as zero", input);
            }
            0.0
        }
    }
}

/// Every allocation row of the user, income sentinel included.
pub async fn list_allocations(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<allocation::Model>> {
    Allocation::find()
        .filter(allocation::Column::UserId.eq(user_id))
        .order_by_asc(allocation::Column::Category)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The allocation row for one category, if any.
pub async fn get_allocation(
    db: &DatabaseConnection,
    user_id: &str,
    category: &str,
) -> Result<Option<allocation::Model>> {
    Allocation::find()
        .filter(allocation::Column::UserId.eq(user_id))
        .filter(allocation::Column::Category.eq(category))
        .one(db)
        .await
        .map_err(Into::into)
}

/// The user's weekly income, zero when it was never saved.
pub async fn income_for_user(db: &DatabaseConnection, user_id: &str) -> Result<f64> {
    Ok(find_income_row(db, user_id)
        .await?
        .and_then(|row| row.income)
        .unwrap_or(0.0))
}

async fn find_income_row(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<allocation::Model>> {
    Allocation::find()
        .filter(allocation::Column::UserId.eq(user_id))
        .filter(allocation::Column::Category.is_null())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Stores the weekly rate for a category.
///
/// Returns the stored row, or `None` when the rate resolved to zero and the row was
/// removed. Updating an existing row keeps its `created_at`.
pub async fn save_allocation(
    db: &DatabaseConnection,
    user_id: &str,
    category: &str,
    weekly_rate: f64,
) -> Result<Option<allocation::Model>> {
    upsert_category_allocation(db, user_id, category, weekly_rate, None).await
}

#[instrument(skip(db))]
async fn upsert_category_allocation(
    db: &DatabaseConnection,
    user_id: &str,
    category: &str,
    weekly_rate: f64,
    income: Option<f64>,
) -> Result<Option<allocation::Model>> {
    if !weekly_rate.is_finite() {
        return Err(Error::InvalidInput {
            message: format!("Allocation for {category} must be a finite amount"),
        });
    }

    let rate = round_to_cents(weekly_rate);
    if rate <= 0.0 {
        let removed = delete_allocation(db, user_id, category).await?;
        debug!("Allocation for {} resolved to zero, removed {} rows", category, removed);
        return Ok(None);
    }

    let saved = match get_allocation(db, user_id, category).await? {
        Some(existing) => {
            let mut active: allocation::ActiveModel = existing.into();
            active.amount = Set(Some(rate));
            if income.is_some() {
                active.income = Set(income);
            }
            active.update(db).await?
        }
        None => {
            allocation::ActiveModel {
                user_id: Set(user_id.to_string()),
                category: Set(Some(category.to_string())),
                amount: Set(Some(rate)),
                income: Set(income),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    info!("Saved weekly allocation {:.2} for {}", rate, category);
    Ok(Some(saved))
}

/// Stores the user's weekly income on the income sentinel row, creating it if needed.
#[instrument(skip(db))]
pub async fn save_income(
    db: &DatabaseConnection,
    user_id: &str,
    weekly_income: f64,
) -> Result<allocation::Model> {
    if !weekly_income.is_finite() {
        return Err(Error::InvalidInput {
            message: "Income must be a finite amount".to_string(),
        });
    }
    let income = round_to_cents(weekly_income);

    let saved = match find_income_row(db, user_id).await? {
        Some(existing) => {
            let mut active: allocation::ActiveModel = existing.into();
            active.income = Set(Some(income));
            active.update(db).await?
        }
        None => {
            allocation::ActiveModel {
                user_id: Set(user_id.to_string()),
                category: Set(None),
                amount: Set(None),
                income: Set(Some(income)),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    info!("Saved weekly income {:.2}", income);
    Ok(saved)
}

/// Removes the allocation row of a category. Returns the number of rows deleted.
pub async fn delete_allocation(
    db: &DatabaseConnection,
    user_id: &str,
    category: &str,
) -> Result<u64> {
    let result = Allocation::delete_many()
        .filter(allocation::Column::UserId.eq(user_id))
        .filter(allocation::Column::Category.eq(category))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// One category amount as typed in the budget editor.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetEntry {
    /// Custom category name
    pub category: String,
    /// Amount in the editor's granularity
    pub display_amount: f64,
}

/// Result of [`save_budget`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SaveBudgetOutcome {
    /// Income stored on the sentinel row, per week
    pub weekly_income: f64,
    /// Category rows inserted or updated
    pub saved: usize,
    /// Category rows removed because their amount resolved to zero
    pub removed: usize,
}

/// Saves the whole budget editor: the income and every category amount, all converted
/// from `granularity` to weekly. Category rows also record the income current at save time.
///
/// Writes are independent; a failed removal is logged and skipped, any other failure
/// stops the save with earlier writes kept.
///
/// # Arguments
/// * `db` - Database connection
/// * `user_id` - Owner of the budget
/// * `granularity` - Period the displayed amounts are expressed in
/// * `income_display` - Income as shown in the editor
/// * `entries` - Category amounts as shown in the editor
///
/// # Returns
/// A [`SaveBudgetOutcome`] with the stored weekly income and the saved/removed counts
#[instrument(skip(db, entries), fields(entries = entries.len()))]
pub async fn save_budget(
    db: &DatabaseConnection,
    user_id: &str,
    granularity: Granularity,
    income_display: f64,
    entries: &[BudgetEntry],
) -> Result<SaveBudgetOutcome> {
    let weekly_income = granularity.to_weekly(income_display);
    save_income(db, user_id, weekly_income).await?;

    let mut outcome = SaveBudgetOutcome {
        weekly_income,
        ..SaveBudgetOutcome::default()
    };

    for entry in entries {
        let weekly = granularity.to_weekly(entry.display_amount);
        if weekly > 0.0 {
            upsert_category_allocation(db, user_id, &entry.category, weekly, Some(weekly_income))
                .await?;
            outcome.saved += 1;
        } else {
            match delete_allocation(db, user_id, &entry.category).await {
                Ok(_) => outcome.removed += 1,
                Err(e) => warn!("Failed to remove allocation for {}: {}", entry.category, e),
            }
        }
    }

    info!(
        "Budget saved for {}: {} allocations, {} removed",
        user_id, outcome.saved, outcome.removed
    );
    Ok(outcome)
}

/// A category row in the allocation editor.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationEditorRow {
    /// Custom category name
    pub category: String,
    /// Stored weekly rate, zero when unallocated
    pub weekly_rate: f64,
    /// Rate converted to the editor's granularity, rounded to cents
    pub display_amount: f64,
}

/// Everything the budget editor shows for one granularity.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationEditor {
    /// Granularity amounts are shown in
    pub granularity: Granularity,
    /// Stored weekly income
    pub weekly_income: f64,
    /// Income in the editor's granularity
    pub display_income: f64,
    /// One row per known category, sorted by name
    pub rows: Vec<AllocationEditorRow>,
}

impl AllocationEditor {
    /// Sum of the display amounts of all rows.
    #[must_use]
    pub fn total_allocated(&self) -> f64 {
        round_to_cents(self.rows.iter().map(|row| row.display_amount).sum())
    }

    /// Income not yet assigned to a category (negative when over-allocated).
    #[must_use]
    pub fn remaining_income(&self) -> f64 {
        round_to_cents(self.display_income - self.total_allocated())
    }
}

/// Loads the allocation editor for `granularity`: every category from the directory or
/// with a stored allocation, with its rate converted back from weekly.
pub async fn load_allocation_editor(
    db: &DatabaseConnection,
    user_id: &str,
    granularity: Granularity,
) -> Result<AllocationEditor> {
    let allocations = list_allocations(db, user_id).await?;
    let mut names: BTreeSet<String> = crate::core::category::category_names(db, user_id)
        .await?
        .into_iter()
        .collect();
    names.extend(allocations.iter().filter_map(|row| row.category.clone()));

    let weekly_income = allocations
        .iter()
        .find(|row| row.is_income_sentinel())
        .and_then(|row| row.income)
        .unwrap_or(0.0);

    let rows = names
        .into_iter()
        .map(|category| {
            let weekly_rate = allocations
                .iter()
                .find(|row| row.category.as_deref() == Some(category.as_str()))
                .and_then(|row| row.amount)
                .unwrap_or(0.0);
            AllocationEditorRow {
                display_amount: granularity.from_weekly(weekly_rate),
                weekly_rate,
                category,
            }
        })
        .collect();

    Ok(AllocationEditor {
        granularity,
        weekly_income,
        display_income: granularity.from_weekly(weekly_income),
        rows,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_parse_display_amount() {
        assert_eq!(parse_display_amount("12.50"), 12.5);
        assert_eq!(parse_display_amount(" 433 "), 433.0);
        assert_eq!(parse_display_amount("abc"), 0.0);
        assert_eq!(parse_display_amount(""), 0.0);
        assert_eq!(parse_display_amount("NaN"), 0.0);
        assert_eq!(parse_display_amount("inf"), 0.0);
    }

    #[tokio::test]
    async fn test_save_allocation_insert_then_update() -> Result<()> {
        let db = setup_test_db().await?;
        let first = save_allocation(&db, TEST_USER, "Food", 100.0).await?.unwrap();
        let second = save_allocation(&db, TEST_USER, "Food", 80.004).await?.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.amount, Some(80.0));
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(list_allocations(&db, TEST_USER).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_zero_rate_removes_row() -> Result<()> {
        let db = setup_test_db().await?;
        save_allocation(&db, TEST_USER, "Food", 100.0).await?;
        save_allocation(&db, TEST_USER, "Rent", 300.0).await?;

        let removed = save_allocation(&db, TEST_USER, "Food", 0.0).await?;
        assert!(removed.is_none());

        let rows = list_allocations(&db, TEST_USER).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category.as_deref(), Some("Rent"));

        // Rounds to zero as well
        assert!(save_allocation(&db, TEST_USER, "Rent", 0.001).await?.is_none());
        assert!(list_allocations(&db, TEST_USER).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_non_finite_rate_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let result = save_allocation(&db, TEST_USER, "Food", f64::NAN).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        let result = save_income(&db, TEST_USER, f64::INFINITY).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_income_sentinel_is_unique() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(income_for_user(&db, TEST_USER).await?, 0.0);

        let first = save_income(&db, TEST_USER, 500.0).await?;
        let second = save_income(&db, TEST_USER, 650.0).await?;
        assert_eq!(first.id, second.id);
        assert!(second.is_income_sentinel());
        assert_eq!(second.amount, None);
        assert_eq!(income_for_user(&db, TEST_USER).await?, 650.0);

        let rows = list_allocations(&db, TEST_USER).await?;
        assert_eq!(rows.iter().filter(|row| row.is_income_sentinel()).count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_save_round_trips_to_weekly() -> Result<()> {
        let db = setup_test_db().await?;
        let entries = vec![BudgetEntry {
            category: "Food".to_string(),
            display_amount: parse_display_amount("433.00"),
        }];
        let outcome = save_budget(&db, TEST_USER, Granularity::Monthly, 2165.0, &entries).await?;
        assert_eq!(outcome.weekly_income, 500.0);
        assert_eq!(outcome.saved, 1);

        let stored = get_allocation(&db, TEST_USER, "Food").await?.unwrap();
        assert_eq!(stored.amount, Some(100.0));
        assert_eq!(stored.income, Some(500.0));

        let weekly = load_allocation_editor(&db, TEST_USER, Granularity::Weekly).await?;
        assert_eq!(weekly.rows[0].display_amount, 100.0);
        assert_eq!(weekly.display_income, 500.0);

        let monthly = load_allocation_editor(&db, TEST_USER, Granularity::Monthly).await?;
        assert_eq!(monthly.rows[0].display_amount, 433.0);
        assert_eq!(monthly.remaining_income(), 1732.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_budget_removes_zeroed_categories() -> Result<()> {
        let db = setup_test_db().await?;
        save_allocation(&db, TEST_USER, "Food", 100.0).await?;

        let entries = vec![
            BudgetEntry {
                category: "Food".to_string(),
                display_amount: 0.0,
            },
            BudgetEntry {
                category: "Rent".to_string(),
                display_amount: 5200.0,
            },
        ];
        let outcome = save_budget(&db, TEST_USER, Granularity::Yearly, 0.0, &entries).await?;
        assert_eq!(outcome.saved, 1);
        assert_eq!(outcome.removed, 1);

        assert!(get_allocation(&db, TEST_USER, "Food").await?.is_none());
        let rent = get_allocation(&db, TEST_USER, "Rent").await?.unwrap();
        assert_eq!(rent.amount, Some(100.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_editor_lists_directory_and_allocated_categories() -> Result<()> {
        let db = setup_test_db().await?;
        crate::core::category::add_category_mapping(&db, TEST_USER, "Travel", "TRAVEL_FLIGHTS")
            .await?;
        save_allocation(&db, TEST_USER, "Food", 25.0).await?;

        let editor = load_allocation_editor(&db, TEST_USER, Granularity::Yearly).await?;
        let names: Vec<&str> = editor.rows.iter().map(|row| row.category.as_str()).collect();
        assert_eq!(names, vec!["Food", "Travel"]);
        assert_eq!(editor.rows[0].display_amount, 1300.0);
        assert_eq!(editor.rows[1].weekly_rate, 0.0);
        assert_eq!(editor.total_allocated(), 1300.0);
        assert_eq!(editor.remaining_income(), -1300.0);
        Ok(())
    }
}
