//! Balance engine - cumulative allocation-vs-spend balance per category.
//!
//! A category's balance is everything allocated to it since the user's first categorized
//! expense, minus everything spent in it, both up to the end of the selected period:
//!
//! ```text
//! total_allocated = weeks_between(earliest categorized expense, period end) * weekly rate
//! balance         = total_allocated - total spent up to period end
//! ```
//!
//! The earliest date is shared by all categories, so a category allocated today still
//! accrues from the user's first transaction. The per-period figures (`period_allocation`,
//! `period_spend`) are display values for the selected window only and never feed the
//! balance.
//!
//! [`compute_balances`] is pure; [`load_balances`] and [`load_category_detail`] are the
//! store-facing entry points and turn store failures into degraded reports.

use crate::{
    core::{
        allocation,
        auth::{AuthProvider, require_user},
        category,
        period::{Granularity, Period, compute_bounds, round_to_cents, weeks_between},
        transaction::{TransactionQuery, query_transactions},
    },
    entities::{allocation::Model as AllocationModel, transaction::Model as TransactionModel},
    errors::Result,
};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, error, instrument};

/// Everything [`compute_balances`] needs, already fetched from the store.
#[derive(Debug, Clone, Copy)]
pub struct BalanceInputs<'a> {
    /// Selected period
    pub period: Period,
    /// Category names from the directory
    pub categories: &'a [String],
    /// All allocation rows of the user (the income sentinel is ignored)
    pub allocations: &'a [AllocationModel],
    /// Expenses dated on or before the period end, across all time
    pub history: &'a [TransactionModel],
    /// Expenses dated inside the period
    pub in_period: &'a [TransactionModel],
    /// Effective date for categories without a stored allocation
    pub now: DateTime<Utc>,
}

/// Computed figures for one category in one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSnapshot {
    /// Custom category name
    pub category: String,
    /// Stored weekly rate, zero when unallocated
    pub weekly_allocation: f64,
    /// When the allocation started counting
    pub allocation_effective_date: DateTime<Utc>,
    /// Allocation attributed to the selected period
    pub period_allocation: f64,
    /// Spend inside the selected period
    pub period_spend: f64,
    /// Allocation accrued from the earliest categorized expense to the period end
    pub total_allocated: f64,
    /// Spend up to the period end
    pub total_spent: f64,
    /// `total_allocated - total_spent`
    pub balance: f64,
}

impl BalanceSnapshot {
    /// Balance before this period's allocation and spend were applied.
    #[must_use]
    pub fn starting_balance(&self) -> f64 {
        round_to_cents(self.balance + self.period_spend - self.period_allocation)
    }
}

/// Whether an allocation counts towards the selected period's display allocation.
///
/// Only `period_allocation` is gated on the effective date. The cumulative total ignores
/// it and accrues from the earliest categorized expense.
#[must_use]
pub fn accrues_in_period(effective_date: DateTime<Utc>, period: &Period) -> bool {
    effective_date <= period.end
}

/// Date of the earliest categorized expense on or before the period end.
#[must_use]
pub fn global_earliest_transaction_date(
    history: &[TransactionModel],
    period: &Period,
) -> Option<DateTime<Utc>> {
    history
        .iter()
        .filter(|tx| is_expense(tx) && tx.date <= period.end && is_categorized(tx))
        .map(|tx| tx.date)
        .min()
}

fn is_expense(tx: &TransactionModel) -> bool {
    tx.amount >= 0.0
}

fn is_categorized(tx: &TransactionModel) -> bool {
    tx.custom_category.as_deref().is_some_and(|category| !category.is_empty())
}

fn spent_in(transactions: &[TransactionModel], category: &str) -> f64 {
    transactions
        .iter()
        .filter(|tx| tx.custom_category.as_deref() == Some(category))
        .map(|tx| tx.amount)
        .sum()
}

/// Computes one snapshot per category known to the directory or the allocations, sorted
/// by name (case-sensitive).
#[must_use]
pub fn compute_balances(inputs: &BalanceInputs<'_>) -> Vec<BalanceSnapshot> {
    let period = inputs.period;
    let global_earliest = global_earliest_transaction_date(inputs.history, &period);
    let weeks = global_earliest.map_or(0, |earliest| weeks_between(earliest, period.end));

    let history: Vec<TransactionModel> = inputs
        .history
        .iter()
        .filter(|tx| is_expense(tx) && tx.date <= period.end)
        .cloned()
        .collect();
    let in_period: Vec<TransactionModel> = inputs
        .in_period
        .iter()
        .filter(|tx| is_expense(tx) && period.contains(tx.date))
        .cloned()
        .collect();

    let names: BTreeSet<&str> = inputs
        .categories
        .iter()
        .map(String::as_str)
        .chain(inputs.allocations.iter().filter_map(|row| row.category.as_deref()))
        .collect();

    names
        .into_iter()
        .map(|name| {
            let stored = inputs
                .allocations
                .iter()
                .find(|row| row.category.as_deref() == Some(name));
            let weekly_allocation = stored.and_then(|row| row.amount).unwrap_or(0.0);
            let allocation_effective_date = stored.map_or(inputs.now, |row| row.created_at);

            let period_allocation = if accrues_in_period(allocation_effective_date, &period) {
                period.granularity.scale_weekly(weekly_allocation)
            } else {
                0.0
            };

            #[allow(clippy::cast_precision_loss)]
            let total_allocated = if global_earliest.is_some() && weekly_allocation > 0.0 {
                round_to_cents(weeks as f64 * weekly_allocation)
            } else {
                0.0
            };
            let total_spent = round_to_cents(spent_in(&history, name));

            BalanceSnapshot {
                category: name.to_string(),
                weekly_allocation,
                allocation_effective_date,
                period_allocation: round_to_cents(period_allocation),
                period_spend: round_to_cents(spent_in(&in_period, name)),
                total_allocated,
                total_spent,
                balance: round_to_cents(total_allocated - total_spent),
            }
        })
        .collect()
}

/// What the user is looking at: a granularity and a date inside the wanted period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceRequest {
    /// Selected granularity
    pub granularity: Granularity,
    /// Any date inside the wanted period
    pub reference_date: NaiveDate,
    /// First day of a week
    pub week_start: Weekday,
}

impl BalanceRequest {
    /// A request with weeks starting on Sunday.
    #[must_use]
    pub const fn new(granularity: Granularity, reference_date: NaiveDate) -> Self {
        Self {
            granularity,
            reference_date,
            week_start: Weekday::Sun,
        }
    }

    /// Overrides the first day of the week.
    #[must_use]
    pub const fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    /// Bounds of the requested period.
    #[must_use]
    pub fn period(&self) -> Period {
        compute_bounds(self.reference_date, self.granularity, self.week_start)
    }
}

/// Balances for one period. `error` is set when the store could not be read, in which
/// case `snapshots` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    /// Period the balances were computed for
    pub period: Period,
    /// One snapshot per category
    pub snapshots: Vec<BalanceSnapshot>,
    /// Store failure message, if the computation was degraded
    pub error: Option<String>,
}

impl BalanceReport {
    fn degraded(period: Period, message: String) -> Self {
        Self {
            period,
            snapshots: Vec::new(),
            error: Some(message),
        }
    }

    /// Snapshot of one category.
    #[must_use]
    pub fn snapshot(&self, category: &str) -> Option<&BalanceSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.category == category)
    }
}

struct StoredInputs {
    categories: Vec<String>,
    allocations: Vec<AllocationModel>,
    history: Vec<TransactionModel>,
}

impl StoredInputs {
    async fn fetch(db: &DatabaseConnection, user_id: &str, period: &Period) -> Result<Self> {
        let categories = category::category_names(db, user_id).await?;
        let allocations = allocation::list_allocations(db, user_id).await?;
        let history =
            query_transactions(db, &TransactionQuery::for_user(user_id).expenses().until(period.end))
                .await?;
        Ok(Self {
            categories,
            allocations,
            history,
        })
    }

    fn in_period(&self, period: &Period) -> Vec<TransactionModel> {
        self.history
            .iter()
            .filter(|tx| period.contains(tx.date))
            .cloned()
            .collect()
    }

    fn compute(&self, period: Period, in_period: &[TransactionModel]) -> Vec<BalanceSnapshot> {
        compute_balances(&BalanceInputs {
            period,
            categories: &self.categories,
            allocations: &self.allocations,
            history: &self.history,
            in_period,
            now: Utc::now(),
        })
    }
}

/// Loads and computes the balances of the signed-in user for the requested period.
///
/// Fails only with [`crate::errors::Error::NotAuthenticated`]; store failures come back
/// as a report with `error` set.
///
/// # Arguments
/// * `db` - Database connection
/// * `auth` - Source of the signed-in user id
/// * `request` - Granularity, anchor date and week start of the period to show
///
/// # Returns
/// A [`BalanceReport`] with one snapshot per category, or `error` set when degraded
#[instrument(skip(db, auth))]
pub async fn load_balances(
    db: &DatabaseConnection,
    auth: &dyn AuthProvider,
    request: &BalanceRequest,
) -> Result<BalanceReport> {
    let user_id = require_user(auth)?;
    let period = request.period();

    let stored = match StoredInputs::fetch(db, &user_id, &period).await {
        Ok(stored) => stored,
        Err(e) => {
            error!("Failed to load balance inputs for {}: {}", user_id, e);
            return Ok(BalanceReport::degraded(period, e.to_string()));
        }
    };

    let in_period = stored.in_period(&period);
    let snapshots = stored.compute(period, &in_period);
    debug!(
        "Computed {} balances for {} ({} transactions in period)",
        snapshots.len(),
        period.granularity,
        in_period.len()
    );

    Ok(BalanceReport {
        period,
        snapshots,
        error: None,
    })
}

/// Drill-down for one category: its expenses in the period and its figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDetail {
    /// Period the detail covers
    pub period: Period,
    /// Category name
    pub category: String,
    /// Expenses of the category inside the period, oldest first
    pub transactions: Vec<TransactionModel>,
    /// Figures of the category, `None` when the store could not be read
    pub snapshot: Option<BalanceSnapshot>,
    /// Balance before the period's allocation and spend
    pub starting_balance: f64,
    /// Store failure message, if the detail was degraded
    pub error: Option<String>,
}

/// Loads the drill-down of `category` for the requested period.
#[instrument(skip(db, auth))]
pub async fn load_category_detail(
    db: &DatabaseConnection,
    auth: &dyn AuthProvider,
    request: &BalanceRequest,
    category: &str,
) -> Result<CategoryDetail> {
    let user_id = require_user(auth)?;
    let period = request.period();

    let mut stored = match StoredInputs::fetch(db, &user_id, &period).await {
        Ok(stored) => stored,
        Err(e) => {
            error!("Failed to load detail for {} ({}): {}", category, user_id, e);
            return Ok(CategoryDetail {
                period,
                category: category.to_string(),
                transactions: Vec::new(),
                snapshot: None,
                starting_balance: 0.0,
                error: Some(e.to_string()),
            });
        }
    };

    if !stored.categories.iter().any(|name| name == category) {
        stored.categories.push(category.to_string());
    }

    let in_period = stored.in_period(&period);
    let snapshot = stored
        .compute(period, &in_period)
        .into_iter()
        .find(|snapshot| snapshot.category == category);
    let transactions: Vec<TransactionModel> = in_period
        .into_iter()
        .filter(|tx| tx.custom_category.as_deref() == Some(category))
        .collect();

    Ok(CategoryDetail {
        period,
        category: category.to_string(),
        starting_balance: snapshot.as_ref().map_or(0.0, BalanceSnapshot::starting_balance),
        transactions,
        snapshot,
        error: None,
    })
}
