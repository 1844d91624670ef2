//! Transaction repository - read queries over imported transactions plus the two writes the
//! engine is allowed to make: storing newly imported rows and backfilling `custom_category`.
//!
//! Query results are always in chronological order (oldest first, ties broken by id), so
//! callers can rely on the first row being the earliest.

use crate::{
    entities::{Transaction, transaction},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};

/// Filter for [`query_transactions`]. Unset fields do not restrict the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Owner of the transactions
    pub user_id: String,
    /// Exact `custom_category` match
    pub category: Option<String>,
    /// Inclusive lower bound on `date`
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `date`
    pub date_to: Option<DateTime<Utc>>,
    /// Inclusive lower bound on `amount`
    pub min_amount: Option<f64>,
}

impl TransactionQuery {
    /// All transactions of `user_id`.
    #[must_use]
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Restricts to expenses (amount >= 0).
    #[must_use]
    pub const fn expenses(mut self) -> Self {
        self.min_amount = Some(0.0);
        self
    }

    /// Restricts to one custom category.
    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts to transactions on or after `from`.
    #[must_use]
    pub const fn from(mut self, from: DateTime<Utc>) -> Self {
        self.date_from = Some(from);
        self
    }

    /// Restricts to transactions on or before `to`.
    #[must_use]
    pub const fn until(mut self, to: DateTime<Utc>) -> Self {
        self.date_to = Some(to);
        self
    }
}

/// Runs a [`TransactionQuery`], returning rows oldest first.
#[instrument(skip(db), fields(user_id = %query.user_id))]
pub async fn query_transactions(
    db: &DatabaseConnection,
    query: &TransactionQuery,
) -> Result<Vec<transaction::Model>> {
    let mut select = Transaction::find().filter(transaction::Column::UserId.eq(&query.user_id));

    if let Some(category) = &query.category {
        select = select.filter(transaction::Column::CustomCategory.eq(category));
    }
    if let Some(from) = query.date_from {
        select = select.filter(transaction::Column::Date.gte(from));
    }
    if let Some(to) = query.date_to {
        select = select.filter(transaction::Column::Date.lte(to));
    }
    if let Some(min_amount) = query.min_amount {
        select = select.filter(transaction::Column::Amount.gte(min_amount));
    }

    let rows = select
        .order_by_asc(transaction::Column::Date)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await?;
    debug!("Transaction query returned {} rows", rows.len());
    Ok(rows)
}

/// Sets `custom_category` on every transaction of `user_id` whose raw subcategory equals
/// `subcategory`. Returns the number of rows updated.
#[instrument(skip(db))]
pub async fn relabel_subcategory<C>(
    db: &C,
    user_id: &str,
    subcategory: &str,
    category: &str,
) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Transaction::update_many()
        .col_expr(
            transaction::Column::CustomCategory,
            Expr::value(Some(category.to_string())),
        )
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Subcategory.eq(subcategory))
        .exec(db)
        .await?;

    info!(
        "Relabelled {} transactions with subcategory {} as {}",
        result.rows_affected, subcategory, category
    );
    Ok(result.rows_affected)
}

/// A transaction as delivered by the aggregation service, before it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Aggregator `transaction_id`
    pub external_id: String,
    /// Aggregator account id
    pub account_id: Option<String>,
    /// Amount, positive for expenses
    pub amount: f64,
    /// When the transaction occurred
    pub date: DateTime<Utc>,
    /// Display name
    pub name: String,
    /// Merchant name, if resolved
    pub merchant_name: Option<String>,
    /// Aggregator primary category
    pub primary_category: String,
    /// Aggregator detailed category
    pub subcategory: String,
}

/// Outcome of [`import_transactions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Transactions handed to the import
    pub fetched: usize,
    /// Rows actually inserted
    pub stored: usize,
    /// Transactions skipped because their external id was already stored
    pub skipped: usize,
    /// Inserted rows that matched an existing category mapping
    pub categorized: usize,
}

/// Rows per `INSERT`. Each row binds 11 columns, which keeps a statement well under
/// SQLite's limit of 32766 bound variables.
const IMPORT_CHUNK_SIZE: usize = 500;

/// Stores newly fetched transactions for `user_id`, skipping any whose external id is
/// already present (in the store or earlier in the same batch).
///
/// New rows get their `custom_category` from the user's existing mappings, so imports
/// after a category was added do not need a separate relabel pass. Rows are inserted in
/// chunks of `IMPORT_CHUNK_SIZE` rows, all inside one database transaction: either the whole
/// batch is stored or none of it is.
///
/// # Arguments
/// * `db` - Database connection
/// * `user_id` - Owner of the imported rows
/// * `incoming` - Transactions as delivered by the aggregator, in any order
///
/// # Returns
/// An [`ImportSummary`] with fetched, stored, skipped and auto-categorized counts
#[instrument(skip(db, incoming), fields(count = incoming.len()))]
pub async fn import_transactions(
    db: &DatabaseConnection,
    user_id: &str,
    incoming: Vec<NewTransaction>,
) -> Result<ImportSummary> {
    let fetched = incoming.len();
    let txn = db.begin().await?;

    let mut seen: HashSet<String> = Transaction::find()
        .select_only()
        .column(transaction::Column::ExternalId)
        .filter(transaction::Column::UserId.eq(user_id))
        .into_tuple::<String>()
        .all(&txn)
        .await?
        .into_iter()
        .collect();

    let mappings = crate::core::category::subcategory_lookup(&txn, user_id).await?;

    let now = Utc::now();
    let mut categorized = 0;
    let rows: Vec<transaction::ActiveModel> = incoming
        .into_iter()
        .filter(|tx| seen.insert(tx.external_id.clone()))
        .map(|tx| {
            let custom_category = mappings.get(&tx.subcategory).cloned();
            if custom_category.is_some() {
                categorized += 1;
            }
            to_active_model(user_id, tx, custom_category, now)
        })
        .collect();

    let stored = rows.len();
    for chunk in rows.chunks(IMPORT_CHUNK_SIZE) {
        Transaction::insert_many(chunk.to_vec()).exec(&txn).await?;
    }
    txn.commit().await?;

    let summary = ImportSummary {
        fetched,
        stored,
        skipped: fetched - stored,
        categorized,
    };
    info!(
        "Imported {} of {} transactions for {} ({} skipped, {} categorized)",
        summary.stored, summary.fetched, user_id, summary.skipped, summary.categorized
    );
    Ok(summary)
}

fn to_active_model(
    user_id: &str,
    tx: NewTransaction,
    custom_category: Option<String>,
    now: DateTime<Utc>,
) -> transaction::ActiveModel {
    transaction::ActiveModel {
        user_id: Set(user_id.to_string()),
        external_id: Set(tx.external_id),
        account_id: Set(tx.account_id),
        amount: Set(tx.amount),
        date: Set(tx.date),
        name: Set(tx.name),
        merchant_name: Set(tx.merchant_name),
        primary_category: Set(tx.primary_category),
        subcategory: Set(tx.subcategory),
        custom_category: Set(custom_category),
        created_at: Set(now),
        ..Default::default()
    }
}

/// Sums transaction amounts per `custom_category`, ignoring uncategorized rows.
#[must_use]
pub fn totals_by_category(transactions: &[transaction::Model]) -> HashMap<&str, f64> {
    let mut totals = HashMap::new();
    for tx in transactions {
        if let Some(category) = tx.custom_category.as_deref() {
            *totals.entry(category).or_insert(0.0) += tx.amount;
        }
    }
    totals
}
