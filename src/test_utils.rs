//! Shared test utilities for `BudgetBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.
#![allow(clippy::expect_used)]

use crate::{
    core::{period::start_of_day, transaction::NewTransaction},
    entities::{allocation, transaction},
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// User id owning most test records.
pub const TEST_USER: &str = "test-user";

static NEXT_EXTERNAL_ID: AtomicU64 = AtomicU64::new(1);

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness. Safe to call more than once.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Shorthand for a calendar date. Panics on an invalid date.
#[must_use]
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

fn next_external_id() -> String {
    format!("test-tx-{}", NEXT_EXTERNAL_ID.fetch_add(1, Ordering::SeqCst))
}

async fn insert_transaction(
    db: &DatabaseConnection,
    user_id: &str,
    subcategory: &str,
    custom_category: Option<&str>,
    amount: f64,
    date: NaiveDate,
) -> Result<transaction::Model> {
    let model = transaction::ActiveModel {
        user_id: Set(user_id.to_string()),
        external_id: Set(next_external_id()),
        account_id: Set(None),
        amount: Set(amount),
        date: Set(start_of_day(date)),
        name: Set("Test transaction".to_string()),
        merchant_name: Set(None),
        primary_category: Set("GENERAL_MERCHANDISE".to_string()),
        subcategory: Set(subcategory.to_string()),
        custom_category: Set(custom_category.map(str::to_string)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

/// Stores a transaction that already carries a custom category, dated at midnight UTC.
///
/// # Defaults
/// * `subcategory`: `"GENERAL_MERCHANDISE_OTHER"`
/// * `name`: `"Test transaction"`
pub async fn create_categorized_transaction(
    db: &DatabaseConnection,
    user_id: &str,
    category: &str,
    amount: f64,
    date: NaiveDate,
) -> Result<transaction::Model> {
    insert_transaction(
        db,
        user_id,
        "GENERAL_MERCHANDISE_OTHER",
        Some(category),
        amount,
        date,
    )
    .await
}

/// Stores an uncategorized transaction with the given raw subcategory.
pub async fn create_raw_transaction(
    db: &DatabaseConnection,
    user_id: &str,
    subcategory: &str,
    amount: f64,
    date: NaiveDate,
) -> Result<transaction::Model> {
    insert_transaction(db, user_id, subcategory, None, amount, date).await
}

/// Stores an allocation row with an explicit effective date.
pub async fn create_allocation(
    db: &DatabaseConnection,
    user_id: &str,
    category: &str,
    weekly_rate: f64,
    created: NaiveDate,
) -> Result<allocation::Model> {
    let model = allocation::ActiveModel {
        user_id: Set(user_id.to_string()),
        category: Set(Some(category.to_string())),
        amount: Set(Some(weekly_rate)),
        income: Set(None),
        created_at: Set(start_of_day(created)),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

/// An aggregator transaction ready for `import_transactions`.
#[must_use]
pub fn new_transaction(
    external_id: &str,
    amount: f64,
    date: NaiveDate,
    subcategory: &str,
) -> NewTransaction {
    NewTransaction {
        external_id: external_id.to_string(),
        account_id: Some("test-account".to_string()),
        amount,
        date: start_of_day(date),
        name: format!("Purchase {external_id}"),
        merchant_name: None,
        primary_category: "GENERAL_MERCHANDISE".to_string(),
        subcategory: subcategory.to_string(),
    }
}

/// An in-memory transaction row for pure-function tests.
#[must_use]
pub fn sample_transaction_model(
    id: i64,
    category: &str,
    amount: f64,
    date: NaiveDate,
) -> transaction::Model {
    transaction::Model {
        id,
        user_id: TEST_USER.to_string(),
        external_id: format!("sample-{id}"),
        account_id: None,
        amount,
        date: start_of_day(date),
        name: "Test transaction".to_string(),
        merchant_name: None,
        primary_category: "GENERAL_MERCHANDISE".to_string(),
        subcategory: "GENERAL_MERCHANDISE_OTHER".to_string(),
        custom_category: Some(category.to_string()),
        created_at: start_of_day(date),
    }
}

/// An in-memory allocation row for pure-function tests.
#[must_use]
pub fn sample_allocation_model(
    id: i64,
    category: &str,
    weekly_rate: f64,
    created: NaiveDate,
) -> allocation::Model {
    allocation::Model {
        id,
        user_id: TEST_USER.to_string(),
        category: Some(category.to_string()),
        amount: Some(weekly_rate),
        income: None,
        created_at: start_of_day(created),
    }
}
