//! Allocation entity - Weekly allocation rate per (user, category).
//!
//! Each user also owns one sentinel row with `category = NULL` whose `income`
//! holds the user's weekly income. Category rows carry `amount`; the sentinel never does.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Allocation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "allocations")]
pub struct Model {
    /// Unique identifier for the allocation row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user id
    pub user_id: String,
    /// Custom category this rate applies to, `None` for the income sentinel
    pub category: Option<String>,
    /// Weekly allocation rate, `None` for the income sentinel
    pub amount: Option<f64>,
    /// Weekly income at the time the row was saved
    pub income: Option<f64>,
    /// Effective start of the allocation
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this is the per-user income sentinel row.
    #[must_use]
    pub const fn is_income_sentinel(&self) -> bool {
        self.category.is_none()
    }
}
