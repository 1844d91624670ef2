//! Transaction entity - Bank transactions imported from the aggregation service.
//!
//! Amounts follow the aggregator's sign convention: positive values are money leaving
//! the account (expenses), negative values are inflows. Rows are immutable once imported
//! except for `custom_category`, which is backfilled when a category mapping is added.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user id
    pub user_id: String,
    /// Aggregator `transaction_id`, used to skip duplicates on re-import
    pub external_id: String,
    /// Aggregator account id
    pub account_id: Option<String>,
    /// Transaction amount (positive for expenses, negative for inflows)
    pub amount: f64,
    /// When the transaction occurred
    pub date: DateTimeUtc,
    /// Display name reported by the bank
    pub name: String,
    /// Merchant name, when the aggregator resolved one
    pub merchant_name: Option<String>,
    /// Aggregator primary category (e.g. `FOOD_AND_DRINK`)
    pub primary_category: String,
    /// Aggregator detailed category (e.g. `FOOD_AND_DRINK_RESTAURANT`)
    pub subcategory: String,
    /// Resolved custom category, `None` until a mapping covers `subcategory`
    pub custom_category: Option<String>,
    /// When the row was stored
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Merchant name when known, otherwise the bank's display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.merchant_name.as_deref().unwrap_or(&self.name)
    }
}
