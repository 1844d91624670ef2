//! Category mapping entity - One row per (user, custom category, raw subcategory).
//!
//! A custom category is the set of rows sharing `custom_category`; each row maps one
//! aggregator subcategory label (e.g. `FOOD_AND_DRINK_GROCERIES`) into it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category mapping database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the mapping row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user id
    pub user_id: String,
    /// User-facing category name, matched by exact string equality
    pub custom_category: String,
    /// Raw aggregator subcategory label that rolls up into `custom_category`
    pub subcategory: String,
    /// When the mapping was created
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
