//! Savings goal entity - A target amount the user is saving towards by a date.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Savings goal database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "savings_goals")]
pub struct Model {
    /// Unique identifier for the goal
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user id
    pub user_id: String,
    /// Goal name (e.g. "Emergency Fund")
    pub name: String,
    /// Amount the user wants to reach
    pub target_amount: f64,
    /// Amount saved so far
    pub current_amount: f64,
    /// Date the goal should be reached by
    pub target_date: NaiveDate,
    /// Free-form description
    pub description: String,
    /// When the goal was created
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
