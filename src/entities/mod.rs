//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables backing the budget engine.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod allocation;
pub mod category;
pub mod savings_goal;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use allocation::{Column as AllocationColumn, Entity as Allocation, Model as AllocationModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use savings_goal::{
    Column as SavingsGoalColumn, Entity as SavingsGoal, Model as SavingsGoalModel,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
