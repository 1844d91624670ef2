//! Unified error type for `BudgetBuddy`.
//!
//! Store failures arrive as `sea_orm::DbErr` and are flattened into
//! [`Error::Database`] so callers only ever match on this enum.

use thiserror::Error;

/// Every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    /// No user is signed in; user-scoped operations must not run.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A call into the persistent store failed.
    #[error("Database error: {message}")]
    Database {
        /// Message reported by the store
        message: String,
    },

    /// User-supplied input could not be accepted.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Why the input was rejected
        message: String,
    },

    /// The exact (category, subcategory) pair is already mapped for this user.
    #[error("Category mapping '{category}' -> '{subcategory}' already exists")]
    DuplicateMapping {
        /// Custom category name
        category: String,
        /// Raw subcategory label
        subcategory: String,
    },

    /// No mappings exist for the named category.
    #[error("Category not found: {name}")]
    CategoryNotFound {
        /// Category that was looked up
        name: String,
    },

    /// No savings goal exists with the given id for this user.
    #[error("Savings goal not found: {id}")]
    GoalNotFound {
        /// Goal id that was looked up
        id: i64,
    },

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Filesystem failure (config file, data directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing or not unicode
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Database {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
