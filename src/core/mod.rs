/// Per-category weekly allocation rates and the income sentinel
pub mod allocation;

/// Current-user resolution behind an external identity provider
pub mod auth;

/// Allocation-vs-spend balance computation
pub mod balance;

/// Custom categories and their subcategory mappings
pub mod category;

/// Savings goals
pub mod goal;

/// Calendar period bounds, navigation and granularity conversions
pub mod period;

/// Display formatting of balance reports
pub mod projection;

/// Last-request-wins holder for recomputed reports
pub mod session;

/// Transaction queries, import and relabeling
pub mod transaction;
