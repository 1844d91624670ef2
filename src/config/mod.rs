/// Built-in default category mappings (aggregator taxonomy)
pub mod categories;

/// Database configuration and connection management
pub mod database;

/// Application settings loading from config.toml
pub mod settings;
