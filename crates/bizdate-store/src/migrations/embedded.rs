//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str!

/// Migration metadata
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// Get all embedded migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_business_date",
            sql: include_str!("../../migrations/001_business_date.sql"),
        },
        Migration {
            id: "002_string_resource",
            sql: include_str!("../../migrations/002_string_resource.sql"),
        },
    ]
}
