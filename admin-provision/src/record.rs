// The administrator row written to the CRM `users` table.

use crate::config::Config;

pub const ADMIN_ROLE: &str = "admin";

/// Administrator account as it will be upserted.
///
/// Only lives for one invocation; the database owns the persisted row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRecord {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl AdminRecord {
    /// Build a record with the standard admin display name
    pub fn new(email: &str, password_hash: &str) -> Self {
        let defaults = Config::default();
        Self::with_names(email, password_hash, &defaults.first_name, &defaults.last_name)
    }

    pub fn with_names(email: &str, password_hash: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role: ADMIN_ROLE.to_string(),
        }
    }

    /// Render the upsert keyed on `email`.
    ///
    /// A new row is inserted with `created_at = NOW()`. An existing row only
    /// gets its hash and role replaced and `updated_at` bumped.
    pub fn upsert_statement(&self) -> String {
        format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, role, created_at) \
             VALUES ({}, {}, {}, {}, {}, NOW()) \
             ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash, role = {}, updated_at = NOW();",
            quote_literal(&self.email),
            quote_literal(&self.password_hash),
            quote_literal(&self.first_name),
            quote_literal(&self.last_name),
            quote_literal(&self.role),
            quote_literal(&self.role),
        )
    }
}

/// Quote a value as a standard SQL string literal, doubling embedded quotes
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
