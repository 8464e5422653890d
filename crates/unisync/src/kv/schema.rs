//! `SQLite` schema definitions for the key-value backend.

/// SQL statement to create the key-value table.
///
/// `updated_at` holds the RFC 3339 time of the last write to the key.
pub const CREATE_KV_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT ''
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Index used by `stats()` to find the latest write.
pub const CREATE_UPDATED_AT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_kv_updated_at ON kv(updated_at DESC)
";

/// All base schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_KV_TABLE,
    CREATE_METADATA_TABLE,
    CREATE_UPDATED_AT_INDEX,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.trim().is_empty());
        }
    }

    #[test]
    fn test_kv_table_structure() {
        assert!(CREATE_KV_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_KV_TABLE.contains("value TEXT NOT NULL"));
        assert!(CREATE_KV_TABLE.contains("updated_at TEXT NOT NULL"));
    }

    #[test]
    fn test_index_created_after_kv_table() {
        let table = SCHEMA_STATEMENTS
            .iter()
            .position(|s| *s == CREATE_KV_TABLE)
            .unwrap();
        let index = SCHEMA_STATEMENTS
            .iter()
            .position(|s| *s == CREATE_UPDATED_AT_INDEX)
            .unwrap();
        assert!(table < index);
    }
}
