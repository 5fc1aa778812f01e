//! Test Helper Utilities
//!
//! Shared fixtures for the storage backend tests

#![allow(dead_code)]

use bpui_common::{CsvSource, Entry, Instruction, SqlSource};
use tempfile::TempDir;

pub const NUM_TEST_ROWS: usize = 3;

/// Three valid entries with IDs 0, 1, 2
pub fn test_entries() -> Vec<Entry> {
    (0..NUM_TEST_ROWS)
        .map(|i| Entry {
            id: i as u16,
            reporting_name: format!("test_project_{}", i),
            reporting_root: "/some/path/to/project/dir".to_string(),
            directory: "/some/path/to/project/dir/input".to_string(),
            instruction: Instruction::Backup,
            matches: String::new(),
            ignore: String::new(),
            requestor: "user".to_string(),
            faculty: "group".to_string(),
        })
        .collect()
}

/// CSV file in `dir` pre-filled with [`test_entries`]
pub async fn create_test_csv(dir: &TempDir) -> (Vec<Entry>, CsvSource) {
    let entries = test_entries();
    let source = CsvSource::new(dir.path().join("plan.csv"));

    source
        .write_entries(&entries)
        .await
        .expect("Should write test CSV");

    (entries, source)
}

/// SQLite database in `dir` pre-filled with [`test_entries`]
///
/// Auto-increment starts at 1, so the returned entries carry IDs 1, 2, 3.
pub async fn create_test_sqlite(dir: &TempDir) -> (Vec<Entry>, SqlSource) {
    let mut entries = test_entries();

    let source = SqlSource::sqlite(&dir.path().join("plan.db"))
        .await
        .expect("Should open SQLite database");
    source.create_table().await.expect("Should create table");
    source
        .write_entries(&mut entries)
        .await
        .expect("Should write test rows");

    (entries, source)
}

/// A fresh entry for add tests; its ID is deliberately bogus
pub fn new_entry(name: &str) -> Entry {
    Entry {
        id: 999,
        reporting_name: name.to_string(),
        reporting_root: "/a/b/c/d/e".to_string(),
        directory: "/a/b/c/d/e/f".to_string(),
        instruction: Instruction::TempBackup,
        matches: "*.dat".to_string(),
        ignore: String::new(),
        requestor: "someone".to_string(),
        faculty: "physics".to_string(),
    }
}
