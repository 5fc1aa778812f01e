//! SQLite backend specifics: schema management and the bulk writer

mod helpers;

use bpui_common::config::DEFAULT_TABLE_NAME;
use bpui_common::{DataSource, Error, SqlDialect, SqlSource};
use helpers::{create_test_sqlite, new_entry, test_entries};
use tempfile::TempDir;

#[tokio::test]
async fn test_create_table_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let source = SqlSource::sqlite(&dir.path().join("plan.db")).await.unwrap();

    assert_eq!(source.dialect(), SqlDialect::Sqlite);
    source.create_table().await.unwrap();
    source.create_table().await.unwrap();

    let tables = source.show_tables().await.unwrap();
    assert_eq!(tables, vec![DEFAULT_TABLE_NAME.to_string()]);
    assert!(source.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_write_entries_assigns_auto_increment_ids() {
    let dir = TempDir::new().unwrap();
    let (entries, source) = create_test_sqlite(&dir).await;

    let ids: Vec<u16> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    // A second batch continues after the first
    let mut more = test_entries();
    source.write_entries(&mut more).await.unwrap();
    let ids: Vec<u16> = more.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![4, 5, 6]);

    assert_eq!(source.read_all().await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_write_entries_round_trip() {
    let dir = TempDir::new().unwrap();
    let source = SqlSource::sqlite(&dir.path().join("plan.db")).await.unwrap();
    source.create_table().await.unwrap();

    let mut entries = test_entries();
    entries[2].matches = "*.bam".to_string();
    entries[2].ignore = "tmp/".to_string();
    source.write_entries(&mut entries).await.unwrap();

    let stored = source.read_all().await.unwrap();
    let written_ids: Vec<u16> = entries.iter().map(|e| e.id).collect();
    let stored_ids: Vec<u16> = stored.iter().map(|e| e.id).collect();
    assert_eq!(written_ids, stored_ids);
    assert_eq!(stored, entries);
}

#[tokio::test]
async fn test_write_entries_empty_batch() {
    let dir = TempDir::new().unwrap();
    let source = SqlSource::sqlite(&dir.path().join("plan.db")).await.unwrap();
    source.create_table().await.unwrap();

    source.write_entries(&mut []).await.unwrap();
    assert!(source.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reads_text_stored_as_blobs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.db");

    let pool = sqlx::SqlitePool::connect(&format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE entries (id INTEGER PRIMARY KEY, reporting_name BLOB, reporting_root BLOB, \
         directory BLOB, instruction TEXT, keep BLOB, skip BLOB, requestor BLOB, faculty BLOB)",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO entries VALUES (7, CAST('legacy' AS BLOB), CAST('/a/b/c/d/e' AS BLOB), \
         CAST('/a/b/c/d/e/f' AS BLOB), 'backup', CAST('*.txt' AS BLOB), NULL, \
         CAST('ann' AS BLOB), CAST('medicine' AS BLOB))",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    let source = SqlSource::sqlite(&path).await.unwrap();
    let entry = source.get_entry(7).await.unwrap();

    assert_eq!(entry.reporting_name, "legacy");
    assert_eq!(entry.directory, "/a/b/c/d/e/f");
    assert_eq!(entry.matches, "*.txt");
    assert_eq!(entry.ignore, "");
    assert_eq!(entry.faculty, "medicine");
}

#[tokio::test]
async fn test_add_entry_fills_zero_first() {
    let dir = TempDir::new().unwrap();
    let (_, source) = create_test_sqlite(&dir).await;

    let mut entry = new_entry("zero");
    source.add_entry(&mut entry).await.unwrap();

    assert_eq!(entry.id, 0);
    assert_eq!(source.read_all().await.unwrap()[0], entry);
}

#[tokio::test]
async fn test_instruction_check_constraint() {
    let dir = TempDir::new().unwrap();
    let (_, source) = create_test_sqlite(&dir).await;
    drop(source);

    let pool = sqlx::SqlitePool::connect(&format!(
        "sqlite://{}",
        dir.path().join("plan.db").display()
    ))
    .await
    .unwrap();

    let result = sqlx::query(
        "INSERT INTO entries (reporting_name, instruction) VALUES ('x', 'sometimes')",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "CHECK constraint should reject the instruction");
}

#[tokio::test]
async fn test_drop_table() {
    let dir = TempDir::new().unwrap();
    let (_, source) = create_test_sqlite(&dir).await;

    source.drop_table().await.unwrap();

    assert!(source.show_tables().await.unwrap().is_empty());
    assert!(matches!(source.read_all().await, Err(Error::Database(_))));
}

#[tokio::test]
async fn test_custom_table_name() {
    let dir = TempDir::new().unwrap();
    let source = SqlSource::sqlite_with_table(&dir.path().join("plan.db"), "plan_2024")
        .await
        .unwrap();
    source.create_table().await.unwrap();

    let mut entries = test_entries();
    source.write_entries(&mut entries).await.unwrap();

    assert_eq!(source.table(), "plan_2024");
    assert_eq!(source.show_tables().await.unwrap(), vec!["plan_2024".to_string()]);
    assert_eq!(source.read_all().await.unwrap(), entries);
}

#[tokio::test]
async fn test_rejects_unsafe_table_name() {
    let dir = TempDir::new().unwrap();
    let result = SqlSource::sqlite_with_table(&dir.path().join("plan.db"), "x; DROP TABLE y").await;

    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn test_close() {
    let dir = TempDir::new().unwrap();
    let (_, source) = create_test_sqlite(&dir).await;

    source.close().await;
    assert!(source.read_all().await.is_err());
}
