//! Integration tests for CSV → SQLite conversion

use bpui_common::{CsvSource, DataSource, Entry, Error, Instruction, SqlSource};
use bpui_convert::convert_csv_to_sqlite;
use tempfile::TempDir;

fn csv_entries() -> Vec<Entry> {
    vec![
        Entry {
            id: 0,
            reporting_name: "alpha".to_string(),
            reporting_root: "/data/groups/sci/alpha/root".to_string(),
            directory: "/data/groups/sci/alpha/root/raw".to_string(),
            instruction: Instruction::Backup,
            matches: " *.fastq ".to_string(),
            ignore: "*.tmp ".to_string(),
            requestor: " alice".to_string(),
            faculty: "sci".to_string(),
        },
        Entry {
            id: 1,
            reporting_name: "beta".to_string(),
            reporting_root: "/data/groups/arts/beta/root".to_string(),
            directory: "/data/groups/arts/beta/root".to_string(),
            instruction: Instruction::NoBackup,
            matches: String::new(),
            ignore: String::new(),
            requestor: "bob".to_string(),
            faculty: " arts ".to_string(),
        },
    ]
}

#[tokio::test]
async fn test_convert_csv_to_sqlite() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("plan.csv");
    let db_path = dir.path().join("plan.db");

    CsvSource::new(&csv_path)
        .write_entries(&csv_entries())
        .await
        .unwrap();

    let written = convert_csv_to_sqlite(&csv_path, &db_path).await.unwrap();
    assert_eq!(written, 2);

    let target = SqlSource::sqlite(&db_path).await.unwrap();
    let stored = target.read_all().await.unwrap();
    assert_eq!(stored.len(), 2);

    // Auto-increment numbering starts at 1
    assert_eq!(stored[0].id, 1);
    assert_eq!(stored[0].reporting_name, "alpha");
    assert_eq!(stored[0].matches, "*.fastq");
    assert_eq!(stored[0].ignore, "*.tmp");
    assert_eq!(stored[0].requestor, "alice");

    assert_eq!(stored[1].id, 2);
    assert_eq!(stored[1].instruction, Instruction::NoBackup);
    assert_eq!(stored[1].faculty, "arts");
}

#[tokio::test]
async fn test_convert_empty_csv_creates_table() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("plan.csv");
    let db_path = dir.path().join("plan.db");

    CsvSource::new(&csv_path).write_entries(&[]).await.unwrap();

    assert_eq!(convert_csv_to_sqlite(&csv_path, &db_path).await.unwrap(), 0);

    let target = SqlSource::sqlite(&db_path).await.unwrap();
    assert!(target.read_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_csv_leaves_no_database() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("plan.csv");
    let db_path = dir.path().join("plan.db");

    std::fs::write(
        &csv_path,
        "id,reporting_name,reporting_root,directory,instruction,match,ignore,requestor,faculty\n\
         0,alpha,/a/b/c/d/e,/a/b/c/d/e/f,invalid,,,alice,sci\n",
    )
    .unwrap();

    let result = convert_csv_to_sqlite(&csv_path, &db_path).await;
    assert!(matches!(result, Err(Error::InvalidEntry(_))));
    assert!(!db_path.exists());
}

#[tokio::test]
async fn test_missing_csv_fails() {
    let dir = TempDir::new().unwrap();

    let result =
        convert_csv_to_sqlite(&dir.path().join("nope.csv"), &dir.path().join("plan.db")).await;
    assert!(matches!(result, Err(Error::Io(_))));
}
