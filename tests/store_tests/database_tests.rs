//! Tests for the file-backed Database
//!
//! These tests verify:
//! - Open modes (create, read-only, read-write)
//! - Commit persistence and atomic replacement
//! - Writer lock contention and release
//! - Corruption detection on open

use std::fs;
use std::path::PathBuf;

use countdb::store::{Database, OpenMode, Store};
use countdb::CountDbError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_db() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("counts.db");
    (temp_dir, path)
}

fn write_sample(path: &PathBuf) {
    let mut db = Database::open(path, OpenMode::Create).unwrap();
    let mut txn = db.begin_write().unwrap();
    txn.create_namespace("cpu");
    txn.put("cpu", b"core1", b"8").unwrap();
    txn.put("cpu", b"core0", b"4").unwrap();
    txn.create_namespace("gpu");
    txn.put("gpu", b"unit0", b"2").unwrap();
    txn.commit().unwrap();
    db.close().unwrap();
}

// =============================================================================
// Open/Create Tests
// =============================================================================

#[test]
fn test_create_does_not_write_file_before_commit() {
    let (_temp, path) = setup_temp_db();

    let db = Database::open(&path, OpenMode::Create).unwrap();
    assert!(db.committed().is_empty());
    db.close().unwrap();

    assert!(!path.exists());
}

#[test]
fn test_read_only_missing_file_is_open_error() {
    let (_temp, path) = setup_temp_db();

    let result = Database::open(&path, OpenMode::ReadOnly);

    assert!(matches!(result, Err(CountDbError::Open { .. })));
}

#[test]
fn test_commit_then_reopen_read_only() {
    let (_temp, path) = setup_temp_db();
    write_sample(&path);

    let db = Database::open(&path, OpenMode::ReadOnly).unwrap();
    let txn = db.begin_read().unwrap();

    let cpu = txn.namespace("cpu").unwrap();
    let entries: Vec<(&[u8], &[u8])> = cpu.iter().collect();
    assert_eq!(
        entries,
        vec![(&b"core0"[..], &b"4"[..]), (&b"core1"[..], &b"8"[..])]
    );
    assert_eq!(txn.namespace("gpu").unwrap().get(b"unit0"), Some(&b"2"[..]));
    assert!(txn.namespace("tpu").is_none());
    assert_eq!(txn.namespace_names().collect::<Vec<_>>(), vec!["cpu", "gpu"]);
}

#[test]
fn test_read_only_rejects_write_transaction() {
    let (_temp, path) = setup_temp_db();
    write_sample(&path);

    let mut db = Database::open(&path, OpenMode::ReadOnly).unwrap();

    assert!(matches!(db.begin_write(), Err(CountDbError::ReadOnly)));
}

#[test]
fn test_create_truncates_on_commit() {
    let (_temp, path) = setup_temp_db();
    write_sample(&path);

    let mut db = Database::open(&path, OpenMode::Create).unwrap();
    let mut txn = db.begin_write().unwrap();
    txn.create_namespace("tpu");
    txn.put("tpu", b"core0", b"1").unwrap();
    txn.commit().unwrap();
    db.close().unwrap();

    let db = Database::open(&path, OpenMode::ReadOnly).unwrap();
    let names: Vec<&str> = db.committed().names().collect();
    assert_eq!(names, vec!["tpu"]);
}

#[test]
fn test_read_write_keeps_existing_contents() {
    let (_temp, path) = setup_temp_db();
    write_sample(&path);

    let mut db = Database::open(&path, OpenMode::ReadWrite).unwrap();
    let mut txn = db.begin_write().unwrap();
    assert!(!txn.create_namespace("cpu"));
    txn.put("cpu", b"core2", b"16").unwrap();
    txn.commit().unwrap();
    db.close().unwrap();

    let db = Database::open(&path, OpenMode::ReadOnly).unwrap();
    let cpu = db.committed().get("cpu").unwrap();
    assert_eq!(cpu.len(), 3);
    assert_eq!(db.committed().len(), 2);
}

// =============================================================================
// Transaction Tests
// =============================================================================

#[test]
fn test_aborted_transaction_leaves_file_untouched() {
    let (_temp, path) = setup_temp_db();
    write_sample(&path);
    let before = fs::read(&path).unwrap();

    let mut db = Database::open(&path, OpenMode::ReadWrite).unwrap();
    let mut txn = db.begin_write().unwrap();
    txn.create_namespace("tpu");
    txn.put("cpu", b"core0", b"999").unwrap();
    txn.abort();
    db.close().unwrap();

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_dropped_transaction_is_discarded() {
    let (_temp, path) = setup_temp_db();

    let mut db = Database::open(&path, OpenMode::Create).unwrap();
    {
        let mut txn = db.begin_write().unwrap();
        txn.create_namespace("cpu");
    }
    assert!(db.committed().is_empty());
    db.close().unwrap();

    assert!(!path.exists());
}

#[test]
fn test_commit_leaves_no_temp_file() {
    let (temp, path) = setup_temp_db();
    write_sample(&path);

    let mut leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    leftovers.sort();
    assert_eq!(leftovers, vec!["counts.db", "counts.db.lock"]);
}

#[test]
fn test_handle_reports_path_and_mode() {
    let (_temp, path) = setup_temp_db();
    write_sample(&path);

    let db = Database::open(&path, OpenMode::ReadOnly).unwrap();
    assert_eq!(db.path(), path.as_path());
    assert_eq!(db.mode(), OpenMode::ReadOnly);
    assert!(!db.is_writable());
    db.close().unwrap();

    let db = Database::open(&path, OpenMode::ReadWrite).unwrap();
    assert_eq!(db.mode(), OpenMode::ReadWrite);
    assert!(db.is_writable());
    db.close().unwrap();
}

// =============================================================================
// Lock Tests
// =============================================================================

#[test]
fn test_second_writer_is_locked_out() {
    let (_temp, path) = setup_temp_db();

    let first = Database::open(&path, OpenMode::Create).unwrap();
    let second = Database::open(&path, OpenMode::ReadWrite);
    assert!(matches!(second, Err(CountDbError::Locked { .. })));

    first.close().unwrap();
    let third = Database::open(&path, OpenMode::Create).unwrap();
    third.close().unwrap();
}

#[test]
fn test_lock_released_on_drop() {
    let (_temp, path) = setup_temp_db();

    {
        let _db = Database::open(&path, OpenMode::Create).unwrap();
    }

    let db = Database::open(&path, OpenMode::Create).unwrap();
    db.close().unwrap();
}

#[test]
fn test_leftover_lock_file_does_not_block_writer() {
    let (temp, path) = setup_temp_db();
    write_sample(&path);

    // A writer that died leaves its lock file behind, unlocked
    fs::write(temp.path().join("counts.db.lock"), b"").unwrap();

    let mut db = Database::open(&path, OpenMode::ReadWrite).unwrap();
    let mut txn = db.begin_write().unwrap();
    txn.put("gpu", b"unit1", b"3").unwrap();
    txn.commit().unwrap();
    db.close().unwrap();

    let db = Database::open(&path, OpenMode::ReadOnly).unwrap();
    assert_eq!(db.committed().get("gpu").unwrap().len(), 2);
}

#[test]
fn test_reader_coexists_with_writer() {
    let (_temp, path) = setup_temp_db();
    write_sample(&path);

    let writer = Database::open(&path, OpenMode::ReadWrite).unwrap();
    let reader = Database::open(&path, OpenMode::ReadOnly).unwrap();

    assert_eq!(reader.committed().len(), 2);
    reader.close().unwrap();
    writer.close().unwrap();
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_garbage_file_is_corrupt() {
    let (_temp, path) = setup_temp_db();
    fs::write(&path, b"block: cpu\ncore0: 4\n").unwrap();

    let result = Database::open(&path, OpenMode::ReadOnly);

    assert!(matches!(result, Err(CountDbError::Corrupt { .. })));
}

#[test]
fn test_bit_flip_is_corrupt() {
    let (_temp, path) = setup_temp_db();
    write_sample(&path);

    let mut image = fs::read(&path).unwrap();
    let mid = image.len() / 2;
    image[mid] ^= 0x01;
    fs::write(&path, &image).unwrap();

    let result = Database::open(&path, OpenMode::ReadOnly);
    assert!(matches!(result, Err(CountDbError::Corrupt { .. })));
}
