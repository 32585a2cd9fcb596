use std::fs;

use dirseek::{
    folder_size, DeepSearchGateway, DirectoryAccessor, FsAccessor, ParallelDeepSearch, SeekError,
};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Structure:
/// ```
/// tmp/
///   .env                (7 bytes, hidden)
///   Beta.txt            (4 bytes)
///   alpha.txt           (5 bytes)
///   zeta/
///     invoice_mar.txt   (13 bytes)
///   Archive/
///     invoice_jan.txt   (15 bytes)
///     .cache/
///       invoice_tmp     (3 bytes, hidden parent)
/// ```
fn setup_test_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::write(root.join(".env"), "SECRET=").unwrap();
    fs::write(root.join("Beta.txt"), "beta").unwrap();
    fs::write(root.join("alpha.txt"), "alpha").unwrap();

    fs::create_dir(root.join("zeta")).unwrap();
    fs::write(root.join("zeta").join("invoice_mar.txt"), "march invoice").unwrap();

    fs::create_dir(root.join("Archive")).unwrap();
    fs::write(root.join("Archive").join("invoice_jan.txt"), "january invoice").unwrap();
    fs::create_dir(root.join("Archive").join(".cache")).unwrap();
    fs::write(root.join("Archive").join(".cache").join("invoice_tmp"), "tmp").unwrap();

    dir
}

fn names(entries: &[dirseek::Entry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// FsAccessor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lists_directories_first_then_by_name() {
    let dir = setup_test_dir();
    let listing = FsAccessor::new().list(dir.path(), false).await.unwrap();

    assert_eq!(names(&listing), ["Archive", "zeta", "alpha.txt", "Beta.txt"]);
}

#[tokio::test]
async fn hidden_entries_only_on_request() {
    let dir = setup_test_dir();
    let listing = FsAccessor::new().list(dir.path(), true).await.unwrap();

    assert_eq!(names(&listing), ["Archive", "zeta", ".env", "alpha.txt", "Beta.txt"]);
}

#[tokio::test]
async fn sizes_are_reported_for_files_only() {
    let dir = setup_test_dir();
    let listing = FsAccessor::new().list(dir.path(), false).await.unwrap();

    for entry in &listing {
        if entry.is_dir {
            assert_eq!(entry.size, 0, "{}", entry.name);
        }
    }
    let alpha = listing.iter().find(|e| e.name == "alpha.txt").unwrap();
    assert_eq!(alpha.size, 5);
    assert_eq!(alpha.path, dir.path().join("alpha.txt"));
}

#[tokio::test]
async fn missing_directory_is_not_found() {
    let dir = setup_test_dir();
    let missing = dir.path().join("nope");

    let err = FsAccessor::new().list(&missing, false).await.unwrap_err();
    assert!(matches!(err, SeekError::NotFound(ref p) if *p == missing));
    assert!(err.is_recoverable());
}

// ---------------------------------------------------------------------------
// folder_size
// ---------------------------------------------------------------------------

#[tokio::test]
async fn folder_size_counts_hidden_files() {
    let dir = setup_test_dir();
    let total = folder_size(dir.path()).await.unwrap();

    assert_eq!(total, 7 + 4 + 5 + 13 + 15 + 3);
}

#[tokio::test]
async fn folder_size_rejects_files() {
    let dir = setup_test_dir();
    let err = folder_size(dir.path().join("alpha.txt")).await.unwrap_err();
    assert!(matches!(err, SeekError::InvalidSource(_)));
}

// ---------------------------------------------------------------------------
// ParallelDeepSearch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deep_search_finds_matches_at_any_depth() {
    let dir = setup_test_dir();
    let response = ParallelDeepSearch::new()
        .threads(2)
        .deep_search(dir.path(), "INVOICE")
        .await
        .unwrap();

    // .cache is hidden, so invoice_tmp is skipped
    let mut found = names(&response.results);
    found.sort_unstable();
    assert_eq!(found, ["invoice_jan.txt", "invoice_mar.txt"]);
    assert_eq!(response.stats.matches_found, 2);
    assert!(response.stats.files_indexed >= 7);
}

#[tokio::test]
async fn deep_search_sorts_directories_first() {
    let dir = setup_test_dir();
    fs::create_dir(dir.path().join("zeta").join("a_dir")).unwrap();

    let response = ParallelDeepSearch::new()
        .deep_search(dir.path(), "a")
        .await
        .unwrap();

    let first_file = response.results.iter().position(|e| !e.is_dir).unwrap();
    assert!(response.results[..first_file].iter().all(|e| e.is_dir));
    assert!(response.results[first_file..].iter().all(|e| !e.is_dir));
}

#[tokio::test]
async fn deep_search_includes_hidden_on_request() {
    let dir = setup_test_dir();
    let response = ParallelDeepSearch::new()
        .include_hidden(true)
        .deep_search(dir.path(), "invoice")
        .await
        .unwrap();

    assert_eq!(response.results.len(), 3);
}

#[tokio::test]
async fn deep_search_respects_limit() {
    let dir = setup_test_dir();
    let response = ParallelDeepSearch::new()
        .limit(1)
        .deep_search(dir.path(), "invoice")
        .await
        .unwrap();

    assert_eq!(response.results.len(), 1);
    assert_eq!(response.stats.matches_found, 1);
}

#[tokio::test]
async fn deep_search_on_a_file_is_a_backend_error() {
    let dir = setup_test_dir();
    let err = ParallelDeepSearch::new()
        .deep_search(&dir.path().join("alpha.txt"), "alpha")
        .await
        .unwrap_err();

    assert!(matches!(err, SeekError::Backend(_)));
    assert!(!err.is_recoverable());
}
