//! Common test utilities and constants for the Hondana crate.
//!
//! Provides functions for setting up test libraries on disk and
//! creating dummy page files.

use hondana::error::Result;
use rand::{Rng, distributions::Alphanumeric};
use std::path::{Path, PathBuf};
use tokio::fs;

#[allow(dead_code)]
pub const TEST_TMP_DIR: &str = "tests/tmp";

/// Paths of one isolated test run. The directory is removed again on drop.
#[allow(dead_code)]
pub struct TestDirs {
    pub test_dir: PathBuf,
    pub library_dir: PathBuf,
}

impl Drop for TestDirs {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.test_dir);
    }
}

/// Helper function to create a clean, uniquely named test directory with an
/// empty `library` subdirectory.
#[allow(dead_code)]
pub async fn setup_test_dirs(sub_path: &str) -> TestDirs {
    let rand_string: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    let unique_sub_path = format!("{}-{}", sub_path, rand_string);
    let test_dir = PathBuf::from(TEST_TMP_DIR).join(unique_sub_path);
    if test_dir.exists() {
        fs::remove_dir_all(&test_dir).await.unwrap();
    }
    let library_dir = test_dir.join("library");
    fs::create_dir_all(&library_dir).await.unwrap();

    TestDirs {
        test_dir,
        library_dir,
    }
}

/// Helper function to clean up all test directories.
///
/// Not safe to call while other tests are running; each `TestDirs` already
/// cleans up after itself.
#[allow(dead_code)]
pub async fn cleanup_all_test_dirs() {
    let test_dir = PathBuf::from(TEST_TMP_DIR);
    if test_dir.exists() {
        let _ = fs::remove_dir_all(&test_dir).await;
    }
}

/// Writes a small placeholder page (content is irrelevant to indexing).
#[allow(dead_code)]
pub async fn create_dummy_page(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, b"\xFF\xD8\xFF\xE0not-really-a-jpeg").await?;
    Ok(())
}

/// Creates several pages in one directory.
#[allow(dead_code)]
pub async fn create_dummy_pages(dir: &Path, names: &[&str]) -> Result<()> {
    for name in names {
        create_dummy_page(&dir.join(name)).await?;
    }
    Ok(())
}

/// Creates an empty directory (and its parents).
#[allow(dead_code)]
pub async fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    Ok(())
}
