//! Filesystem walk over a comic library.
//!
//! The walker reads at most two levels below the library root:
//!
//! ```text
//! library/                 # root, non-directory entries ignored
//! ├── 海贼王/              # comic with chapters
//! │   ├── 00001.jpg        # loose page, kept under "main"
//! │   ├── 第1话/           # chapter, only its files are read
//! │   └── 番外/
//! └── 短篇集/              # comic without chapters
//!     ├── 001.png
//!     └── 002.png
//! ```
//!
//! Anything deeper than a chapter folder is ignored. Failures on single entries
//! are recorded as [`ScanWarning`]s and the walk moves on to the siblings; only a
//! library root that exists but cannot be listed fails the whole walk.

use futures::stream::{self, StreamExt};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{ReadDir, metadata, read_dir};

use crate::error::{Error, Result};
use crate::order::compare_page_names;
use crate::path_utils::{get_file_name_lossy, has_image_extension, is_hidden_name};
use crate::types::{ScanWarning, WarningKind};

/// Limits the number of comic directories read at the same time
pub const DEFAULT_MAX_CONCURRENT_DIRS: usize = 16;

/// What a directory entry turned out to be after following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

/// A readable, UTF-8 named entry of one directory.
#[derive(Debug, Clone)]
pub struct DirEntryInfo {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// A chapter folder and the image file names found directly inside it (unsorted).
#[derive(Debug, Clone, PartialEq)]
pub struct WalkedChapter {
    pub name: String,
    pub images: Vec<String>,
}

/// Raw, unsorted view of one comic folder.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkedComic {
    pub name: String,
    pub path: PathBuf,
    /// True if any subdirectory exists, even one that could not be read.
    pub has_chapters: bool,
    pub root_images: Vec<String>,
    pub chapters: Vec<WalkedChapter>,
}

/// Everything a walk produced.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    pub comics: Vec<WalkedComic>,
    pub warnings: Vec<ScanWarning>,
}

/// Reads comic folders below a library root.
#[derive(Debug)]
pub struct Walker<'a> {
    library_root: &'a Path,
    max_concurrent_dirs: usize,
    skip_hidden: bool,
}

impl<'a> Walker<'a> {
    /// Creates a new Walker for the specified library root.
    ///
    /// # Arguments
    ///
    /// * `library_root` - Directory whose subdirectories are comics
    /// * `max_concurrent_dirs` - How many comic folders may be read at once (minimum 1)
    /// * `skip_hidden` - Ignore dot-prefixed entries at every level
    pub fn new(library_root: &'a Path, max_concurrent_dirs: usize, skip_hidden: bool) -> Self {
        Self {
            library_root,
            max_concurrent_dirs: max_concurrent_dirs.max(1),
            skip_hidden,
        }
    }

    /// Walks every comic folder of the library.
    ///
    /// Comics come back ordered by directory name (plain code-unit order), so
    /// walking an unchanged tree twice gives identical results.
    ///
    /// # Returns
    ///
    /// * `Ok(WalkOutcome)` - Comics plus warnings for every skipped item; empty if
    ///   the library root does not exist
    /// * `Err(Error)` - The root exists but is not a readable directory
    pub async fn walk(&self) -> Result<WalkOutcome> {
        let mut outcome = WalkOutcome::default();

        let (root_entries, root_warnings) = match self.list_dir(self.library_root).await {
            Ok(listing) => listing,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!(
                    "Library root {:?} does not exist, nothing to index",
                    self.library_root
                );
                return Ok(outcome);
            }
            Err(e) => {
                return Err(Error::InvalidPath(
                    self.library_root.to_path_buf(),
                    format!("Cannot read library root: {}", e),
                ));
            }
        };
        outcome.warnings.extend(root_warnings);

        let mut comic_dirs: Vec<DirEntryInfo> = root_entries
            .into_iter()
            .filter(|entry| entry.kind == EntryKind::Directory)
            .collect();
        comic_dirs.sort_by(|a, b| compare_page_names(&a.name, &b.name));

        let results: Vec<(Option<WalkedComic>, Vec<ScanWarning>)> = stream::iter(comic_dirs)
            .map(|entry| async move { self.walk_comic(entry.name, entry.path).await })
            .buffered(self.max_concurrent_dirs)
            .collect()
            .await;

        for (comic, warnings) in results {
            outcome.warnings.extend(warnings);
            if let Some(comic) = comic {
                outcome.comics.push(comic);
            }
        }

        Ok(outcome)
    }

    /// Walks a single comic folder.
    ///
    /// # Returns
    ///
    /// * `(Some(WalkedComic), warnings)` - The comic, minus unreadable chapters
    /// * `(None, warnings)` - The comic folder itself could not be listed
    pub async fn walk_comic(
        &self,
        name: String,
        path: PathBuf,
    ) -> (Option<WalkedComic>, Vec<ScanWarning>) {
        let (entries, mut warnings) = match self.list_dir(&path).await {
            Ok(listing) => listing,
            Err(e) => {
                let warning = logged_warning(&path, WarningKind::ReadComic, &e);
                return (None, vec![warning]);
            }
        };

        let mut comic = WalkedComic {
            name,
            path,
            has_chapters: false,
            root_images: Vec::new(),
            chapters: Vec::new(),
        };

        for entry in entries {
            match entry.kind {
                EntryKind::Directory => {
                    comic.has_chapters = true;
                    match self.collect_images(&entry.path).await {
                        Ok((images, chapter_warnings)) => {
                            warnings.extend(chapter_warnings);
                            comic.chapters.push(WalkedChapter {
                                name: entry.name,
                                images,
                            });
                        }
                        Err(e) => {
                            warnings.push(logged_warning(
                                &entry.path,
                                WarningKind::ReadChapter,
                                &e,
                            ));
                        }
                    }
                }
                EntryKind::File if has_image_extension(&entry.name) => {
                    comic.root_images.push(entry.name);
                }
                _ => {}
            }
        }

        log::debug!(
            "Walked comic {:?}: chapters={}, loose pages={}",
            comic.name,
            comic.chapters.len(),
            comic.root_images.len()
        );

        (Some(comic), warnings)
    }

    /// Collects the image file names directly inside a chapter folder.
    async fn collect_images(
        &self,
        chapter_dir: &Path,
    ) -> std::io::Result<(Vec<String>, Vec<ScanWarning>)> {
        let (entries, warnings) = self.list_dir(chapter_dir).await?;
        let images = entries
            .into_iter()
            .filter(|entry| entry.kind == EntryKind::File && has_image_extension(&entry.name))
            .map(|entry| entry.name)
            .collect();
        Ok((images, warnings))
    }

    /// Lists one directory, classifying each entry.
    ///
    /// Entries with non UTF-8 names or that cannot be inspected are skipped with a
    /// warning. Symlinks are followed, so a link to a folder counts as a folder.
    pub async fn list_dir(
        &self,
        directory: &Path,
    ) -> std::io::Result<(Vec<DirEntryInfo>, Vec<ScanWarning>)> {
        let mut entries: Vec<DirEntryInfo> = Vec::new();
        let mut warnings: Vec<ScanWarning> = Vec::new();

        let mut paths: ReadDir = read_dir(directory).await?;

        while let Some(entry) = paths.next_entry().await? {
            let path = entry.path();

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => {
                    let message = format!("skipping entry {:?}", get_file_name_lossy(&path));
                    log::warn!("{} {:?}: {}", WarningKind::NonUtf8Name, path, message);
                    warnings.push(ScanWarning::new(path, WarningKind::NonUtf8Name, message));
                    continue;
                }
            };

            if self.skip_hidden && is_hidden_name(&name) {
                continue;
            }

            let kind = match metadata(&path).await {
                Ok(meta) if meta.is_dir() => EntryKind::Directory,
                Ok(meta) if meta.is_file() => EntryKind::File,
                Ok(_) => EntryKind::Other,
                Err(e) => {
                    warnings.push(logged_warning(&path, WarningKind::Stat, &e));
                    continue;
                }
            };

            entries.push(DirEntryInfo { name, path, kind });
        }

        Ok((entries, warnings))
    }
}

fn logged_warning(path: &Path, kind: WarningKind, error: &std::io::Error) -> ScanWarning {
    log::warn!("{} {:?}: {}", kind, path, error);
    ScanWarning::new(path.to_path_buf(), kind, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest_dir() -> &'static Path {
        Path::new(env!("CARGO_MANIFEST_DIR"))
    }

    #[tokio::test]
    async fn test_unreadable_comic_becomes_warning() {
        let walker = Walker::new(manifest_dir(), 4, false);
        let not_a_dir = manifest_dir().join("Cargo.toml");

        let (comic, warnings) = walker
            .walk_comic("Cargo.toml".to_string(), not_a_dir.clone())
            .await;

        assert!(comic.is_none());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::ReadComic);
        assert_eq!(warnings[0].path, not_a_dir);
    }

    #[tokio::test]
    async fn test_walk_comic_on_source_tree() {
        let walker = Walker::new(manifest_dir(), 0, false);
        assert_eq!(walker.max_concurrent_dirs, 1);

        let (comic, warnings) = walker
            .walk_comic("src".to_string(), manifest_dir().join("src"))
            .await;
        let comic = comic.unwrap();

        assert!(warnings.is_empty());
        assert!(comic.root_images.is_empty());
        assert!(!comic.has_chapters);
    }
}
