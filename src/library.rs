use std::path::{Component, Path, PathBuf};

use crate::cover::resolve_cover;
use crate::error::{Error, Result};
use crate::order::{ChapterSortKey, sort_pages};
use crate::path_utils::validate_url_base;
use crate::types::{
    ChapterStructure, ComicEntry, LibraryListing, MAIN_CHAPTER_KEY, PagePath, ScanWarning,
};
use crate::walker::{DEFAULT_MAX_CONCURRENT_DIRS, WalkedComic, Walker};

/// The library indexing configuration, built declaratively using the builder pattern.
///
/// A `LibraryConfig` points at a folder of comic folders and turns it into a
/// [`LibraryListing`] on demand. Nothing is cached between calls: every
/// [`scan`](LibraryConfig::scan) reads the disk again, so the listing always
/// reflects the current tree.
///
/// ## Builder Pattern
///
/// ```rust,no_run
/// # use hondana::prelude::*;
/// # #[tokio::main]
/// # async fn main() -> hondana::error::Result<()> {
/// let config = LibraryConfig::builder()
///     .library_root(PathBuf::from("./manhua"))
///     .url_base("/manhua")
///     .build()?;
///
/// let listing = config.scan().await?;
/// for comic in &listing.comics {
///     let cover = comic.cover_image.as_ref().map(|c| config.page_url(c));
///     println!("{} -> {:?}", comic.name, cover);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LibraryConfig {
    /// Directory whose immediate subdirectories are comics.
    ///
    /// A missing directory is not an error for [`scan`](LibraryConfig::scan); it
    /// simply yields an empty listing.
    pub library_root: PathBuf,

    /// URL segment under which the serving layer exposes the library root.
    ///
    /// Used by [`page_url`](LibraryConfig::page_url). Must start with `/` and must
    /// not end with one (except for `/` itself).
    #[builder(default = "\"/manhua\".to_string()")]
    pub url_base: String,

    /// Upper bound on comic folders read at the same time within one scan.
    #[builder(default = "DEFAULT_MAX_CONCURRENT_DIRS")]
    pub max_concurrent_dirs: usize,

    /// Whether dot-prefixed entries are ignored at every level.
    #[builder(default = "false")]
    pub skip_hidden: bool,
}

impl LibraryConfig {
    /// Creates a new builder for configuring `LibraryConfig`.
    pub fn builder() -> LibraryConfigBuilder {
        LibraryConfigBuilder::default()
    }

    /// Checks that the library root is present and is a directory.
    ///
    /// [`scan`](LibraryConfig::scan) tolerates a missing root; call this first when
    /// a missing root should be reported instead.
    pub fn preflight_check(&self) -> Result<&Self> {
        if !self.library_root.exists() {
            return Err(Error::NotFound(format!(
                "Library root does not exist: {:?}",
                self.library_root
            )));
        }
        if !self.library_root.is_dir() {
            return Err(Error::InvalidPath(
                self.library_root.clone(),
                "Library root is not a directory.".to_string(),
            ));
        }
        Ok(self)
    }

    fn walker(&self) -> Walker<'_> {
        Walker::new(
            &self.library_root,
            self.max_concurrent_dirs,
            self.skip_hidden,
        )
    }

    /// Indexes the whole library.
    ///
    /// Runs the walk, orders chapters and pages, resolves covers and emits one
    /// [`ComicEntry`] per comic folder. Per-item read failures end up in
    /// [`LibraryListing::warnings`] and never fail the scan.
    ///
    /// # Returns
    ///
    /// * `Ok(LibraryListing)` - Comics ordered by folder name; empty when the root is missing
    /// * `Err(Error)` - The root exists but cannot be listed
    pub async fn scan(&self) -> Result<LibraryListing> {
        let outcome = self.walker().walk().await?;

        let comics: Vec<ComicEntry> = outcome.comics.into_iter().map(build_entry).collect();

        log::info!(
            "Indexed {} comics from {:?} ({} warnings)",
            comics.len(),
            self.library_root,
            outcome.warnings.len()
        );

        Ok(LibraryListing {
            comics,
            warnings: outcome.warnings,
        })
    }

    /// Indexes a single comic folder by name.
    ///
    /// # Returns
    ///
    /// * `Ok(Some((entry, warnings)))` - The comic and any items skipped inside it
    /// * `Ok(None)` - No such comic folder
    /// * `Err(Error)` - The name is empty or not a single path segment, or the comic
    ///   folder exists but cannot be listed
    pub async fn scan_comic(&self, name: &str) -> Result<Option<(ComicEntry, Vec<ScanWarning>)>> {
        let comic_path = self.comic_path(name)?;
        if !comic_path.is_dir() {
            return Ok(None);
        }

        let (walked, warnings) = self
            .walker()
            .walk_comic(name.to_string(), comic_path.clone())
            .await;

        match walked {
            Some(comic) => Ok(Some((build_entry(comic), warnings))),
            None => Err(Error::InvalidPath(
                comic_path,
                warnings
                    .first()
                    .map(|w| w.message.clone())
                    .unwrap_or_else(|| "Cannot read comic directory".to_string()),
            )),
        }
    }

    /// Full URL of a page under [`url_base`](LibraryConfig::url_base).
    pub fn page_url(&self, page: &PagePath) -> String {
        page.to_url(&self.url_base)
    }

    /// Location of a comic folder, refusing names that would leave the library root.
    fn comic_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() {
            return Err(Error::EmptyComicName);
        }
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.library_root.join(name)),
            _ => Err(Error::InvalidPath(
                PathBuf::from(name),
                "Comic name must be a single directory name".to_string(),
            )),
        }
    }
}

/// Turns a walked comic into its sorted, cover-resolved entry.
///
/// Loose pages go under `main` (first, when present); chapters follow in natural
/// order with their pages in plain lexical order.
pub fn build_entry(walked: WalkedComic) -> ComicEntry {
    let WalkedComic {
        name,
        has_chapters,
        mut root_images,
        mut chapters,
        ..
    } = walked;

    let mut structure = ChapterStructure::new();

    if !root_images.is_empty() {
        sort_pages(&mut root_images);
        let pages = root_images
            .into_iter()
            .map(|file| PagePath::in_root(&name, file))
            .collect();
        structure.insert(MAIN_CHAPTER_KEY.to_string(), pages);
    }

    chapters.sort_by_cached_key(|chapter| ChapterSortKey::new(&chapter.name));
    for mut chapter in chapters {
        sort_pages(&mut chapter.images);
        let pages = chapter
            .images
            .into_iter()
            .map(|file| PagePath::in_chapter(&name, &chapter.name, file));
        // a folder literally named "main" shares the key with the loose pages
        structure.entry(chapter.name.clone()).or_default().extend(pages);
    }

    let mut entry = ComicEntry {
        name,
        has_chapters,
        cover_image: None,
        structure,
    };
    entry.cover_image = resolve_cover(&entry);

    if entry.cover_image.is_none() {
        log::debug!("Comic {:?} has no cover image", entry.name);
    }

    entry
}

impl LibraryConfigBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        match &self.library_root {
            Some(root) if root.as_os_str().is_empty() => {
                return Err("Library root must not be empty".to_string());
            }
            None => return Err("Library root is required".to_string()),
            _ => {}
        }

        if let Some(base) = &self.url_base {
            validate_url_base(base)?;
        }

        if let Some(max) = self.max_concurrent_dirs {
            if max == 0 {
                return Err("max_concurrent_dirs must be greater than 0".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::WalkedChapter;

    fn walked(has_chapters: bool, root: &[&str], chapters: &[(&str, &[&str])]) -> WalkedComic {
        WalkedComic {
            name: "漫画".to_string(),
            path: PathBuf::from("lib/漫画"),
            has_chapters,
            root_images: root.iter().map(|s| s.to_string()).collect(),
            chapters: chapters
                .iter()
                .map(|(name, images)| WalkedChapter {
                    name: name.to_string(),
                    images: images.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_build_entry_orders_structure() {
        let entry = build_entry(walked(
            true,
            &["cover.jpg"],
            &[
                ("番外", &["1.jpg"]),
                ("第10话", &["b.jpg", "a.jpg"]),
                ("第2话", &["x.jpg"]),
            ],
        ));

        let keys: Vec<&str> = entry.structure.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["main", "第2话", "第10话", "番外"]);
        assert_eq!(
            entry.pages("第10话").unwrap(),
            &[
                PagePath::in_chapter("漫画", "第10话", "a.jpg"),
                PagePath::in_chapter("漫画", "第10话", "b.jpg"),
            ]
        );
        assert_eq!(
            entry.cover_image,
            Some(PagePath::in_chapter("漫画", "第2话", "x.jpg"))
        );
    }

    #[test]
    fn test_build_entry_without_loose_pages_has_no_main() {
        let entry = build_entry(walked(true, &[], &[("第1话", &["1.jpg"])]));
        assert!(entry.pages(MAIN_CHAPTER_KEY).is_none());
    }

    #[test]
    fn test_builder_validation() {
        assert!(LibraryConfig::builder().build().is_err());
        assert!(
            LibraryConfig::builder()
                .library_root(PathBuf::new())
                .build()
                .is_err()
        );
        assert!(
            LibraryConfig::builder()
                .library_root("lib")
                .url_base("manhua")
                .build()
                .is_err()
        );
        assert!(
            LibraryConfig::builder()
                .library_root("lib")
                .max_concurrent_dirs(0usize)
                .build()
                .is_err()
        );

        let config = LibraryConfig::builder().library_root("lib").build().unwrap();
        assert_eq!(config.url_base, "/manhua");
        assert_eq!(config.max_concurrent_dirs, DEFAULT_MAX_CONCURRENT_DIRS);
        assert!(!config.skip_hidden);
    }

    #[test]
    fn test_comic_path_rejects_traversal() {
        let config = LibraryConfig::builder().library_root("lib").build().unwrap();
        assert!(matches!(config.comic_path(""), Err(Error::EmptyComicName)));
        assert!(config.comic_path("..").is_err());
        assert!(config.comic_path("a/b").is_err());
        assert!(config.comic_path("/etc").is_err());
        assert_eq!(config.comic_path("海贼王").unwrap(), PathBuf::from("lib/海贼王"));
    }

    #[test]
    fn test_page_url_uses_base() {
        let config = LibraryConfig::builder()
            .library_root("lib")
            .url_base("/comics")
            .build()
            .unwrap();
        let page = PagePath::in_root("A B", "00001.jpg");
        assert_eq!(config.page_url(&page), "/comics/A%20B/00001.jpg");
    }
}
