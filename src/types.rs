//! Core data types, constants and reports for the Hondana indexing engine.
//!
//! This module defines the fundamental data structures produced by a library scan:
//! - Per-comic output (`ComicEntry`, `ChapterStructure`, `PagePath`)
//! - Scan-wide output (`LibraryListing`, `ScanWarning`, `WarningKind`)
//! - Reader navigation state (`ReadingPosition`)
//! - The fixed name tables every stage agrees on (`MAIN_CHAPTER_KEY`,
//!   `IMAGE_EXTENSIONS`, `STANDARD_COVER_NAMES`)

use indexmap::IndexMap;
use std::fmt;
use std::path::PathBuf;

use crate::order::compare_reading_order;
use crate::path_utils::{join_encoded, url_under_base};

/// Reserved chapter key holding the loose images that sit directly in a comic folder.
pub const MAIN_CHAPTER_KEY: &str = "main";

/// Extensions (matched case-insensitively) that make a file a page.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// File names tried, in this order, before falling back to the first page.
pub const STANDARD_COVER_NAMES: [&str; 4] =
    ["00001.webp", "00001.jpg", "00001.jpeg", "00001.png"];

/// One image inside a comic, addressed by raw (unencoded) name segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PagePath {
    comic: String,
    chapter: Option<String>,
    file: String,
}

impl PagePath {
    /// A page lying directly in the comic folder.
    pub fn in_root(comic: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            comic: comic.into(),
            chapter: None,
            file: file.into(),
        }
    }

    /// A page inside a chapter folder.
    pub fn in_chapter(
        comic: impl Into<String>,
        chapter: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            comic: comic.into(),
            chapter: Some(chapter.into()),
            file: file.into(),
        }
    }

    pub fn comic(&self) -> &str {
        &self.comic
    }

    /// The chapter folder name, `None` for root-level pages.
    pub fn chapter(&self) -> Option<&str> {
        self.chapter.as_deref()
    }

    pub fn file_name(&self) -> &str {
        &self.file
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.comic.as_str())
            .chain(self.chapter.as_deref())
            .chain(std::iter::once(self.file.as_str()))
    }

    /// Raw `comic/chapter/file` path, relative to the library root.
    pub fn relative(&self) -> String {
        self.segments().collect::<Vec<_>>().join("/")
    }

    /// Relative path with every segment percent-encoded on its own.
    pub fn encoded(&self) -> String {
        join_encoded(self.segments())
    }

    /// Full URL under a serving base segment, e.g. `/manhua/%E6%BC%AB/00001.jpg`.
    pub fn to_url(&self, base: &str) -> String {
        url_under_base(base, &self.encoded())
    }

    /// Location of the page on disk below `library_root`.
    pub fn to_fs_path(&self, library_root: &std::path::Path) -> PathBuf {
        self.segments()
            .fold(library_root.to_path_buf(), |path, segment| path.join(segment))
    }
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PagePath {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.encoded())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PagePath {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let encoded = <String as serde::Deserialize>::deserialize(deserializer)?;
        let segments = encoded
            .split('/')
            .map(|segment| {
                percent_encoding::percent_decode_str(segment)
                    .decode_utf8()
                    .map(|decoded| decoded.into_owned())
                    .map_err(D::Error::custom)
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        match segments.as_slice() {
            [comic, file] => Ok(PagePath::in_root(comic, file)),
            [comic, chapter, file] => Ok(PagePath::in_chapter(comic, chapter, file)),
            _ => Err(D::Error::custom(format!(
                "expected 2 or 3 path segments, found {}",
                segments.len()
            ))),
        }
    }
}

/// Ordered mapping of chapter key to its ordered pages.
pub type ChapterStructure = IndexMap<String, Vec<PagePath>>;

/// One browsable comic as produced by a scan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ComicEntry {
    /// Directory name, unique within one scan.
    pub name: String,
    /// True when the comic folder holds at least one subdirectory.
    pub has_chapters: bool,
    /// Representative image, always one of the pages in `structure` when set.
    pub cover_image: Option<PagePath>,
    /// Chapter key to pages, keys in reading order (`main` first when present).
    pub structure: ChapterStructure,
}

impl ComicEntry {
    /// Pages stored under a chapter key.
    pub fn pages(&self, chapter: &str) -> Option<&[PagePath]> {
        self.structure.get(chapter).map(Vec::as_slice)
    }

    /// Chapter keys for a chapter listing: everything except `main`, in natural order.
    pub fn chapter_list(&self) -> Vec<&str> {
        self.reading_order()
            .into_iter()
            .filter(|key| *key != MAIN_CHAPTER_KEY)
            .collect()
    }

    /// Chapter keys in reader order: `main` pinned first, then natural order.
    pub fn reading_order(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.structure.keys().map(String::as_str).collect();
        keys.sort_by(|a, b| compare_reading_order(a, b));
        keys
    }

    /// Chapter a reader opens when none was requested.
    pub fn default_chapter(&self) -> Option<&str> {
        if self.has_chapters {
            self.reading_order().into_iter().next()
        } else {
            self.structure
                .get_key_value(MAIN_CHAPTER_KEY)
                .map(|(key, _)| key.as_str())
        }
    }

    /// Position after turning one page forward, crossing into the next chapter's
    /// first page at a chapter end. `None` past the last page of the book, and for
    /// positions that do not point at an existing page.
    pub fn next_position(&self, position: &ReadingPosition) -> Option<ReadingPosition> {
        let pages = self.pages(&position.chapter)?;
        if position.page >= pages.len() {
            return None;
        }
        if position.page + 1 < pages.len() {
            return Some(ReadingPosition::new(&position.chapter, position.page + 1));
        }

        let order = self.reading_order();
        let index = order.iter().position(|key| *key == position.chapter)?;
        order[index + 1..]
            .iter()
            .find(|key| self.pages(key).is_some_and(|p| !p.is_empty()))
            .map(|key| ReadingPosition::new(*key, 0))
    }

    /// Position after turning one page back, landing on the previous chapter's
    /// last page at a chapter start. `None` before the first page of the book, and
    /// for positions that do not point at an existing page.
    pub fn previous_position(&self, position: &ReadingPosition) -> Option<ReadingPosition> {
        let pages = self.pages(&position.chapter)?;
        if position.page >= pages.len() {
            return None;
        }
        if position.page > 0 {
            return Some(ReadingPosition::new(&position.chapter, position.page - 1));
        }

        let order = self.reading_order();
        let index = order.iter().position(|key| *key == position.chapter)?;
        order[..index].iter().rev().find_map(|key| {
            let pages = self.pages(key)?;
            pages
                .len()
                .checked_sub(1)
                .map(|last| ReadingPosition::new(*key, last))
        })
    }

    /// Whether a page is listed anywhere in this comic's structure.
    pub fn contains_page(&self, page: &PagePath) -> bool {
        self.structure.values().any(|pages| pages.contains(page))
    }
}

/// Chapter key plus zero-based page index.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadingPosition {
    pub chapter: String,
    pub page: usize,
}

impl ReadingPosition {
    pub fn new(chapter: impl Into<String>, page: usize) -> Self {
        Self {
            chapter: chapter.into(),
            page,
        }
    }
}

/// What went wrong with an item that was skipped during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WarningKind {
    /// The comic directory could not be listed; the comic is left out.
    ReadComic,
    /// A chapter directory could not be listed; the chapter is left out.
    ReadChapter,
    /// An entry vanished or could not be inspected.
    Stat,
    /// An entry name is not valid UTF-8 and cannot be addressed by URL.
    NonUtf8Name,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WarningKind::ReadComic => "failed to read comic",
            WarningKind::ReadChapter => "failed to read chapter",
            WarningKind::Stat => "failed to inspect entry",
            WarningKind::NonUtf8Name => "entry name is not valid UTF-8",
        };
        f.write_str(label)
    }
}

/// A non-fatal problem recorded while walking the library.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanWarning {
    pub path: PathBuf,
    pub kind: WarningKind,
    pub message: String,
}

impl ScanWarning {
    pub fn new(path: PathBuf, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}: {}", self.kind, self.path, self.message)
    }
}

/// Result of one library scan.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LibraryListing {
    pub comics: Vec<ComicEntry>,
    pub warnings: Vec<ScanWarning>,
}

impl LibraryListing {
    pub fn len(&self) -> usize {
        self.comics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comics.is_empty()
    }

    /// Looks a comic up by its exact directory name.
    pub fn find(&self, name: &str) -> Option<&ComicEntry> {
        self.comics.iter().find(|comic| comic.name == name)
    }

    /// Case-insensitive substring filter on comic names; a blank query keeps everything.
    pub fn search(&self, query: &str) -> Vec<&ComicEntry> {
        if query.trim().is_empty() {
            return self.comics.iter().collect();
        }
        let needle = query.to_lowercase();
        self.comics
            .iter()
            .filter(|comic| comic.name.to_lowercase().contains(&needle))
            .collect()
    }
}
