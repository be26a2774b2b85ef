//! Hondana - Comic Library Indexing Library
//!
//! This crate turns a folder of comic folders into a browsable shelf: every comic
//! is classified as chaptered or single-section, gets an ordered page manifest per
//! chapter, and a representative cover. Chapters follow a natural order that
//! understands Arabic digits, Chinese numerals and extras sections (番外, 后记, ...).
//!
//! # Getting Started
//!
//! Configure a [`LibraryConfig`] via its builder and call
//! [`scan`](LibraryConfig::scan). Every scan reads the disk from scratch.
//!
//! ```rust,no_run
//! use hondana::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> hondana::error::Result<()> {
//!     let config = LibraryConfig::builder()
//!         .library_root(PathBuf::from("./manhua"))
//!         .build()?;
//!
//!     let listing = config.scan().await?;
//!     for warning in &listing.warnings {
//!         eprintln!("skipped: {}", warning);
//!     }
//!
//!     for comic in &listing.comics {
//!         println!("{} ({} chapters)", comic.name, comic.chapter_list().len());
//!         if let Some(cover) = &comic.cover_image {
//!             println!("  cover: {}", config.page_url(cover));
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! The ordering rules live in [`order`] and can be used on their own, e.g. to sort
//! chapter names coming from somewhere other than a scan.

pub mod cover;
pub mod error;
pub mod favorites;
pub mod library;
pub mod order;
pub mod path_utils;
pub mod types;
pub mod walker;

pub use library::LibraryConfig;
pub use library::LibraryConfigBuilder;

pub use types::{
    ChapterStructure, ComicEntry, LibraryListing, MAIN_CHAPTER_KEY, PagePath, ReadingPosition,
    ScanWarning, WarningKind,
};

/// Prelude module for convenient imports.
///
/// Re-exports the most commonly used types so a single `use hondana::prelude::*;`
/// covers scanning, ordering and favorites.
pub mod prelude {
    pub use super::{
        ChapterStructure, ComicEntry, LibraryConfig, LibraryConfigBuilder, LibraryListing,
        MAIN_CHAPTER_KEY, PagePath, ReadingPosition, ScanWarning, WarningKind, error, types,
    };
    pub use crate::favorites::{FavoritesStore, MemoryFavorites, mark_favorites};
    pub use crate::order::{compare_chapters, compare_reading_order};
    pub use std::cmp::Ordering;
    pub use std::path::{Path, PathBuf};
}
