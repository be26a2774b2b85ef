//! Favorites: the one piece of mutable state next to the index.
//!
//! The indexing engine never reads or writes favorites. This module gives the
//! surrounding service a store interface keyed by comic name, an in-memory
//! implementation, and a helper that decorates scan output with favorite flags
//! after the fact.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::types::ComicEntry;

/// One favorited comic.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct FavoriteRecord {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl FavoriteRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Rejects empty or whitespace-only comic names.
pub fn validate_comic_name(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        return Err(Error::EmptyComicName);
    }
    Ok(name)
}

/// Storage for favorite records, keyed by comic name.
///
/// Every call returns the full list of favorite names after the operation, in
/// the order they were first added.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Names of all favorited comics.
    async fn list(&self) -> Result<Vec<String>>;

    /// Marks a comic as favorite. Adding an existing favorite changes nothing.
    async fn add(&self, name: &str) -> Result<Vec<String>>;

    /// Removes a comic from the favorites. Removing an unknown name changes nothing.
    async fn remove(&self, name: &str) -> Result<Vec<String>>;
}

/// Process-local favorites store.
#[derive(Debug, Default)]
pub struct MemoryFavorites {
    records: RwLock<IndexMap<String, FavoriteRecord>>,
}

impl MemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full records, including creation time.
    pub async fn records(&self) -> Vec<FavoriteRecord> {
        self.records.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl FavoritesStore for MemoryFavorites {
    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.records.read().await.keys().cloned().collect())
    }

    async fn add(&self, name: &str) -> Result<Vec<String>> {
        let name = validate_comic_name(name)?;
        let mut records = self.records.write().await;
        if !records.contains_key(name) {
            log::debug!("Adding favorite {:?}", name);
            records.insert(name.to_string(), FavoriteRecord::new(name));
        }
        Ok(records.keys().cloned().collect())
    }

    async fn remove(&self, name: &str) -> Result<Vec<String>> {
        let name = validate_comic_name(name)?;
        let mut records = self.records.write().await;
        if records.shift_remove(name).is_some() {
            log::debug!("Removed favorite {:?}", name);
        }
        Ok(records.keys().cloned().collect())
    }
}

/// A scanned comic together with its favorite flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FavoritedComic<'a> {
    pub comic: &'a ComicEntry,
    pub is_favorite: bool,
}

/// Pairs every comic with whether its name is among the favorites.
pub fn mark_favorites<'a>(comics: &'a [ComicEntry], favorites: &[String]) -> Vec<FavoritedComic<'a>> {
    let favorites: HashSet<&str> = favorites.iter().map(String::as_str).collect();
    comics
        .iter()
        .map(|comic| FavoritedComic {
            comic,
            is_favorite: favorites.contains(comic.name.as_str()),
        })
        .collect()
}
