//! Cover selection for indexed comics.
//!
//! Works on an already sorted [`ComicEntry`], so the chosen cover is always one of
//! the pages listed in its structure. Search order, first hit wins:
//!
//! 1. A standard cover name (`00001.webp`, `00001.jpg`, `00001.jpeg`, `00001.png`)
//!    among the loose pages in the comic root.
//! 2. Without chapters: the first loose page.
//! 3. With chapters: the first regular chapter (or the first chapter of all if
//!    every chapter is an extra), its standard cover name, else its first page.
//!    A chapter folder named `main` shares its key with the loose pages but still
//!    competes here as a chapter, with only its own pages.
//!
//! No match is a normal outcome and yields `None`.

use crate::order::{compare_chapters, is_special_section};
use crate::types::{ComicEntry, MAIN_CHAPTER_KEY, PagePath, STANDARD_COVER_NAMES};

/// Picks the representative image for a comic.
pub fn resolve_cover(comic: &ComicEntry) -> Option<PagePath> {
    let loose_pages = comic.pages(MAIN_CHAPTER_KEY).unwrap_or(&[]);

    if let Some(cover) = find_standard_cover(loose_pages) {
        log::debug!("Comic {:?}: standard cover in root", comic.name);
        return Some(cover.clone());
    }

    if !comic.has_chapters {
        return loose_pages.first().cloned();
    }

    let chapters = cover_candidates(comic);
    let chapter = pick_cover_chapter(&chapters)?;
    let pages: Vec<PagePath> = comic
        .pages(chapter)
        .unwrap_or(&[])
        .iter()
        .filter(|page| page.chapter() == Some(chapter))
        .cloned()
        .collect();
    log::debug!("Comic {:?}: cover taken from chapter {:?}", comic.name, chapter);

    find_standard_cover(&pages)
        .or_else(|| pages.first())
        .cloned()
}

/// Chapter folders in natural order, including one named `main`.
fn cover_candidates(comic: &ComicEntry) -> Vec<&str> {
    let mut chapters = comic.chapter_list();
    let main_folder = comic
        .pages(MAIN_CHAPTER_KEY)
        .is_some_and(|pages| pages.iter().any(|p| p.chapter() == Some(MAIN_CHAPTER_KEY)));
    if main_folder {
        chapters.push(MAIN_CHAPTER_KEY);
        chapters.sort_by(|a, b| compare_chapters(a, b));
    }
    chapters
}

/// First regular chapter of an ordered chapter list, or the first chapter when
/// all of them are extras.
pub fn pick_cover_chapter<'a>(ordered_chapters: &[&'a str]) -> Option<&'a str> {
    ordered_chapters
        .iter()
        .find(|name| !is_special_section(name))
        .or_else(|| ordered_chapters.first())
        .copied()
}

/// First standard cover name present among the pages, in priority order.
pub fn find_standard_cover(pages: &[PagePath]) -> Option<&PagePath> {
    STANDARD_COVER_NAMES.iter().find_map(|standard| {
        pages
            .iter()
            .find(|page| page.file_name() == *standard)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChapterStructure;

    fn chapterless(files: &[&str]) -> ComicEntry {
        let mut structure = ChapterStructure::new();
        structure.insert(
            MAIN_CHAPTER_KEY.to_string(),
            files.iter().map(|f| PagePath::in_root("c", *f)).collect(),
        );
        ComicEntry {
            name: "c".to_string(),
            has_chapters: false,
            cover_image: None,
            structure,
        }
    }

    fn chaptered(chapters: &[(&str, &[&str])]) -> ComicEntry {
        let mut structure = ChapterStructure::new();
        for (chapter, files) in chapters {
            structure.insert(
                chapter.to_string(),
                files
                    .iter()
                    .map(|f| PagePath::in_chapter("c", *chapter, *f))
                    .collect(),
            );
        }
        ComicEntry {
            name: "c".to_string(),
            has_chapters: true,
            cover_image: None,
            structure,
        }
    }

    #[test]
    fn test_standard_name_beats_first_page() {
        let comic = chapterless(&["00001.jpg", "a.jpg", "b.png"]);
        assert_eq!(
            resolve_cover(&comic),
            Some(PagePath::in_root("c", "00001.jpg"))
        );
    }

    #[test]
    fn test_standard_names_in_priority_order() {
        let comic = chapterless(&["00001.jpg", "00001.png", "00001.webp"]);
        assert_eq!(
            resolve_cover(&comic).map(|p| p.file_name().to_string()),
            Some("00001.webp".to_string())
        );
    }

    #[test]
    fn test_first_page_without_standard_name() {
        let comic = chapterless(&["apple.png", "banana.jpg"]);
        assert_eq!(
            resolve_cover(&comic),
            Some(PagePath::in_root("c", "apple.png"))
        );
    }

    #[test]
    fn test_empty_comic_has_no_cover() {
        let mut comic = chapterless(&[]);
        assert_eq!(resolve_cover(&comic), None);
        comic.structure.clear();
        assert_eq!(resolve_cover(&comic), None);
    }

    #[test]
    fn test_root_standard_cover_on_chaptered_comic() {
        let mut comic = chaptered(&[("第1话", &["001.jpg"])]);
        comic.structure.insert(
            MAIN_CHAPTER_KEY.to_string(),
            vec![PagePath::in_root("c", "00001.png")],
        );
        assert_eq!(
            resolve_cover(&comic),
            Some(PagePath::in_root("c", "00001.png"))
        );
    }

    #[test]
    fn test_loose_non_standard_page_is_ignored_when_chaptered() {
        let mut comic = chaptered(&[("第1话", &["001.jpg"])]);
        comic.structure.insert(
            MAIN_CHAPTER_KEY.to_string(),
            vec![PagePath::in_root("c", "cover.jpg")],
        );
        assert_eq!(
            resolve_cover(&comic),
            Some(PagePath::in_chapter("c", "第1话", "001.jpg"))
        );
    }

    #[test]
    fn test_first_regular_chapter_is_used() {
        let comic = chaptered(&[
            ("番外 温泉", &["00001.jpg"]),
            ("第2话", &["001.jpg"]),
            ("第1话", &["002.jpg", "00001.jpeg"]),
        ]);
        assert_eq!(
            resolve_cover(&comic),
            Some(PagePath::in_chapter("c", "第1话", "00001.jpeg"))
        );
    }

    #[test]
    fn test_all_special_falls_back_to_first_chapter() {
        let comic = chaptered(&[("后记", &["b.jpg"]), ("番外1", &["a.jpg"])]);
        assert_eq!(pick_cover_chapter(&comic.chapter_list()), Some("番外1"));
        assert_eq!(
            resolve_cover(&comic),
            Some(PagePath::in_chapter("c", "番外1", "a.jpg"))
        );
    }

    #[test]
    fn test_empty_first_chapter_gives_no_cover() {
        let comic = chaptered(&[("第1话", &[]), ("第2话", &["001.jpg"])]);
        assert_eq!(resolve_cover(&comic), None);
    }

    #[test]
    fn test_folder_named_main_competes_as_chapter() {
        let mut comic = chaptered(&[("番外", &["00001.jpg"])]);
        comic.structure.insert(
            MAIN_CHAPTER_KEY.to_string(),
            vec![
                PagePath::in_root("c", "cover.jpg"),
                PagePath::in_chapter("c", "main", "a.jpg"),
            ],
        );
        assert_eq!(cover_candidates(&comic), vec!["main", "番外"]);
        assert_eq!(
            resolve_cover(&comic),
            Some(PagePath::in_chapter("c", "main", "a.jpg"))
        );
    }

    #[test]
    fn test_loose_pages_alone_are_not_a_chapter() {
        let mut comic = chaptered(&[("番外", &["00001.jpg"])]);
        comic.structure.insert(
            MAIN_CHAPTER_KEY.to_string(),
            vec![PagePath::in_root("c", "cover.jpg")],
        );
        assert_eq!(cover_candidates(&comic), vec!["番外"]);
    }

    #[test]
    fn test_pick_cover_chapter_empty() {
        assert_eq!(pick_cover_chapter(&[]), None);
    }
}
