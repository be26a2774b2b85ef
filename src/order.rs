//! Natural ordering of chapter names.
//!
//! Chapter folders are named by people, not by tools: `第12话`, `第三卷`,
//! `番外 温泉篇`, `Vol.2 后记`. This module turns such names into a strict total
//! order through a fixed cascade:
//!
//! 1. **Section class.** Names containing an extras keyword (番外, 特别, 附录, 番番,
//!    外传, 后记, 设定, 角色, 访谈, 卷末) are *special* and always sort after regular
//!    chapters, whatever numbers they carry.
//! 2. **Number.** The first run of ASCII digits is parsed; failing that, the
//!    [`CHINESE_NUMERALS`] table is scanned in order and the first entry contained
//!    in the name wins. Numbered names sort before unnumbered ones of the same
//!    class, and by value among themselves. This is the one place where the order
//!    departs from plain collation: `Afterword` lands after `Z9` because only the
//!    latter carries a number, although collation alone would put it first.
//! 3. **Collation.** Remaining ties go to a zh-CN style collation: symbols, then
//!    digits, then Han characters by pinyin, then cased letters (case-folded),
//!    then everything else. `序章` therefore sorts before `Prologue`.
//! 4. **Code points.** Identical collation keys fall back to the raw string, so
//!    only equal strings compare equal.
//!
//! Page file names are *not* ordered this way; see [`compare_page_names`].

use lazy_static::lazy_static;
use pinyin::ToPinyin;
use regex::Regex;
use std::cmp::Ordering;

use crate::types::MAIN_CHAPTER_KEY;

lazy_static! {
    /// Matches any extras/afterword/interview keyword anywhere in a name.
    pub static ref SPECIAL_SECTION_REGEX: Regex =
        Regex::new(r"(?i)番外|特别|附录|番番|外传|后记|设定|角色|访谈|卷末").unwrap();
    /// ASCII digits only; `\d` would also accept full-width and other scripts' digits.
    static ref DIGIT_RUN_REGEX: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// Chinese numeral lookup, scanned front to back with first-containment-wins.
///
/// The order is load-bearing. Every compound entry contains a single character
/// listed earlier, so `十一` resolves to 1 and `二十` to 2; libraries indexed with
/// this table already depend on the resulting chapter order.
pub const CHINESE_NUMERALS: [(&str, u64); 32] = [
    ("零", 0),
    ("一", 1),
    ("二", 2),
    ("三", 3),
    ("四", 4),
    ("五", 5),
    ("六", 6),
    ("七", 7),
    ("八", 8),
    ("九", 9),
    ("十", 10),
    ("百", 100),
    ("千", 1000),
    ("万", 10000),
    ("十一", 11),
    ("十二", 12),
    ("十三", 13),
    ("十四", 14),
    ("十五", 15),
    ("十六", 16),
    ("十七", 17),
    ("十八", 18),
    ("十九", 19),
    ("二十", 20),
    ("三十", 30),
    ("四十", 40),
    ("五十", 50),
    ("六十", 60),
    ("七十", 70),
    ("八十", 80),
    ("九十", 90),
    ("一百", 100),
];

/// Whether a chapter is a regular one or an extras section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionClass {
    Regular,
    Special,
}

impl SectionClass {
    pub fn of(name: &str) -> Self {
        if is_special_section(name) {
            SectionClass::Special
        } else {
            SectionClass::Regular
        }
    }
}

/// True if the name contains one of the extras keywords.
pub fn is_special_section(name: &str) -> bool {
    SPECIAL_SECTION_REGEX.is_match(name)
}

/// Extracts the number a chapter name is ordered by.
///
/// # Arguments
///
/// * `name` - Chapter folder name
///
/// # Returns
///
/// * `Option<u64>` - Value of the first ASCII digit run (saturating at `u64::MAX`),
///   else the first [`CHINESE_NUMERALS`] entry contained in the name, else `None`
pub fn extract_number(name: &str) -> Option<u64> {
    if let Some(run) = DIGIT_RUN_REGEX.find(name) {
        return Some(run.as_str().parse::<u64>().unwrap_or(u64::MAX));
    }

    CHINESE_NUMERALS
        .iter()
        .find(|(numeral, _)| name.contains(numeral))
        .map(|(_, value)| *value)
}

/// One collation element. Variant order is the primary script order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum CollationUnit {
    Symbol(char),
    Digit(char),
    Han(&'static str, char),
    Letter(char),
    Other(char),
}

impl CollationUnit {
    fn of(c: char) -> Self {
        if c.is_ascii_digit() {
            return CollationUnit::Digit(c);
        }
        if c.is_alphabetic() {
            if c.is_ascii_alphabetic() || c.is_lowercase() || c.is_uppercase() {
                return CollationUnit::Letter(c.to_lowercase().next().unwrap_or(c));
            }
            return match c.to_pinyin() {
                Some(pinyin) => CollationUnit::Han(pinyin.with_tone_num_end(), c),
                None => CollationUnit::Other(c),
            };
        }
        CollationUnit::Symbol(c)
    }
}

/// Sort key for the zh-CN collation step: primary elements, then case
/// (lowercase first).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<CollationUnit>,
    uppercase: Vec<bool>,
}

impl CollationKey {
    pub fn new(text: &str) -> Self {
        Self {
            primary: text.chars().map(CollationUnit::of).collect(),
            uppercase: text.chars().map(char::is_uppercase).collect(),
        }
    }
}

/// Compares two strings with the zh-CN collation alone, code points breaking ties.
pub fn compare_collated(a: &str, b: &str) -> Ordering {
    CollationKey::new(a)
        .cmp(&CollationKey::new(b))
        .then_with(|| a.cmp(b))
}

/// Precomputed position of a chapter name in the natural order.
///
/// Field order is the comparison order; deriving `Ord` keeps the cascade a
/// lexicographic tuple comparison and therefore transitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChapterSortKey {
    class: SectionClass,
    unnumbered: bool,
    number: u64,
    collation: CollationKey,
    raw: String,
}

impl ChapterSortKey {
    pub fn new(name: &str) -> Self {
        let number = extract_number(name);
        Self {
            class: SectionClass::of(name),
            unnumbered: number.is_none(),
            number: number.unwrap_or(0),
            collation: CollationKey::new(name),
            raw: name.to_string(),
        }
    }

    pub fn class(&self) -> SectionClass {
        self.class
    }

    pub fn number(&self) -> Option<u64> {
        (!self.unnumbered).then_some(self.number)
    }
}

/// Natural order over chapter names. Used for chapter lists and cover selection.
pub fn compare_chapters(a: &str, b: &str) -> Ordering {
    ChapterSortKey::new(a).cmp(&ChapterSortKey::new(b))
}

/// Reader order: the `main` key first, everything else naturally.
pub fn compare_reading_order(a: &str, b: &str) -> Ordering {
    match (a == MAIN_CHAPTER_KEY, b == MAIN_CHAPTER_KEY) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => compare_chapters(a, b),
    }
}

/// Plain lexical order for page file names, by UTF-16 code units.
pub fn compare_page_names(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Sorts chapter names in place, computing each sort key once.
pub fn sort_chapters(names: &mut [String]) {
    names.sort_by_cached_key(|name| ChapterSortKey::new(name));
}

/// Sorts page file names in place.
pub fn sort_pages(names: &mut [String]) {
    names.sort_by(|a, b| compare_page_names(a, b));
}
