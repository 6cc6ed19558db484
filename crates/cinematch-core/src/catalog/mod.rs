//! The ordered, immutable movie catalog.

pub mod load;

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::model::CatalogEntry;

pub use load::{load_catalog, load_catalog_file, REQUIRED_COLUMNS};

/// Ordered catalog entries plus a case-insensitive title lookup.
///
/// Positions are stable for the lifetime of the catalog and double as row
/// and column indices of the similarity matrix.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    /// Lowercased title -> position of its first occurrence.
    by_title: HashMap<String, usize>,
}

impl Catalog {
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut by_title = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            match by_title.entry(entry.title.to_lowercase()) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(first) => {
                    log::debug!(
                        "Duplicate title {:?} at position {} (first seen at {})",
                        entry.title,
                        position,
                        first.get()
                    );
                }
            }
        }
        Self { entries, by_title }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&CatalogEntry> {
        self.entries.get(position)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    /// Composite documents in catalog order.
    pub fn documents(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(CatalogEntry::composite_document)
            .collect()
    }

    /// Position of the entry with this title, compared case-insensitively.
    ///
    /// When several entries share a title the first one in catalog order
    /// wins.
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.by_title.get(&title.to_lowercase()).copied()
    }

    /// Titles (as first spelled in the catalog) that occur more than once,
    /// in order of first appearance.
    pub fn duplicate_titles(&self) -> Vec<&str> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for entry in &self.entries {
            *counts.entry(entry.title.to_lowercase()).or_insert(0) += 1;
        }

        self.entries
            .iter()
            .enumerate()
            .filter(|(position, entry)| {
                let key = entry.title.to_lowercase();
                counts.get(&key).is_some_and(|&n| n > 1)
                    && self.by_title.get(&key) == Some(position)
            })
            .map(|(_, entry)| entry.title.as_str())
            .collect()
    }

    /// Entries whose title contains `fragment`, compared case-insensitively.
    pub fn search_titles(&self, fragment: &str) -> Vec<(usize, &CatalogEntry)> {
        let needle = fragment.to_lowercase();
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.title.to_lowercase().contains(&needle))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::new("Heat").with_director("Michael Mann"),
            CatalogEntry::new("Alien"),
            CatalogEntry::new("heat").with_director("Someone Else"),
            CatalogEntry::new("Aliens"),
        ])
    }

    #[test]
    fn test_position_of_is_case_insensitive() {
        let catalog = sample();
        assert_eq!(catalog.position_of("ALIEN"), Some(1));
        assert_eq!(catalog.position_of("aliens"), Some(3));
    }

    #[test]
    fn test_duplicate_title_resolves_to_first_occurrence() {
        let catalog = sample();
        assert_eq!(catalog.position_of("HEAT"), Some(0));
        assert_eq!(catalog.get(0).unwrap().director, "Michael Mann");
    }

    #[test]
    fn test_position_of_unknown_title() {
        assert_eq!(sample().position_of("Vertigo"), None);
    }

    #[test]
    fn test_duplicate_titles_reports_first_spelling_once() {
        assert_eq!(sample().duplicate_titles(), vec!["Heat"]);
    }

    #[test]
    fn test_search_titles_substring() {
        let catalog = sample();
        let hits: Vec<usize> = catalog.search_titles("ALI").into_iter().map(|(p, _)| p).collect();
        assert_eq!(hits, vec![1, 3]);
    }

    #[test]
    fn test_documents_follow_catalog_order() {
        let catalog: Catalog = vec![
            CatalogEntry::new("A").with_genre("Action"),
            CatalogEntry::new("B").with_genre("Drama"),
        ]
        .into_iter()
        .collect();

        let docs = catalog.documents();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].starts_with("Action"));
        assert!(docs[1].starts_with("Drama"));
    }
}
