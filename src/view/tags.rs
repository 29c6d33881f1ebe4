//! Facet tags derived from the loaded window.

use std::collections::HashMap;

use crate::types::{FacetTag, Item, TagId};

/// A tag and how many loaded items reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUsage {
    pub tag: FacetTag,
    pub count: usize,
}

/// Deduplicated tags in first-seen order.
///
/// Counts cover only the items currently loaded, not the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    entries: Vec<TagUsage>,
}

impl TagIndex {
    pub fn from_items(items: &[Item]) -> Self {
        let mut entries: Vec<TagUsage> = Vec::new();
        let mut positions: HashMap<TagId, usize> = HashMap::new();

        for item in items {
            // An item listing a tag twice still counts once.
            let mut seen_here: Vec<&TagId> = Vec::new();
            for tag in &item.tags {
                if seen_here.contains(&&tag.id) {
                    continue;
                }
                seen_here.push(&tag.id);
                match positions.get(&tag.id) {
                    Some(&pos) => entries[pos].count += 1,
                    None => {
                        positions.insert(tag.id.clone(), entries.len());
                        entries.push(TagUsage {
                            tag: tag.clone(),
                            count: 1,
                        });
                    }
                }
            }
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[TagUsage] {
        &self.entries
    }

    pub fn get(&self, id: &TagId) -> Option<&FacetTag> {
        self.entries.iter().find(|e| &e.tag.id == id).map(|e| &e.tag)
    }

    pub fn count(&self, id: &TagId) -> usize {
        self.entries
            .iter()
            .find(|e| &e.tag.id == id)
            .map_or(0, |e| e.count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts are computed over the loaded window only.
    pub fn is_windowed(&self) -> bool {
        true
    }
}
