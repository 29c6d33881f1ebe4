//! Local predicate for client-filter mode.
//!
//! The same facets travel to the source as fetch parameters in server-filter
//! mode; here they are evaluated against the loaded window instead.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};

use super::Filters;
use crate::enum_display_fromstr;
use crate::error::FolioError;
use crate::types::{FieldValue, Item};

/// Where the status/tag/search facets are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Server,
    Client,
}

enum_display_fromstr!(
    FilterMode,
    FolioError::InvalidMode,
    {
        Server => "server",
        Client => "client",
    }
);

/// How free-text search is matched against item fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMatch {
    #[default]
    Substring,
    Fuzzy,
}

enum_display_fromstr!(
    SearchMatch,
    FolioError::InvalidMode,
    {
        Substring => "substring",
        Fuzzy => "fuzzy",
    }
);

/// The conjunction of the active facets, ready to test items.
pub struct ItemPredicate<'a> {
    filters: &'a Filters,
    search_fields: &'a [String],
    needle: Option<String>,
    how: SearchMatch,
    matcher: SkimMatcherV2,
}

impl<'a> ItemPredicate<'a> {
    /// `search_fields` empty means every text field is searched.
    pub fn new(filters: &'a Filters, search_fields: &'a [String], how: SearchMatch) -> Self {
        let needle = filters.search.as_deref().map(|s| match how {
            SearchMatch::Substring => s.to_lowercase(),
            SearchMatch::Fuzzy => s.to_string(),
        });
        Self {
            filters,
            search_fields,
            needle,
            how,
            matcher: SkimMatcherV2::default().smart_case(),
        }
    }

    pub fn matches(&self, item: &Item) -> bool {
        if self.filters.status.is_some() && item.status != self.filters.status {
            return false;
        }
        if let Some(tag) = &self.filters.tag {
            if !item.has_tag(tag) {
                return false;
            }
        }
        match &self.needle {
            Some(needle) => self.matches_search(item, needle),
            None => true,
        }
    }

    fn matches_search(&self, item: &Item, needle: &str) -> bool {
        let haystacks = self.haystacks(item);
        match self.how {
            SearchMatch::Substring => haystacks
                .iter()
                .any(|text| text.to_lowercase().contains(needle)),
            SearchMatch::Fuzzy => {
                let joined = haystacks.join(" ");
                self.matcher.fuzzy_match(&joined, needle).is_some()
            }
        }
    }

    fn haystacks(&self, item: &Item) -> Vec<String> {
        if self.search_fields.is_empty() {
            item.fields
                .values()
                .filter_map(FieldValue::as_text)
                .map(str::to_string)
                .collect()
        } else {
            self.search_fields
                .iter()
                .filter_map(|name| item.field(name))
                .map(FieldValue::to_string)
                .collect()
        }
    }
}

/// Items of `items` passing every active facet, in their original order.
pub fn filter_items(
    items: &[Item],
    filters: &Filters,
    search_fields: &[String],
    how: SearchMatch,
) -> Vec<Item> {
    if filters.is_empty() {
        return items.to_vec();
    }
    let predicate = ItemPredicate::new(filters, search_fields, how);
    items
        .iter()
        .filter(|item| predicate.matches(item))
        .cloned()
        .collect()
}
