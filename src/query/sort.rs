//! Sort descriptors and the item comparator.
//!
//! In server-sort mode the sort travels to the source and nothing here runs
//! against the loaded window; in client-sort mode `sort_items` orders the
//! loaded window in place.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use unicase::UniCase;

use crate::enum_display_fromstr;
use crate::error::FolioError;
use crate::types::{FieldValue, Item};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

enum_display_fromstr!(
    SortDirection,
    FolioError::InvalidSortDirection,
    {
        Asc => "asc",
        Desc => "desc",
    }
);

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Where ordering happens for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Server,
    Client,
}

enum_display_fromstr!(
    SortMode,
    FolioError::InvalidMode,
    {
        Server => "server",
        Client => "client",
    }
);

/// A field plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Selecting the current field flips direction; a new field starts ascending.
    pub fn select(&self, field: &str) -> Self {
        if self.field == field {
            Self::new(field, self.direction.flip())
        } else {
            Self::asc(field)
        }
    }
}

fn kind_rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::Number(_) => 0,
        FieldValue::Date(_) => 1,
        FieldValue::Text(_) => 2,
    }
}

/// Compare two present field values.
///
/// Numbers compare arithmetically, dates by instant, text case-insensitively
/// with a byte-order fallback so distinct strings never tie.
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => x.total_cmp(y),
        (FieldValue::Date(x), FieldValue::Date(y)) => x.cmp(y),
        (FieldValue::Text(x), FieldValue::Text(y)) => UniCase::new(x.as_str())
            .cmp(&UniCase::new(y.as_str()))
            .then_with(|| x.cmp(y)),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

/// Total order for items under `spec`.
///
/// Items missing the field go last in either direction; ties fall back to
/// ascending id.
pub fn compare_items(a: &Item, b: &Item, spec: &SortSpec) -> Ordering {
    let by_field = match (a.field(&spec.field), b.field(&spec.field)) {
        (Some(x), Some(y)) => spec.direction.apply(compare_values(x, y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_field.then_with(|| a.id.cmp(&b.id))
}

pub fn sort_items(items: &mut [Item], spec: &SortSpec) {
    items.sort_by(|a, b| compare_items(a, b, spec));
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn ids(items: &[Item]) -> Vec<u64> {
        items.iter().map(|i| i.id.get()).collect()
    }

    fn ts(s: &str) -> jiff::Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn test_dates_compare_by_instant() {
        let mut items = vec![
            Item::new(1).with_field("date", ts("2024-03-01T00:00:00Z")),
            Item::new(2).with_field("date", ts("2023-12-31T23:00:00Z")),
            Item::new(3).with_field("date", ts("2024-01-15T00:00:00Z")),
        ];
        sort_items(&mut items, &SortSpec::asc("date"));
        assert_eq!(ids(&items), vec![2, 3, 1]);

        sort_items(&mut items, &SortSpec::desc("date"));
        assert_eq!(ids(&items), vec![1, 3, 2]);
    }

    #[test]
    fn test_numbers_compare_arithmetically() {
        let mut items = vec![
            Item::new(1).with_field("views", 100u64),
            Item::new(2).with_field("views", 9u64),
            Item::new(3).with_field("views", 20u64),
        ];
        sort_items(&mut items, &SortSpec::asc("views"));
        assert_eq!(ids(&items), vec![2, 3, 1]);
    }

    #[test]
    fn test_text_ignores_case() {
        let mut items = vec![
            Item::new(1).with_field("user_name", "bela"),
            Item::new(2).with_field("user_name", "Aarav"),
            Item::new(3).with_field("user_name", "Chitra"),
        ];
        sort_items(&mut items, &SortSpec::asc("user_name"));
        assert_eq!(ids(&items), vec![2, 1, 3]);
    }

    #[test]
    fn test_ties_break_by_ascending_id_in_both_directions() {
        let mut items = vec![
            Item::new(9).with_field("views", 5u64),
            Item::new(4).with_field("views", 5u64),
            Item::new(6).with_field("views", 1u64),
        ];
        sort_items(&mut items, &SortSpec::desc("views"));
        assert_eq!(ids(&items), vec![4, 9, 6]);

        sort_items(&mut items, &SortSpec::asc("views"));
        assert_eq!(ids(&items), vec![6, 4, 9]);
    }

    #[test]
    fn test_sorting_twice_is_stable() {
        let mut items: Vec<Item> = (1..=8)
            .rev()
            .map(|n| Item::new(n).with_field("views", (n % 3) as f64))
            .collect();
        let spec = SortSpec::desc("views");
        sort_items(&mut items, &spec);
        let first = ids(&items);
        sort_items(&mut items, &spec);
        assert_eq!(ids(&items), first);
    }

    #[test]
    fn test_missing_fields_sort_last() {
        let mut items = vec![
            Item::new(1),
            Item::new(2).with_field("views", 3u64),
            Item::new(3).with_field("views", 1u64),
        ];
        sort_items(&mut items, &SortSpec::desc("views"));
        assert_eq!(ids(&items), vec![2, 3, 1]);
        sort_items(&mut items, &SortSpec::asc("views"));
        assert_eq!(ids(&items), vec![3, 2, 1]);
    }

    #[test]
    fn test_select_flips_same_field_and_resets_new_field() {
        let spec = SortSpec::desc("date");
        assert_eq!(spec.select("date"), SortSpec::asc("date"));
        assert_eq!(spec.select("date").select("date"), SortSpec::desc("date"));
        assert_eq!(spec.select("views"), SortSpec::asc("views"));
    }

    #[test]
    fn test_direction_and_mode_parse() {
        assert_eq!(SortDirection::from_str("DESC").unwrap(), SortDirection::Desc);
        assert!(SortDirection::from_str("down").is_err());
        assert_eq!(SortMode::from_str("client").unwrap(), SortMode::Client);
        assert_eq!(SortMode::Server.to_string(), "server");
    }

    #[test]
    fn test_compare_items_is_total_on_ids() {
        let a = Item::new(1);
        let b = Item::new(2);
        assert_eq!(compare_items(&a, &b, &SortSpec::asc("absent")), Ordering::Less);
    }
}
