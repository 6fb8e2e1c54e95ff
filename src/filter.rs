//! Field-selectable, case-insensitive substring filtering over loaded rows.

use crate::resource::Filterable;

/// True when the chosen field of `item` contains `query`, ignoring case.
/// An empty query matches everything.
pub fn matches<T: Filterable>(item: &T, field: T::Field, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    contains_folded(&item.field_text(field), &query.to_lowercase())
}

fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Positions of the rows that pass, in their original order.
pub fn filter_indices<T: Filterable>(items: &[T], field: T::Field, query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..items.len()).collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| contains_folded(&item.field_text(field), &needle))
        .map(|(i, _)| i)
        .collect()
}

pub fn filter<'a, T: Filterable>(items: &'a [T], field: T::Field, query: &str) -> Vec<&'a T> {
    filter_indices(items, field, query)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}
