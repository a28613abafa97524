use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::types::{value_as_text, FilterSort, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    pub fn generate(sort: &FilterSort) -> String {
        // Documents without the field go last in either direction
        format!(
            "ORDER BY doc->>'{}' {} NULLS LAST",
            sort.field,
            sort.direction.to_sql()
        )
    }

    /// Compare two documents by the sort field. Timestamps are stored in a
    /// fixed-width format, so text order is chronological order.
    pub fn compare(sort: &FilterSort, a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
        let left = a.get(&sort.field).and_then(value_as_text);
        let right = b.get(&sort.field).and_then(value_as_text);
        match (left, right) {
            (Some(l), Some(r)) => match sort.direction {
                SortDirection::Asc => l.cmp(&r),
                SortDirection::Desc => r.cmp(&l),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
