//! Stable ordering of (key, value) pairs.
//!
//! Used for candidate selection (ascending by score) and for the eviction
//! ranking (descending by weight). Both directions are stable: entries that
//! compare equal keep the order they were given in.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Key,
    Value,
}

pub fn sort_entries<K, I>(entries: I, by: SortBy, descending: bool) -> Vec<(K, f64)>
where
    K: Ord,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut sorted: Vec<(K, f64)> = entries.into_iter().collect();
    sorted.sort_by(|a, b| {
        let ord = compare(a, b, by);
        if descending { ord.reverse() } else { ord }
    });
    sorted
}

fn compare<K: Ord>(a: &(K, f64), b: &(K, f64), by: SortBy) -> Ordering {
    match by {
        SortBy::Key => a.0.cmp(&b.0),
        SortBy::Value => a.1.total_cmp(&b.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<(String, f64)> {
        vec![
            ("CBA".to_string(), 0.2),
            ("BHP".to_string(), 0.5),
            ("WBC".to_string(), 0.1),
        ]
    }

    fn keys(sorted: &[(String, f64)]) -> Vec<&str> {
        sorted.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn by_value_ascending() {
        let sorted = sort_entries(entries(), SortBy::Value, false);
        assert_eq!(keys(&sorted), vec!["WBC", "CBA", "BHP"]);
    }

    #[test]
    fn by_value_descending() {
        let sorted = sort_entries(entries(), SortBy::Value, true);
        assert_eq!(keys(&sorted), vec!["BHP", "CBA", "WBC"]);
    }

    #[test]
    fn by_key_both_directions() {
        let asc = sort_entries(entries(), SortBy::Key, false);
        assert_eq!(keys(&asc), vec!["BHP", "CBA", "WBC"]);
        let desc = sort_entries(entries(), SortBy::Key, true);
        assert_eq!(keys(&desc), vec!["WBC", "CBA", "BHP"]);
    }

    #[test]
    fn ties_keep_input_order_ascending() {
        let input = vec![
            ("X".to_string(), 1.0),
            ("A".to_string(), 1.0),
            ("M".to_string(), 0.5),
        ];
        let sorted = sort_entries(input, SortBy::Value, false);
        assert_eq!(keys(&sorted), vec!["M", "X", "A"]);
    }

    #[test]
    fn ties_keep_input_order_descending() {
        let input = vec![
            ("X".to_string(), 1.0),
            ("A".to_string(), 1.0),
            ("M".to_string(), 2.0),
        ];
        let sorted = sort_entries(input, SortBy::Value, true);
        assert_eq!(keys(&sorted), vec!["M", "X", "A"]);
    }

    #[test]
    fn empty_input() {
        let sorted = sort_entries(Vec::<(String, f64)>::new(), SortBy::Value, true);
        assert!(sorted.is_empty());
    }
}
