//! Aggregation Utilities
//! Value counts, top-N rankings and two-key pivots shared by the analyses.
//!
//! Rankings order by descending count. Equal counts keep the order in which
//! their keys were first encountered, so results never depend on hashing.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

/// Count occurrences of each key, ranked by descending count.
pub fn count_by_key<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match slots.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    // sort_by is stable: ties stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Count occurrences of each key, ordered by key.
pub fn count_sorted_by_key<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// First `n` entries of an already ranked count list.
pub fn top_n<K: Clone>(ranked: &[(K, usize)], n: usize) -> Vec<(K, usize)> {
    ranked.iter().take(n).cloned().collect()
}

/// The `n` items with the largest key, ties in original order.
pub fn rank_by_key<T, F>(items: &[T], n: usize, key: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> usize,
{
    let mut ranked = items.to_vec();
    ranked.sort_by(|a, b| key(b).cmp(&key(a)));
    ranked.truncate(n);
    ranked
}

/// The first item holding the maximum key, or `None` when `items` is empty.
pub fn first_max_by_key<T, F>(items: &[T], key: F) -> Option<&T>
where
    F: Fn(&T) -> usize,
{
    let mut best: Option<&T> = None;
    for item in items {
        if best.map_or(true, |current| key(item) > key(current)) {
            best = Some(item);
        }
    }
    best
}

/// Split a comma-joined list into trimmed, non-empty entries.
pub fn split_list(value: &str) -> impl Iterator<Item = &str> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// Number of comma-separated entries; a value without commas counts as one.
pub fn count_list_entries(value: &str) -> usize {
    value.split(',').count()
}

/// Counts grouped by two keys: one row per `R`, one column per `C`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotTable<R, C> {
    pub rows: Vec<R>,
    pub columns: Vec<C>,
    /// `cells[i][j]` counts pairs `(rows[i], columns[j])`; absent pairs are 0.
    pub cells: Vec<Vec<usize>>,
}

impl<R, C> PivotTable<R, C> {
    /// Sum of every cell.
    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    /// Counts of one column across all rows.
    pub fn column_counts(&self, column: usize) -> Vec<usize> {
        self.cells
            .iter()
            .map(|row| row.get(column).copied().unwrap_or(0))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Count `(row, column)` pairs into a pivot with sorted rows and columns.
pub fn pivot_counts<R, C, I>(pairs: I) -> PivotTable<R, C>
where
    R: Ord + Clone,
    C: Ord + Clone,
    I: IntoIterator<Item = (R, C)>,
{
    let mut counts: BTreeMap<(R, C), usize> = BTreeMap::new();
    let mut columns: BTreeSet<C> = BTreeSet::new();
    let mut rows: BTreeSet<R> = BTreeSet::new();

    for (row, column) in pairs {
        rows.insert(row.clone());
        columns.insert(column.clone());
        *counts.entry((row, column)).or_insert(0) += 1;
    }

    let rows: Vec<R> = rows.into_iter().collect();
    let columns: Vec<C> = columns.into_iter().collect();
    let cells = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    counts
                        .get(&(row.clone(), column.clone()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect();

    PivotTable {
        rows,
        columns,
        cells,
    }
}
