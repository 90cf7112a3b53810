use crate::model::Entry;
use std::collections::HashMap;

/// Keep one entry per logical name, taken from the lowest rank it appears
/// at, then order by `(rank, name)`.
///
/// Same name at the same rank keeps the entry whose path sorts first.
pub fn dedup_and_sort(entries: Vec<Entry>) -> Vec<Entry> {
    let mut min_rank: HashMap<String, usize> = HashMap::new();
    for entry in &entries {
        min_rank
            .entry(entry.name.clone())
            .and_modify(|rank| *rank = (*rank).min(entry.rank))
            .or_insert(entry.rank);
    }

    let mut kept: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| min_rank.get(&entry.name) == Some(&entry.rank))
        .collect();

    kept.sort_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.path.cmp(&b.path))
    });
    // Survivors of one name share a rank, so they are adjacent now
    kept.dedup_by(|later, first| later.name == first.name);

    kept
}
