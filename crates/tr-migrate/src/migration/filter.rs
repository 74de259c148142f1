use tr_core::{Entity, normalize};

use std::collections::{HashMap, HashSet};

/// Source entities whose normalised compare value is absent from `target`.
///
/// An entity without the compare field never matches, so a source entity
/// missing it is always selected.
pub fn filter_entities<E: Entity>(source: &[E], target: &[E], compare_field: &str) -> Vec<E> {
    let existing: HashSet<String> = target
        .iter()
        .filter_map(|entity| entity.compare_value(compare_field))
        .map(normalize)
        .collect();

    source
        .iter()
        .filter(|entity| match entity.compare_value(compare_field) {
            Some(value) => !existing.contains(&normalize(value)),
            None => true,
        })
        .cloned()
        .collect()
}

/// `(source_id, target_id)` for every source entity that already exists in
/// `target`. When several targets share a value the first one wins.
pub fn matched_pairs<E: Entity>(source: &[E], target: &[E], compare_field: &str) -> Vec<(i64, i64)> {
    let mut by_value: HashMap<String, i64> = HashMap::with_capacity(target.len());
    for entity in target {
        if let Some(value) = entity.compare_value(compare_field) {
            by_value.entry(normalize(value)).or_insert(entity.id());
        }
    }

    source
        .iter()
        .filter_map(|entity| {
            let value = entity.compare_value(compare_field)?;
            by_value
                .get(&normalize(value))
                .map(|target_id| (entity.id(), *target_id))
        })
        .collect()
}
