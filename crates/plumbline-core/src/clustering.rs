//! Tolerance-based 1-D clustering.
//!
//! Groups are formed by chaining: two consecutive sorted values share a group
//! when their difference is at most the tolerance, so a group may span more
//! than `tolerance` overall. Used for edge snapping, line detection, row
//! detection and text-strategy edge inference.

use std::collections::HashMap;

use ordered_float::OrderedFloat;

/// Sort `values` and split them wherever the gap to the previous value exceeds `tolerance`.
pub fn cluster_list(values: &[f64], tolerance: f64) -> Vec<Vec<f64>> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut groups: Vec<Vec<f64>> = Vec::new();
    let mut last: Option<f64> = None;
    for x in sorted {
        match (last, groups.last_mut()) {
            (Some(prev), Some(group)) if x <= prev + tolerance => group.push(x),
            _ => groups.push(vec![x]),
        }
        last = Some(x);
    }
    groups
}

/// Map each distinct value to the index of its cluster (clusters numbered in ascending order).
pub fn make_cluster_dict(values: &[f64], tolerance: f64) -> HashMap<OrderedFloat<f64>, usize> {
    let mut unique = values.to_vec();
    unique.sort_by(f64::total_cmp);
    unique.dedup();

    let mut dict = HashMap::with_capacity(unique.len());
    for (idx, cluster) in cluster_list(&unique, tolerance).into_iter().enumerate() {
        for value in cluster {
            dict.insert(OrderedFloat(value), idx);
        }
    }
    dict
}

/// Cluster items by `key_fn`.
///
/// With `preserve_order`, items keep their input order and each maximal run of
/// items from the same cluster becomes a group. Otherwise groups come out in
/// ascending key order, with input order kept inside each group.
pub fn cluster_objects<T, F>(items: &[T], key_fn: F, tolerance: f64, preserve_order: bool) -> Vec<Vec<T>>
where
    T: Clone,
    F: Fn(&T) -> f64,
{
    let keys: Vec<f64> = items.iter().map(&key_fn).collect();
    let dict = make_cluster_dict(&keys, tolerance);

    let mut tagged: Vec<(usize, &T)> = items
        .iter()
        .zip(&keys)
        .map(|(item, key)| (dict.get(&OrderedFloat(*key)).copied().unwrap_or(0), item))
        .collect();
    if !preserve_order {
        // stable: ties keep input order
        tagged.sort_by_key(|(idx, _)| *idx);
    }

    let mut groups: Vec<Vec<T>> = Vec::new();
    let mut last_idx: Option<usize> = None;
    for (idx, item) in tagged {
        match groups.last_mut() {
            Some(group) if last_idx == Some(idx) => group.push(item.clone()),
            _ => groups.push(vec![item.clone()]),
        }
        last_idx = Some(idx);
    }
    groups
}
