//! Tolerance-based clustering of alignment values.

use rustc_hash::FxHashSet;

use crate::geometry::cmp_f64;

/// Cluster a list of f64 values; a value within `tolerance` of the previous
/// one joins its cluster.
pub fn cluster_list(mut xs: Vec<f64>, tolerance: f64) -> Vec<Vec<f64>> {
    xs.sort_by(|a, b| cmp_f64(*a, *b));
    let mut groups: Vec<Vec<f64>> = Vec::new();
    let mut last = f64::NEG_INFINITY;
    for x in xs {
        match groups.last_mut() {
            Some(current) if x <= last + tolerance => current.push(x),
            _ => groups.push(vec![x]),
        }
        last = x;
    }
    groups
}

/// Cluster means, one per cluster, in increasing order.
pub fn cluster_centers(xs: Vec<f64>, tolerance: f64) -> Vec<f64> {
    cluster_list(xs, tolerance)
        .into_iter()
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect()
}

/// Runs of ids aligned on `key`.
///
/// Ids are sorted by `key`; a run grows while the next value lies within
/// `tol(anchor)` of the run's first element. Only runs of at least
/// `min_len` ids are kept.
pub fn anchored_runs<K, T>(ids: &[usize], key: K, tol: T, min_len: usize) -> Vec<Vec<usize>>
where
    K: Fn(usize) -> f64,
    T: Fn(usize) -> f64,
{
    let mut sorted = ids.to_vec();
    sorted.sort_by(|&a, &b| cmp_f64(key(a), key(b)).then(a.cmp(&b)));

    let mut runs = Vec::new();
    let mut start = 0;
    while start < sorted.len() {
        let anchor = sorted[start];
        let limit = key(anchor) + tol(anchor);
        let end = sorted[start..]
            .iter()
            .position(|&id| key(id) > limit)
            .map_or(sorted.len(), |n| start + n);
        if end - start >= min_len {
            runs.push(sorted[start..end].to_vec());
        }
        start = end;
    }
    runs
}

/// Drops runs that hold the same set of ids as an earlier run.
pub fn dedup_runs(runs: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    let mut seen: FxHashSet<Vec<usize>> = FxHashSet::default();
    runs.into_iter()
        .filter(|run| {
            let mut key = run.clone();
            key.sort_unstable();
            seen.insert(key)
        })
        .collect()
}
