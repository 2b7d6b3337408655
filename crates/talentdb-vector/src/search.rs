use std::cmp::Ordering;

use talentdb_core::types::Metric;

/// Higher is better for both metrics: inner product, or negated L2 distance.
pub fn similarity(metric: Metric, a: &[f32], b: &[f32]) -> f32 {
    match metric {
        Metric::Ip => a.iter().zip(b).map(|(x, y)| x * y).sum(),
        Metric::L2 => -a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt(),
    }
}

/// Indices of the `k` best scores, descending. The sort is stable, so equal
/// scores keep storage order.
pub fn top_k(scores: Vec<f32>, k: usize) -> Vec<(usize, f32)> {
    let mut hits: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
    hits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    hits.truncate(k);
    hits
}

/// Exhaustive scan over the embedding matrix.
pub fn brute_force_search(matrix: &[Vec<f32>], query: &[f32], k: usize, metric: Metric) -> Vec<(usize, f32)> {
    let scores = matrix.iter().map(|row| similarity(metric, row, query)).collect();
    top_k(scores, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_keep_storage_order() {
        let hits = top_k(vec![0.5, 0.9, 0.5, 0.9], 4);
        let order: Vec<usize> = hits.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn l2_is_negated_distance() {
        let m = vec![vec![0.0, 0.0], vec![3.0, 4.0]];
        let hits = brute_force_search(&m, &[0.0, 0.0], 2, Metric::L2);
        assert_eq!(hits, vec![(0, 0.0), (1, -5.0)]);
    }
}
