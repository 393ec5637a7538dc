use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::aggregate::{BucketCount, DerivedAggregate};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketPercent {
    pub label: String,
    pub percent: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PercentGroup {
    pub key: String,
    pub total: i64,
    pub percents: Vec<BucketPercent>,
}

/// Convert bucket counts into whole percentages that sum to exactly 100 (largest remainder).
///
/// Buckets are floored, then the residual is handed out one point at a time in order of raw
/// percentage, highest first. Equal raw values keep their input order. An empty or all-zero
/// input yields all zeros.
pub fn to_percentages(counts: &[BucketCount]) -> Vec<BucketPercent> {
    let total: i64 = counts.iter().map(|c| c.count.max(0)).sum();
    if total == 0 {
        return counts
            .iter()
            .map(|c| BucketPercent {
                label: c.label.clone(),
                percent: 0,
            })
            .collect();
    }

    let raw: Vec<f64> = counts
        .iter()
        .map(|c| c.count.max(0) as f64 * 100.0 / total as f64)
        .collect();
    // Integer floor avoids 29.999... style drift on exact shares.
    let mut floors: Vec<i64> = counts.iter().map(|c| c.count.max(0) * 100 / total).collect();
    let residual = 100 - floors.iter().sum::<i64>();

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| raw[b].partial_cmp(&raw[a]).unwrap_or(Ordering::Equal));

    for &idx in order.iter().take(residual.max(0) as usize) {
        floors[idx] += 1;
    }

    counts
        .iter()
        .zip(floors)
        .map(|(c, percent)| BucketPercent {
            label: c.label.clone(),
            percent,
        })
        .collect()
}

/// Apply `to_percentages` to every group of an aggregate, keeping group order.
pub fn aggregate_percentages(aggregate: &DerivedAggregate) -> Vec<PercentGroup> {
    aggregate
        .groups
        .iter()
        .map(|g| PercentGroup {
            key: g.key.clone(),
            total: g.total(),
            percents: to_percentages(&g.counts),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(items: &[(&str, i64)]) -> Vec<BucketCount> {
        items
            .iter()
            .map(|(label, count)| BucketCount {
                label: label.to_string(),
                count: *count,
            })
            .collect()
    }

    fn values(out: &[BucketPercent]) -> Vec<i64> {
        out.iter().map(|p| p.percent).collect()
    }

    #[test]
    fn three_way_tie_gives_residual_to_first_bucket() {
        let out = to_percentages(&counts(&[("Open", 1), ("In Progress", 1), ("Closed", 1)]));
        assert_eq!(values(&out), vec![34, 33, 33]);
    }

    #[test]
    fn exact_shares_need_no_residual() {
        let out = to_percentages(&counts(&[("a", 3), ("b", 7)]));
        assert_eq!(values(&out), vec![30, 70]);
    }

    #[test]
    fn residual_follows_raw_value_not_input_order() {
        // raw: 14.28, 28.57, 57.14 -> floors 14, 28, 57 (99); the largest raw bucket gets +1.
        let out = to_percentages(&counts(&[("a", 1), ("b", 2), ("c", 4)]));
        assert_eq!(values(&out), vec![14, 28, 58]);
    }

    #[test]
    fn zero_total_is_all_zero() {
        let out = to_percentages(&counts(&[("a", 0), ("b", 0)]));
        assert_eq!(values(&out), vec![0, 0]);
        assert!(to_percentages(&[]).is_empty());
    }
}
