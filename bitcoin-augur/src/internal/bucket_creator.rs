use crate::mempool_transaction::MempoolTransaction;
use std::collections::BTreeMap;

/// Maximum bucket index.
pub const BUCKET_MAX: i32 = 1000;

/// Number of buckets in the dense fee-rate histogram (`BUCKET_MAX + 1`).
pub const BUCKET_COUNT: usize = BUCKET_MAX as usize + 1;

/// Creates a bucket map from mempool transactions where the key is the bucket index
/// and the value is the sum of the weights at that fee rate, normalized to a one block duration.
///
/// This function groups transactions by their fee rate into logarithmic buckets,
/// providing more precision in the lower fee levels.
pub fn create_fee_rate_buckets(transactions: &[MempoolTransaction]) -> BTreeMap<i32, u64> {
    let mut buckets: BTreeMap<i32, u64> = BTreeMap::new();

    for tx in transactions {
        let fee_rate = tx.fee_rate();
        if fee_rate > 0.0 {
            let bucket_index = calculate_bucket_index(fee_rate);
            *buckets.entry(bucket_index).or_insert(0) += tx.weight;
        }
    }

    buckets
}

/// Calculates bucket index using logarithms, providing more precision in the lower fee levels.
///
/// The formula is: min(round(ln(fee_rate) * 100), BUCKET_MAX)
///
/// Denser near the low end of the fee-rate range, where precision matters most.
/// Rounding is half-away-from-zero (`f64::round`); ties only occur for fee rates that are
/// exact powers of e^0.005, which never arise from real sat/vB inputs.
fn calculate_bucket_index(fee_rate: f64) -> i32 {
    if fee_rate <= 0.0 {
        return 0;
    }

    let index = (fee_rate.ln() * 100.0).round() as i32;
    index.min(BUCKET_MAX)
}

/// Converts a bucket index back to its representative fee rate in sat/vB.
///
/// Inverse of [`calculate_bucket_index`]: `exp(index / 100)`.
pub(crate) fn bucket_index_to_fee_rate(index: i32) -> f64 {
    (index as f64 / 100.0).exp()
}

/// Maximum fee rate representable by the bucket space (`exp(BUCKET_MAX / 100)`).
///
/// Used only as a filter threshold: estimates at or above this are reported as absent
/// rather than as an astronomically large, meaningless fee rate.
pub(crate) fn max_representable_fee_rate() -> f64 {
    bucket_index_to_fee_rate(BUCKET_MAX)
}
