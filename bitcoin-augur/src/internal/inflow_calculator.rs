use chrono::Duration;
use ndarray::Array1;

use crate::internal::{snapshot_array::SnapshotArray, BUCKET_COUNT, BUCKET_MAX};

/// Calculates transaction inflow rates for different fee rate buckets.
///
/// This is used to simulate new transactions entering the mempool
/// during the time period being estimated.
pub(crate) struct InflowCalculator;

impl InflowCalculator {
    /// Calculates inflow rates based on historical snapshots.
    ///
    /// # Arguments
    /// * `snapshots` - List of mempool snapshots as arrays
    /// * `timeframe` - Duration to consider for inflow calculation
    ///
    /// # Returns
    /// Array of inflow rates by fee rate bucket, normalized to 10 minutes
    pub fn calculate_inflows(snapshots: &[SnapshotArray], timeframe: Duration) -> Array1<f64> {
        if snapshots.is_empty() {
            return Array1::zeros(BUCKET_COUNT);
        }

        // Sort snapshots by timestamp
        let mut ordered_snapshots = snapshots.to_vec();
        ordered_snapshots.sort_by_key(|s| s.timestamp);

        let end_time = ordered_snapshots.last().unwrap().timestamp;
        let start_time = end_time - timeframe;

        // Filter snapshots within timeframe
        let relevant_snapshots: Vec<_> = ordered_snapshots
            .iter()
            .filter(|s| s.timestamp >= start_time && s.timestamp <= end_time)
            .collect();

        if relevant_snapshots.is_empty() {
            return Array1::zeros(BUCKET_COUNT);
        }

        let mut inflows = Array1::zeros(BUCKET_COUNT);

        // Group snapshots by block height
        let mut snapshots_by_block: std::collections::BTreeMap<u32, Vec<&SnapshotArray>> =
            std::collections::BTreeMap::new();

        for snapshot in &relevant_snapshots {
            snapshots_by_block
                .entry(snapshot.block_height)
                .or_default()
                .push(snapshot);
        }

        // Calculate total time span for normalization
        let mut total_time_span = Duration::zero();

        // For each block, calculate inflows by comparing first and last snapshot
        for (_, block_snapshots) in snapshots_by_block {
            if block_snapshots.len() < 2 {
                continue; // Need at least 2 snapshots to calculate delta
            }

            let first_snapshot = block_snapshots.first().unwrap();
            let last_snapshot = block_snapshots.last().unwrap();

            // Add the duration between first and last snapshot of this block
            let block_duration = last_snapshot.timestamp - first_snapshot.timestamp;
            total_time_span += block_duration;

            // Calculate positive differences (inflows) between buckets
            let delta = &last_snapshot.buckets - &first_snapshot.buckets;

            // Only keep positive values (inflows)
            for i in 0..delta.len() {
                if delta[i] > 0.0 {
                    inflows[i] += delta[i];
                }
            }
        }

        // Normalize inflows to 10 minutes
        if total_time_span.num_seconds() > 0 {
            let ten_minutes = Duration::minutes(10);
            let normalization_factor =
                ten_minutes.num_seconds() as f64 / total_time_span.num_seconds() as f64;
            inflows *= normalization_factor;
        }

        inflows
    }
}
