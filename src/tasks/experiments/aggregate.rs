use crate::tasks::experiments::{
    records::{
        NoiseLevel, PerformanceRecord, ReliabilityRecord, ScalabilityRecord, TransactionRecord,
    },
    stats::{self, Summary},
};
use std::collections::BTreeMap;

/// Decimal places kept for timing, gas and scalability statistics.
pub const DISPLAY_DECIMALS: u32 = 2;
/// Decimal places kept for success ratios (before scaling to a percentage).
pub const RATIO_DECIMALS: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformanceStats {
    pub proof_gen_time: Summary,
    pub verify_time: Summary,
    pub gas_used: Summary,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReliabilityStats {
    pub success: Summary,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransactionStats {
    pub transaction_time: Summary,
    pub encryption_time: Summary,
    pub gas_used: Summary,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalabilityStats {
    pub total_time: Summary,
    pub success_rate: Summary,
    pub average_response_time: Summary,
}

/// `(BatchSize, ConcurrentDevices)`.
pub type LoadKey = (u32, u32);

pub fn performance_stats(rows: &[PerformanceRecord]) -> BTreeMap<NoiseLevel, PerformanceStats> {
    stats::group_rows(rows, |r| r.noise_level)
        .into_iter()
        .map(|(noise, group)| {
            let group_stats = PerformanceStats {
                proof_gen_time: stats::summarize(&group, |r| r.proof_gen_time)
                    .rounded(DISPLAY_DECIMALS),
                verify_time: stats::summarize(&group, |r| r.verify_time).rounded(DISPLAY_DECIMALS),
                gas_used: stats::summarize(&group, |r| r.gas_used).rounded(DISPLAY_DECIMALS),
            };
            (noise, group_stats)
        })
        .collect()
}

pub fn reliability_stats(rows: &[ReliabilityRecord]) -> BTreeMap<NoiseLevel, ReliabilityStats> {
    stats::group_rows(rows, |r| r.noise_level)
        .into_iter()
        .map(|(noise, group)| {
            let group_stats = ReliabilityStats {
                success: stats::summarize(&group, |r| r.success).rounded(RATIO_DECIMALS),
            };
            (noise, group_stats)
        })
        .collect()
}

pub fn transaction_stats(rows: &[TransactionRecord]) -> BTreeMap<NoiseLevel, TransactionStats> {
    stats::group_rows(rows, |r| r.noise_level)
        .into_iter()
        .map(|(noise, group)| {
            let group_stats = TransactionStats {
                transaction_time: stats::summarize(&group, |r| r.transaction_time)
                    .rounded(DISPLAY_DECIMALS),
                encryption_time: stats::summarize(&group, |r| r.encryption_time)
                    .rounded(DISPLAY_DECIMALS),
                gas_used: stats::summarize(&group, |r| r.gas_used).rounded(DISPLAY_DECIMALS),
            };
            (noise, group_stats)
        })
        .collect()
}

pub fn scalability_stats(rows: &[ScalabilityRecord]) -> BTreeMap<LoadKey, ScalabilityStats> {
    stats::group_rows(rows, |r| (r.batch_size, r.concurrent_devices))
        .into_iter()
        .map(|(key, group)| {
            let group_stats = ScalabilityStats {
                total_time: stats::summarize(&group, |r| r.total_time).rounded(DISPLAY_DECIMALS),
                success_rate: stats::summarize(&group, |r| r.success_rate)
                    .rounded(DISPLAY_DECIMALS),
                average_response_time: stats::summarize(&group, |r| r.average_response_time)
                    .rounded(DISPLAY_DECIMALS),
            };
            (key, group_stats)
        })
        .collect()
}

/// Authentication success rate (in %) per noise level.
pub fn success_rates(rows: &[ReliabilityRecord]) -> BTreeMap<NoiseLevel, f64> {
    stats::summarize_by(rows, |r| r.noise_level, |r| r.success)
        .into_iter()
        .map(|(noise, summary)| (noise, summary.mean * 100.0))
        .collect()
}

/// Aggregated batch-processing figures for one `(BatchSize,
/// ConcurrentDevices)` group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EfficiencyPoint {
    pub batch_size: u32,
    pub concurrent_devices: u32,
    pub mean_total_time: f64,
    pub successful_proofs: u64,
    pub failed_proofs: u64,
    /// Successful proofs per second.
    pub efficiency: f64,
}

pub fn batch_efficiency(rows: &[ScalabilityRecord]) -> Vec<EfficiencyPoint> {
    stats::group_rows(rows, |r| (r.batch_size, r.concurrent_devices))
        .into_iter()
        .map(|((batch_size, concurrent_devices), group)| {
            let mean_total_time = stats::summarize(&group, |r| r.total_time).mean;
            let successful_proofs = group.iter().map(|r| r.successful_proofs).sum();
            let failed_proofs = group.iter().map(|r| r.failed_proofs).sum();

            EfficiencyPoint {
                batch_size,
                concurrent_devices,
                mean_total_time,
                successful_proofs,
                failed_proofs,
                efficiency: stats::efficiency(successful_proofs, mean_total_time),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::experiments::records::parse_timestamp;
    use chrono::{DateTime, Utc};

    fn ts() -> DateTime<Utc> {
        parse_timestamp("2024-05-01T10:00:00Z").unwrap()
    }

    fn perf(noise: f64, proof_gen_time: f64) -> PerformanceRecord {
        PerformanceRecord {
            noise_level: NoiseLevel(noise),
            proof_gen_time,
            verify_time: proof_gen_time / 10.0,
            gas_used: 21000.0,
            timestamp: ts(),
        }
    }

    fn scale(batch_size: u32, devices: u32, total_time: f64, ok: u64) -> ScalabilityRecord {
        ScalabilityRecord {
            batch_size,
            concurrent_devices: devices,
            total_time,
            success_rate: 100.0,
            average_response_time: total_time / devices as f64,
            successful_proofs: ok,
            failed_proofs: devices as u64 - ok,
            timestamp: ts(),
        }
    }

    #[test]
    fn test_performance_stats() {
        let rows = vec![perf(0.1, 10.0), perf(0.1, 20.0), perf(0.2, 30.0)];
        let stats = performance_stats(&rows);

        assert_eq!(stats.len(), 2);
        let low = &stats[&NoiseLevel(0.1)];
        assert_eq!(low.proof_gen_time.mean, 15.0);
        assert_eq!(low.proof_gen_time.std, 7.07);
        assert_eq!(low.proof_gen_time.min, 10.0);
        assert_eq!(low.proof_gen_time.max, 20.0);
        assert_eq!(low.gas_used.std, 0.0);

        // Single observation: undefined spread, but no panic.
        let high = &stats[&NoiseLevel(0.2)];
        assert_eq!(high.proof_gen_time.count, 1);
        assert!(high.proof_gen_time.std.is_nan());
    }

    #[test]
    fn test_reliability_and_success_rates() {
        let rows: Vec<ReliabilityRecord> = [(0.1, 1.0), (0.1, 1.0), (0.1, 0.0), (0.3, 0.0)]
            .iter()
            .map(|(noise, success)| ReliabilityRecord {
                noise_level: NoiseLevel(*noise),
                success: *success,
                timestamp: ts(),
            })
            .collect();

        let stats = reliability_stats(&rows);
        assert_eq!(stats[&NoiseLevel(0.1)].success.count, 3);
        assert_eq!(stats[&NoiseLevel(0.1)].success.mean, 0.6667);
        assert_eq!(stats[&NoiseLevel(0.1)].success.std, 0.5774);

        let rates = success_rates(&rows);
        assert!((rates[&NoiseLevel(0.1)] - 66.666_666).abs() < 1e-3);
        assert_eq!(rates[&NoiseLevel(0.3)], 0.0);
    }

    #[test]
    fn test_scalability_stats_groups_by_batch_and_devices() {
        let rows = vec![
            scale(10, 100, 2000.0, 90),
            scale(10, 100, 3000.0, 95),
            scale(5, 100, 1000.0, 100),
        ];
        let stats = scalability_stats(&rows);

        let keys: Vec<LoadKey> = stats.keys().copied().collect();
        assert_eq!(keys, vec![(5, 100), (10, 100)]);
        assert_eq!(stats[&(10, 100)].total_time.mean, 2500.0);
        assert_eq!(stats[&(10, 100)].total_time.std, 707.11);
        assert!(stats[&(5, 100)].total_time.std.is_nan());
    }

    #[test]
    fn test_batch_efficiency() {
        let rows = vec![scale(10, 100, 2000.0, 90), scale(10, 100, 3000.0, 95)];
        let points = batch_efficiency(&rows);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].successful_proofs, 185);
        assert_eq!(points[0].failed_proofs, 15);
        assert_eq!(points[0].mean_total_time, 2500.0);
        assert_eq!(points[0].efficiency, 74.0);
    }
}
