//! Row types for each results file. Column names follow the CSV headers
//! written by the benchmark harness (PascalCase).

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de};
use std::{cmp::Ordering, fmt};

/// Noise level injected during an experiment. Wraps an `f64` so that it can
/// be used as an (ordered) grouping key.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(transparent)]
pub struct NoiseLevel(pub f64);

impl PartialEq for NoiseLevel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NoiseLevel {}

impl PartialOrd for NoiseLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NoiseLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for NoiseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Integral levels keep one decimal so that `1` reads as `1.0`.
        if self.0.is_finite() && self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PerformanceRecord {
    pub noise_level: NoiseLevel,
    #[serde(deserialize_with = "deserialize_metric")]
    pub proof_gen_time: f64,
    #[serde(deserialize_with = "deserialize_metric")]
    pub verify_time: f64,
    #[serde(deserialize_with = "deserialize_metric")]
    pub gas_used: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReliabilityRecord {
    pub noise_level: NoiseLevel,
    /// Authentication outcome as `1.0` (success) or `0.0` (failure).
    #[serde(deserialize_with = "deserialize_flag")]
    pub success: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemoryRecord {
    /// Bytes.
    #[serde(deserialize_with = "deserialize_metric")]
    pub heap_used: f64,
    /// Bytes.
    #[serde(deserialize_with = "deserialize_metric")]
    pub heap_total: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionRecord {
    pub noise_level: NoiseLevel,
    #[serde(deserialize_with = "deserialize_metric")]
    pub transaction_time: f64,
    #[serde(deserialize_with = "deserialize_metric")]
    pub encryption_time: f64,
    #[serde(deserialize_with = "deserialize_metric")]
    pub gas_used: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScalabilityRecord {
    pub batch_size: u32,
    pub concurrent_devices: u32,
    /// Milliseconds.
    pub total_time: f64,
    /// Percentage in `[0, 100]`.
    pub success_rate: f64,
    pub average_response_time: f64,
    pub successful_proofs: u64,
    pub failed_proofs: u64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Parse a timestamp either in RFC 3339 format, or as a naive date-time that
/// we interpret as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Parse a boolean-like flag into `1.0` or `0.0`.
pub fn parse_flag(value: &str) -> Option<f64> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" => Some(1.0),
        "false" | "0" | "0.0" => Some(0.0),
        _ => None,
    }
}

/// Parse a measurement cell. An empty cell is a missing measurement and
/// reads as NaN.
pub fn parse_metric(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(f64::NAN);
    }
    value.parse().ok()
}

fn deserialize_metric<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_metric(&raw).ok_or_else(|| de::Error::custom(format!("invalid measurement: {raw}")))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("invalid success flag: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:00:00.000"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("True"), Some(1.0));
        assert_eq!(parse_flag("false"), Some(0.0));
        assert_eq!(parse_flag("1"), Some(1.0));
        assert_eq!(parse_flag("0.0"), Some(0.0));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_parse_metric() {
        assert_eq!(parse_metric(" 12.5 "), Some(12.5));
        assert!(parse_metric("").unwrap().is_nan());
        assert!(parse_metric("NaN").unwrap().is_nan());
        assert_eq!(parse_metric("fast"), None);
    }

    #[test]
    fn test_noise_level_ordering_and_display() {
        let mut levels = vec![NoiseLevel(0.3), NoiseLevel(0.0), NoiseLevel(0.15)];
        levels.sort();
        assert_eq!(
            levels.iter().map(|l| l.to_string()).collect::<Vec<_>>(),
            vec!["0.0", "0.15", "0.3"]
        );
        assert_eq!(NoiseLevel(1.0).to_string(), "1.0");
    }
}
