use std::time::Instant;

use serde::Serialize;

use crate::format::{MB, round2};

/// Point-in-time view of host resources, serialized flat for the
/// graphing front end. Byte figures are MB/GB with two decimals;
/// `cpu_temp_c`, `cpu_freq_mhz` and `battery_percent` use -1 when the
/// metric is unavailable on this platform. The network counters are
/// cumulative since boot, not deltas.
#[derive(Clone, Debug, Serialize)]
pub struct SystemSnapshot {
    pub ram_used_mb: f64,
    pub ram_percent: f64,
    pub swap_percent: f64,
    pub disk_used_gb: f64,
    pub disk_percent: f64,
    pub disk_read_mbs: f64,
    pub disk_write_mbs: f64,
    pub cpu_percent: f64,
    pub cpu_temp_c: f64,
    pub cpu_freq_mhz: f64,
    pub battery_percent: f64,
    pub net_bytes_sent: u64,
    pub net_bytes_recv: u64,
}

/// Last-observed cumulative disk I/O counters, the start point for the
/// next throughput computation. Replaced wholesale after every snapshot
/// so each call's start is the previous call's end.
#[derive(Clone, Copy, Debug)]
pub struct IoBaseline {
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub taken_at: Instant,
}

impl IoBaseline {
    pub fn new(read_bytes: u64, write_bytes: u64) -> Self {
        Self {
            read_bytes,
            write_bytes,
            taken_at: Instant::now(),
        }
    }
}

/// Average throughput in MB/s over the elapsed interval, rounded to two
/// decimals. Zero when no time elapsed (rapid repeated calls) or the
/// counter went backwards (counter reset).
pub fn rate_mbs(baseline_bytes: u64, current_bytes: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    let delta = current_bytes.saturating_sub(baseline_bytes);
    round2(delta as f64 / elapsed_secs / MB as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_matches_delta_over_interval() {
        // 10 MB over 2 seconds -> 5 MB/s
        assert_eq!(rate_mbs(0, 10 * MB, 2.0), 5.0);
        // 1 MB over 4 seconds -> 0.25 MB/s
        assert_eq!(rate_mbs(MB, 2 * MB, 4.0), 0.25);
    }

    #[test]
    fn zero_elapsed_reports_zero() {
        assert_eq!(rate_mbs(0, 10 * MB, 0.0), 0.0);
        assert_eq!(rate_mbs(0, 10 * MB, -1.0), 0.0);
    }

    #[test]
    fn counter_reset_reports_zero() {
        assert_eq!(rate_mbs(10 * MB, MB, 1.0), 0.0);
    }

    #[test]
    fn equal_counters_report_zero() {
        assert_eq!(rate_mbs(42, 42, 1.0), 0.0);
    }
}
