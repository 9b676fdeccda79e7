use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use tokio::process::Command;

use super::platform;
use crate::format::round2;

/// Sentinel for "host unreachable / probe failed"; never an error.
pub const UNREACHABLE: f64 = -1.0;

#[derive(Clone, Debug, Serialize)]
pub struct PingResult {
    pub host: String,
    pub latency_ms: f64,
}

/// Matches `time=12.3 ms` and the `time<1ms` form some platforms emit
/// for sub-millisecond round trips.
static LATENCY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"time[=<]([\d.]+)\s*ms").expect("latency pattern is valid"));

/// One-probe ping via the OS `ping` binary. The count flag differs
/// between Windows and POSIX systems; it is resolved once at
/// construction through the platform layer.
#[derive(Clone, Copy, Debug)]
pub struct Pinger {
    count_flag: &'static str,
    timeout: Duration,
}

impl Pinger {
    pub fn new(timeout: Duration) -> Self {
        Self {
            count_flag: platform::ping_count_flag(),
            timeout,
        }
    }

    /// Probes `host` once. Launch failure, nonzero exit, unparseable
    /// output and timeout all collapse to the -1 sentinel; the child is
    /// killed if the timeout expires.
    pub async fn probe(&self, host: &str) -> PingResult {
        let latency_ms = self.probe_latency(host).await.unwrap_or(UNREACHABLE);
        if latency_ms < 0.0 {
            tracing::debug!(host, "ping probe failed or timed out");
        }
        PingResult {
            host: host.to_string(),
            latency_ms,
        }
    }

    async fn probe_latency(&self, host: &str) -> Option<f64> {
        let child = Command::new("ping")
            .arg(self.count_flag)
            .arg("1")
            .arg(host)
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(self.timeout, child).await.ok()?.ok()?;
        if !output.status.success() {
            return None;
        }
        parse_latency_ms(&String::from_utf8_lossy(&output.stdout))
    }
}

pub fn parse_latency_ms(output: &str) -> Option<f64> {
    let captures = LATENCY_PATTERN.captures(output)?;
    let value: f64 = captures.get(1)?.as_str().parse().ok()?;
    Some(round2(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_posix_ping_output() {
        let output = "64 bytes from 142.250.74.78: icmp_seq=1 ttl=115 time=12.345 ms";
        assert_eq!(parse_latency_ms(output), Some(12.35));
    }

    #[test]
    fn parses_windows_sub_millisecond_form() {
        let output = "Reply from 192.168.1.1: bytes=32 time<1ms TTL=64";
        assert_eq!(parse_latency_ms(output), Some(1.0));
    }

    #[test]
    fn garbage_output_yields_none() {
        assert_eq!(parse_latency_ms("Destination Host Unreachable"), None);
        assert_eq!(parse_latency_ms(""), None);
    }

    #[tokio::test]
    async fn unroutable_host_reports_sentinel_within_timeout() {
        let pinger = Pinger::new(Duration::from_millis(1500));
        let started = std::time::Instant::now();
        let result = pinger.probe("host.invalid").await;
        assert_eq!(result.host, "host.invalid");
        assert_eq!(result.latency_ms, UNREACHABLE);
        // Bounded wait: timeout plus modest process-teardown slack.
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
