use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;

use super::{MemoryRead, PlatformExtensions};

pub struct Platform;

/// First percentage in `pmset -g batt` output, e.g.
/// ` -InternalBattery-0 (id=4653155)\t87%; discharging; ...`
static PMSET_PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3})%").expect("percent pattern is valid"));

impl PlatformExtensions for Platform {
    fn process_memory_uss(_pid: u32) -> MemoryRead {
        // No per-process USS accounting without task_for_pid privileges.
        MemoryRead::Unsupported
    }

    fn process_memory_pss(_pid: u32) -> MemoryRead {
        MemoryRead::Unsupported
    }

    fn battery_percent() -> Option<f64> {
        let output = Command::new("pmset").args(["-g", "batt"]).output().ok()?;
        if !output.status.success() {
            return None;
        }
        parse_pmset_percent(&String::from_utf8_lossy(&output.stdout))
    }

    fn ping_count_flag() -> &'static str {
        "-c"
    }
}

fn parse_pmset_percent(output: &str) -> Option<f64> {
    let captures = PMSET_PERCENT.captures(output)?;
    captures.get(1)?.as_str().parse().ok()
}
