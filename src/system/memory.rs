use std::collections::HashMap;

use serde::Serialize;
use sysinfo::{Pid, System};
use thiserror::Error;

use super::platform::{self, MemoryRead};

#[derive(Clone, Copy, Debug, Serialize)]
pub struct ProcessMemory {
    pub pid: u32,
    /// Total MB for the process (plus living descendants when
    /// requested), -1 when the process is not running.
    pub memory_mb: f64,
}

#[derive(Debug, Error)]
pub enum ProcessStatsError {
    #[error("access denied to process {0}")]
    AccessDenied(u32),
}

/// Memory accounting tiers from most exclusive to coarsest. USS counts
/// only pages unshared with other processes, PSS splits shared pages
/// proportionally, RSS counts every resident page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryTier {
    Uss,
    Pss,
    Rss,
}

/// Attempt order: most accurate first, falling through on denied or
/// unsupported reads.
pub const TIER_ORDER: [MemoryTier; 3] = [MemoryTier::Uss, MemoryTier::Pss, MemoryTier::Rss];

/// Outcome of the full tier chain for one process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolved {
    Bytes(u64),
    /// Every reachable tier was permission-denied.
    Denied,
    /// The process exited before it could be measured.
    Gone,
}

/// Walk tier attempts in order; the first tier that yields a value
/// wins. Denied tiers are skipped but remembered so an all-denied
/// chain is distinguishable from a vanished process.
pub fn resolve_tiers(attempts: impl IntoIterator<Item = MemoryRead>) -> Resolved {
    let mut denied = false;
    for attempt in attempts {
        match attempt {
            MemoryRead::Bytes(bytes) => return Resolved::Bytes(bytes),
            MemoryRead::Gone => return Resolved::Gone,
            MemoryRead::Denied => denied = true,
            MemoryRead::Unsupported => {}
        }
    }
    if denied { Resolved::Denied } else { Resolved::Gone }
}

fn read_tier(sys: &System, tier: MemoryTier, pid: u32) -> MemoryRead {
    match tier {
        MemoryTier::Uss => platform::process_memory_uss(pid),
        MemoryTier::Pss => platform::process_memory_pss(pid),
        MemoryTier::Rss => match sys.process(Pid::from_u32(pid)) {
            Some(process) => MemoryRead::Bytes(process.memory()),
            None => MemoryRead::Gone,
        },
    }
}

/// Best available memory figure for one process via the tier chain.
pub fn process_memory_bytes(sys: &System, pid: u32) -> Resolved {
    resolve_tiers(TIER_ORDER.iter().map(|&tier| read_tier(sys, tier, pid)))
}

/// All transitive descendants of `pid` in the refreshed process table.
/// Point-in-time: processes spawned or exited after the refresh are
/// simply absent or skipped at measurement.
pub fn descendants(sys: &System, pid: u32) -> Vec<u32> {
    let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
    for (child_pid, process) in sys.processes() {
        if let Some(parent) = process.parent() {
            children
                .entry(parent.as_u32())
                .or_default()
                .push(child_pid.as_u32());
        }
    }

    let mut result = Vec::new();
    let mut stack = vec![pid];
    while let Some(current) = stack.pop() {
        if let Some(direct) = children.get(&current) {
            for &child in direct {
                result.push(child);
                stack.push(child);
            }
        }
    }
    result.sort_unstable();
    result
}
