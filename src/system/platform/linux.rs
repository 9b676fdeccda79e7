use std::io::ErrorKind;
use std::path::Path;

use super::{MemoryRead, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn process_memory_uss(pid: u32) -> MemoryRead {
        read_smaps_rollup(pid, |rollup| {
            // USS = private pages only (not shared with anyone).
            let clean = rollup.field_kb("Private_Clean:")?;
            let dirty = rollup.field_kb("Private_Dirty:")?;
            let hugetlb = rollup.field_kb("Private_Hugetlb:").unwrap_or(0);
            Some((clean + dirty + hugetlb) * 1024)
        })
    }

    fn process_memory_pss(pid: u32) -> MemoryRead {
        read_smaps_rollup(pid, |rollup| rollup.field_kb("Pss:").map(|kb| kb * 1024))
    }

    fn battery_percent() -> Option<f64> {
        let entries = std::fs::read_dir("/sys/class/power_supply").ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            let kind = std::fs::read_to_string(path.join("type")).unwrap_or_default();
            if kind.trim() != "Battery" {
                continue;
            }
            if let Ok(capacity) = std::fs::read_to_string(path.join("capacity"))
                && let Ok(percent) = capacity.trim().parse::<f64>()
            {
                return Some(percent);
            }
        }
        None
    }

    fn ping_count_flag() -> &'static str {
        "-c"
    }
}

struct SmapsRollup {
    contents: String,
}

impl SmapsRollup {
    fn field_kb(&self, name: &str) -> Option<u64> {
        // Lines look like "Private_Dirty:      1234 kB"
        self.contents
            .lines()
            .find_map(|line| line.strip_prefix(name))
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|value| value.parse().ok())
    }
}

fn read_smaps_rollup(pid: u32, extract: impl Fn(&SmapsRollup) -> Option<u64>) -> MemoryRead {
    let path = format!("/proc/{pid}/smaps_rollup");
    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            let rollup = SmapsRollup { contents };
            match extract(&rollup) {
                Some(bytes) => MemoryRead::Bytes(bytes),
                None => MemoryRead::Unsupported,
            }
        }
        Err(err) => match err.kind() {
            ErrorKind::PermissionDenied => MemoryRead::Denied,
            ErrorKind::NotFound => {
                // smaps_rollup needs Linux 4.14; if the process dir is
                // still there the file itself is missing.
                if Path::new(&format!("/proc/{pid}")).exists() {
                    MemoryRead::Unsupported
                } else {
                    MemoryRead::Gone
                }
            }
            _ => MemoryRead::Unsupported,
        },
    }
}
