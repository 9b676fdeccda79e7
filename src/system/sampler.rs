use std::path::PathBuf;

use sysinfo::{Components, Disks, Networks, Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use super::memory::{self, ProcessMemory, ProcessStatsError, Resolved};
use super::platform;
use super::snapshot::{IoBaseline, SystemSnapshot, rate_mbs};
use crate::format::{bytes_to_gb, bytes_to_mb, round1, round2};

/// Sensor groups that name the CPU package sensor, in resolution
/// order: x86 desktop/server naming first, then ARM/embedded. The
/// first group with any sensor present wins; groups are never
/// averaged together.
const CPU_SENSOR_GROUPS: [&str; 2] = ["coretemp", "cpu_thermal"];

/// Stateful sampler owning the sysinfo handles and the disk I/O
/// baseline. One instance exists process-wide, behind the server lock;
/// the baseline read-then-replace in `system_snapshot` relies on that
/// exclusivity.
pub struct Sampler {
    sys: System,
    disks: Disks,
    networks: Networks,
    components: Components,
    home_dir: Option<PathBuf>,
    baseline: IoBaseline,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        let components = Components::new_with_refreshed_list();

        let (read_bytes, write_bytes) = total_disk_io(&disks);
        Sampler {
            sys,
            disks,
            networks,
            components,
            home_dir: dirs::home_dir(),
            baseline: IoBaseline::new(read_bytes, write_bytes),
        }
    }

    /// Reads all host counters and derives per-interval rates against
    /// the stored baseline, then replaces the baseline with the values
    /// just read. The first call after construction averages over the
    /// startup-to-call interval.
    pub fn system_snapshot(&mut self) -> SystemSnapshot {
        self.sys.refresh_memory();
        self.sys.refresh_cpu_all();
        self.disks.refresh(true);
        self.networks.refresh(true);
        self.components.refresh(true);

        let ram_total = self.sys.total_memory();
        let ram_used = self.sys.used_memory();
        let swap_total = self.sys.total_swap();
        let swap_used = self.sys.used_swap();

        let (disk_used_gb, disk_percent) = self.home_disk_usage();

        let (read_bytes, write_bytes) = total_disk_io(&self.disks);
        let elapsed = self.baseline.taken_at.elapsed().as_secs_f64();
        let disk_read_mbs = rate_mbs(self.baseline.read_bytes, read_bytes, elapsed);
        let disk_write_mbs = rate_mbs(self.baseline.write_bytes, write_bytes, elapsed);
        self.baseline = IoBaseline::new(read_bytes, write_bytes);

        let (net_bytes_sent, net_bytes_recv) = self.net_totals();

        SystemSnapshot {
            ram_used_mb: bytes_to_mb(ram_used),
            ram_percent: percent(ram_used, ram_total),
            swap_percent: percent(swap_used, swap_total),
            disk_used_gb,
            disk_percent,
            disk_read_mbs,
            disk_write_mbs,
            cpu_percent: self.sys.global_cpu_usage() as f64,
            cpu_temp_c: self
                .cpu_temperature()
                .map(|t| round1(t as f64))
                .unwrap_or(-1.0),
            cpu_freq_mhz: self.cpu_frequency_mhz(),
            battery_percent: platform::battery_percent().unwrap_or(-1.0),
            net_bytes_sent,
            net_bytes_recv,
        }
    }

    /// Memory for `pid`, optionally including all living descendants.
    /// A pid that is not running yields `memory_mb = -1`; denial on
    /// the target pid itself is the one error outcome.
    pub fn process_memory(
        &mut self,
        pid: u32,
        include_children: bool,
    ) -> Result<ProcessMemory, ProcessStatsError> {
        let target = Pid::from_u32(pid);
        let to_update = if include_children {
            ProcessesToUpdate::All
        } else {
            ProcessesToUpdate::Some(&[target])
        };
        self.sys.refresh_processes_specifics(
            to_update,
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );

        if self.sys.process(target).is_none() {
            return Ok(ProcessMemory {
                pid,
                memory_mb: -1.0,
            });
        }

        let mut total_bytes = match memory::process_memory_bytes(&self.sys, pid) {
            Resolved::Bytes(bytes) => bytes,
            Resolved::Denied => return Err(ProcessStatsError::AccessDenied(pid)),
            Resolved::Gone => {
                return Ok(ProcessMemory {
                    pid,
                    memory_mb: -1.0,
                });
            }
        };

        if include_children {
            for child in memory::descendants(&self.sys, pid) {
                match memory::process_memory_bytes(&self.sys, child) {
                    Resolved::Bytes(bytes) => total_bytes += bytes,
                    // A child that exited or is unreadable contributes
                    // nothing; the query still succeeds.
                    Resolved::Denied | Resolved::Gone => {}
                }
            }
        }

        Ok(ProcessMemory {
            pid,
            memory_mb: bytes_to_mb(total_bytes),
        })
    }

    /// Usage of the disk holding the user's home directory: the
    /// partition the user actually cares about on split-partition
    /// systems, not the root filesystem.
    fn home_disk_usage(&self) -> (f64, f64) {
        let Some(home) = self.home_dir.as_deref() else {
            tracing::warn!("home directory unknown, reporting zero disk usage");
            return (0.0, 0.0);
        };
        let disk = self
            .disks
            .list()
            .iter()
            .filter(|disk| home.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len());
        match disk {
            Some(disk) => {
                let total = disk.total_space();
                let used = total.saturating_sub(disk.available_space());
                (bytes_to_gb(used), percent(used, total))
            }
            None => {
                tracing::warn!(home = %home.display(), "no mounted disk covers the home directory");
                (0.0, 0.0)
            }
        }
    }

    fn cpu_temperature(&self) -> Option<f32> {
        resolve_cpu_temperature(self.components.iter().map(|c| (c.label(), c.temperature())))
    }

    fn cpu_frequency_mhz(&self) -> f64 {
        // Single aggregate figure (first core); per-core variation on
        // heterogeneous systems is deliberately ignored.
        match self.sys.cpus().first().map(|cpu| cpu.frequency()) {
            Some(mhz) if mhz > 0 => round2(mhz as f64),
            _ => -1.0,
        }
    }

    fn net_totals(&self) -> (u64, u64) {
        let mut sent = 0u64;
        let mut recv = 0u64;
        for (_, data) in self.networks.iter() {
            sent = sent.saturating_add(data.total_transmitted());
            recv = recv.saturating_add(data.total_received());
        }
        (sent, recv)
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 / total as f64 * 100.0
}

fn total_disk_io(disks: &Disks) -> (u64, u64) {
    let mut read = 0u64;
    let mut write = 0u64;
    for disk in disks.list() {
        let usage = disk.usage();
        read = read.saturating_add(usage.total_read_bytes);
        write = write.saturating_add(usage.total_written_bytes);
    }
    (read, write)
}

/// Entry 0 of the first sensor group present, in `CPU_SENSOR_GROUPS`
/// order; `None` when no group matches or the chosen entry reports no
/// reading.
fn resolve_cpu_temperature<'a>(
    sensors: impl Iterator<Item = (&'a str, Option<f32>)> + Clone,
) -> Option<f32> {
    CPU_SENSOR_GROUPS
        .iter()
        .find_map(|group| sensors.clone().find(|(label, _)| label.starts_with(group)))
        .and_then(|(_, temperature)| temperature)
}
