/// Outcome of reading one per-process memory accounting tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryRead {
    Bytes(u64),
    /// Process disappeared between enumeration and read.
    Gone,
    /// Resource exists but the caller may not read it.
    Denied,
    /// This tier is not available on the platform/kernel.
    Unsupported,
}

pub trait PlatformExtensions {
    /// Unique set size: memory not shared with any other process.
    fn process_memory_uss(pid: u32) -> MemoryRead;
    /// Proportional set size: shared pages divided among sharers.
    fn process_memory_pss(pid: u32) -> MemoryRead;
    /// Battery charge 0-100, `None` when no battery is present or the
    /// platform exposes no battery sensor.
    fn battery_percent() -> Option<f64>;
    /// Probe-count flag for the system `ping` binary.
    fn ping_count_flag() -> &'static str;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn process_memory_uss(pid: u32) -> MemoryRead {
    platform_impl::Platform::process_memory_uss(pid)
}

pub fn process_memory_pss(pid: u32) -> MemoryRead {
    platform_impl::Platform::process_memory_pss(pid)
}

pub fn battery_percent() -> Option<f64> {
    platform_impl::Platform::battery_percent()
}

pub fn ping_count_flag() -> &'static str {
    platform_impl::Platform::ping_count_flag()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_do_not_panic_for_current_pid() {
        let pid = std::process::id();
        let _ = process_memory_uss(pid);
        let _ = process_memory_pss(pid);
        let _ = battery_percent();
    }

    #[test]
    fn count_flag_matches_target_family() {
        let flag = ping_count_flag();
        if cfg!(target_os = "windows") {
            assert_eq!(flag, "-n");
        } else {
            assert_eq!(flag, "-c");
        }
    }
}
