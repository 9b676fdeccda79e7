use windows_sys::Win32::System::Power::{GetSystemPowerStatus, SYSTEM_POWER_STATUS};

use super::{MemoryRead, PlatformExtensions};

pub struct Platform;

// SYSTEM_POWER_STATUS markers: BatteryFlag bit for "no system
// battery", BatteryLifePercent value for "unknown".
const NO_SYSTEM_BATTERY: u8 = 128;
const PERCENT_UNKNOWN: u8 = 255;

impl PlatformExtensions for Platform {
    fn process_memory_uss(_pid: u32) -> MemoryRead {
        MemoryRead::Unsupported
    }

    fn process_memory_pss(_pid: u32) -> MemoryRead {
        MemoryRead::Unsupported
    }

    fn battery_percent() -> Option<f64> {
        unsafe {
            let mut status = std::mem::zeroed::<SYSTEM_POWER_STATUS>();
            if GetSystemPowerStatus(&mut status) == 0 {
                return None;
            }
            battery_from_status(status.BatteryFlag, status.BatteryLifePercent)
        }
    }

    fn ping_count_flag() -> &'static str {
        "-n"
    }
}

fn battery_from_status(flag: u8, percent: u8) -> Option<f64> {
    if flag & NO_SYSTEM_BATTERY != 0 || percent == PERCENT_UNKNOWN {
        return None;
    }
    Some(percent as f64)
}
