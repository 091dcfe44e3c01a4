//! Network / RAM / CPU / disk tuning value sets.
//!
//! The "off" sets are fixed OS-default values, not a recording of what was
//! configured before the "on" set was applied.

use crate::effect::Effect;
use crate::error::MutationError;
use crate::executor::CommandExecutor;
use sysinfo::{DiskKind, Disks};

const MEMORY_MANAGEMENT: &str =
    "HKLM\\SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Memory Management";
const PREFETCH_PARAMETERS: &str =
    "HKLM\\SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Memory Management\\PrefetchParameters";
const PRIORITY_CONTROL: &str = "HKLM\\SYSTEM\\CurrentControlSet\\Control\\PriorityControl";
const TCPIP_PARAMETERS: &str = "HKLM\\SYSTEM\\CurrentControlSet\\Services\\Tcpip\\Parameters";

// ═══════════════════════════════════════════════════════════════════════════════
// Network
// ═══════════════════════════════════════════════════════════════════════════════

pub fn network_on() -> Vec<Effect> {
    vec![
        Effect::netsh(&["int", "tcp", "set", "global", "autotuninglevel=normal"]),
        Effect::netsh(&["int", "tcp", "set", "global", "rss=enabled"]),
        Effect::netsh(&["int", "tcp", "set", "global", "ecncapability=enabled"]),
        Effect::netsh(&["int", "tcp", "set", "global", "timestamps=disabled"]),
        Effect::netsh(&["int", "tcp", "set", "heuristics", "disabled"]),
        Effect::dword(TCPIP_PARAMETERS, "DefaultTTL", 64),
        Effect::dword(TCPIP_PARAMETERS, "Tcp1323Opts", 1),
        Effect::program("ipconfig", &["/flushdns"]),
    ]
}

pub fn network_off() -> Vec<Effect> {
    vec![
        Effect::netsh(&["int", "tcp", "set", "global", "autotuninglevel=normal"]),
        Effect::netsh(&["int", "tcp", "set", "global", "rss=enabled"]),
        Effect::netsh(&["int", "tcp", "set", "global", "ecncapability=default"]),
        Effect::netsh(&["int", "tcp", "set", "global", "timestamps=default"]),
        Effect::netsh(&["int", "tcp", "set", "heuristics", "enabled"]),
        Effect::delete_value(TCPIP_PARAMETERS, "DefaultTTL"),
        Effect::delete_value(TCPIP_PARAMETERS, "Tcp1323Opts"),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════════
// RAM
// ═══════════════════════════════════════════════════════════════════════════════

pub fn ram_on() -> Vec<Effect> {
    vec![
        Effect::dword(MEMORY_MANAGEMENT, "DisablePagingExecutive", 1),
        Effect::dword(MEMORY_MANAGEMENT, "LargeSystemCache", 0),
        Effect::dword(MEMORY_MANAGEMENT, "ClearPageFileAtShutdown", 0),
        Effect::dword(PREFETCH_PARAMETERS, "EnablePrefetcher", 0),
        Effect::dword(PREFETCH_PARAMETERS, "EnableSuperfetch", 0),
    ]
}

pub fn ram_off() -> Vec<Effect> {
    vec![
        Effect::dword(MEMORY_MANAGEMENT, "DisablePagingExecutive", 0),
        Effect::dword(MEMORY_MANAGEMENT, "LargeSystemCache", 0),
        Effect::dword(PREFETCH_PARAMETERS, "EnablePrefetcher", 3),
        Effect::dword(PREFETCH_PARAMETERS, "EnableSuperfetch", 3),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════════
// CPU
// ═══════════════════════════════════════════════════════════════════════════════

fn processor_value(setting: &str, value: &str) -> Effect {
    Effect::powercfg(&[
        "/setacvalueindex",
        "SCHEME_CURRENT",
        "SUB_PROCESSOR",
        setting,
        value,
    ])
}

pub fn cpu_on() -> Vec<Effect> {
    vec![
        processor_value("PROCTHROTTLEMIN", "100"),
        processor_value("PROCTHROTTLEMAX", "100"),
        processor_value("PERFBOOSTMODE", "2"),
        Effect::powercfg(&["/setactive", "SCHEME_CURRENT"]),
        Effect::dword(PRIORITY_CONTROL, "Win32PrioritySeparation", 38),
    ]
}

pub fn cpu_off() -> Vec<Effect> {
    vec![
        processor_value("PROCTHROTTLEMIN", "5"),
        processor_value("PROCTHROTTLEMAX", "100"),
        processor_value("PERFBOOSTMODE", "1"),
        Effect::powercfg(&["/setactive", "SCHEME_CURRENT"]),
        Effect::dword(PRIORITY_CONTROL, "Win32PrioritySeparation", 2),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════════
// Disk
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveMedia {
    Ssd,
    Hdd,
    Unknown,
}

/// Answers what kind of drive the system volume lives on.
pub trait DriveProbe: Send + Sync {
    fn system_drive(&self) -> DriveMedia;
}

/// Probe backed by sysinfo's disk list.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoProbe;

impl DriveProbe for SysinfoProbe {
    fn system_drive(&self) -> DriveMedia {
        let root = system_root();
        let disks = Disks::new_with_refreshed_list();
        let disk = disks.list().iter().find(|d| {
            d.mount_point()
                .to_string_lossy()
                .trim_end_matches('\\')
                .eq_ignore_ascii_case(root.trim_end_matches('\\'))
        });
        match disk.map(|d| d.kind()) {
            Some(DiskKind::SSD) => DriveMedia::Ssd,
            Some(DiskKind::HDD) => DriveMedia::Hdd,
            _ => DriveMedia::Unknown,
        }
    }
}

/// Drive letter of the system volume, e.g. `C:`.
pub fn system_drive_letter() -> String {
    std::env::var("SystemDrive").unwrap_or_else(|_| "C:".to_string())
}

fn system_root() -> String {
    if cfg!(windows) {
        format!("{}\\", system_drive_letter())
    } else {
        "/".to_string()
    }
}

/// Everything a tuning procedure may touch.
pub struct TuningContext<'a> {
    pub exec: &'a dyn CommandExecutor,
    pub probe: &'a dyn DriveProbe,
}

fn run_all(ctx: &TuningContext<'_>, effects: &[Effect]) -> Result<(), MutationError> {
    for effect in effects {
        effect.perform(ctx.exec)?;
    }
    Ok(())
}

/// Disk optimization. Defragmentation only ever runs on rotating drives.
pub fn disk_optimization(ctx: &TuningContext<'_>, enabled: bool) -> Result<String, MutationError> {
    if !enabled {
        run_all(
            ctx,
            &[
                Effect::program("fsutil", &["behavior", "set", "DisableLastAccess", "2"]),
                Effect::program("fsutil", &["behavior", "set", "disable8dot3", "2"]),
            ],
        )?;
        return Ok("Đã khôi phục cấu hình hệ thống tệp mặc định".to_string());
    }

    run_all(
        ctx,
        &[
            Effect::program("fsutil", &["behavior", "set", "DisableLastAccess", "1"]),
            Effect::program("fsutil", &["behavior", "set", "disable8dot3", "1"]),
        ],
    )?;

    let drive = system_drive_letter();
    let media = ctx.probe.system_drive();
    log::info!("System drive {} detected as {:?}", drive, media);

    match media {
        DriveMedia::Ssd => {
            let letter = drive.trim_end_matches(':');
            Effect::script(&format!("Optimize-Volume -DriveLetter {} -ReTrim", letter))
                .perform(ctx.exec)?;
            Ok("Ổ SSD: bỏ qua chống phân mảnh, đã chạy TRIM".to_string())
        }
        DriveMedia::Hdd => {
            Effect::program("defrag", &[drive.as_str(), "/O"]).perform(ctx.exec)?;
            Ok("Ổ HDD: đã chống phân mảnh ổ hệ thống".to_string())
        }
        DriveMedia::Unknown => {
            Ok("Không xác định được loại ổ đĩa: bỏ qua chống phân mảnh".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::fake::FakeExecutor;

    struct FixedProbe(DriveMedia);

    impl DriveProbe for FixedProbe {
        fn system_drive(&self) -> DriveMedia {
            self.0
        }
    }

    fn run(media: DriveMedia, enabled: bool) -> (Result<String, MutationError>, Vec<String>) {
        let exec = FakeExecutor::new();
        let probe = FixedProbe(media);
        let ctx = TuningContext {
            exec: &exec,
            probe: &probe,
        };
        let result = disk_optimization(&ctx, enabled);
        (result, exec.calls())
    }

    #[test]
    fn ssd_never_defragments() {
        let (result, calls) = run(DriveMedia::Ssd, true);
        assert!(result.unwrap().contains("SSD"));
        assert!(!calls.iter().any(|c| c.starts_with("defrag")));
        assert!(calls.iter().any(|c| c.contains("-ReTrim")));
    }

    #[test]
    fn hdd_defragments_system_drive() {
        let (result, calls) = run(DriveMedia::Hdd, true);
        assert!(result.is_ok());
        assert!(calls.iter().any(|c| c.starts_with("defrag") && c.ends_with("/O")));
    }

    #[test]
    fn unknown_media_skips_defrag() {
        let (result, calls) = run(DriveMedia::Unknown, true);
        assert!(result.is_ok());
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn disabling_does_not_probe_branch() {
        let (result, calls) = run(DriveMedia::Hdd, false);
        assert!(result.is_ok());
        assert_eq!(
            calls,
            vec![
                "fsutil behavior set DisableLastAccess 2",
                "fsutil behavior set disable8dot3 2",
            ]
        );
    }

    #[test]
    fn failing_first_command_stops_the_sequence() {
        let exec = FakeExecutor::failing_on("DisableLastAccess");
        let probe = FixedProbe(DriveMedia::Hdd);
        let ctx = TuningContext {
            exec: &exec,
            probe: &probe,
        };
        assert!(disk_optimization(&ctx, true).is_err());
        assert_eq!(exec.calls().len(), 1);
    }

    #[test]
    fn off_sets_differ_from_on_sets() {
        assert_ne!(network_on(), network_off());
        assert_ne!(ram_on(), ram_off());
        assert_ne!(cpu_on(), cpu_off());
    }
}
