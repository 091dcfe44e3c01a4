use pc_tuner::executor::{DryRunExecutor, Invocation};
use pc_tuner::options::OptionTable;
use pc_tuner::tuning::{DriveMedia, DriveProbe};
use pc_tuner::{Dispatcher, OptimizationOption, SettingsStore};
use std::sync::Arc;

struct Hdd;

impl DriveProbe for Hdd {
    fn system_drive(&self) -> DriveMedia {
        DriveMedia::Hdd
    }
}

fn dry_dispatcher() -> (Dispatcher, Arc<DryRunExecutor>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let exec = Arc::new(DryRunExecutor::new());
    let d = Dispatcher::new(
        Box::new(exec.clone()),
        Box::new(Hdd),
        SettingsStore::new(dir.path().join("settings.json")),
    );
    (d, exec, dir)
}

fn rendered(exec: &DryRunExecutor) -> Vec<String> {
    exec.calls().iter().map(Invocation::to_string).collect()
}

#[test]
fn standard_table_is_valid() {
    let table = OptionTable::standard();
    assert!(table.len() >= 40);
    assert_eq!(table.validate(), Ok(()));
}

#[test]
fn unknown_option_issues_nothing() {
    let (d, exec, _dir) = dry_dispatcher();
    let r = d.apply("does_not_exist", true);
    assert!(!r.success);
    assert!(r.message.contains("does_not_exist"));
    assert!(exec.calls().is_empty());
}

#[test]
fn every_option_can_be_turned_on_and_off() {
    let (d, _exec, _dir) = dry_dispatcher();
    let ids: Vec<String> = d.table().iter().map(|s| s.id.to_string()).collect();
    for id in ids {
        for enabled in [true, false] {
            let r = d.apply(&id, enabled);
            assert!(r.success, "{} = {}: {}", id, enabled, r.message);
        }
    }
}

#[test]
fn hdd_gets_defragmented() {
    let (d, exec, _dir) = dry_dispatcher();
    assert!(d.apply("performance_disk", true).success);
    let calls = rendered(&exec);
    assert!(calls.iter().any(|c| c.starts_with("defrag")));
    assert!(!calls.iter().any(|c| c.contains("ReTrim")));
}

#[test]
fn disabling_a_service_option_restores_manual_start() {
    let (d, exec, _dir) = dry_dispatcher();
    assert!(d.apply("system_disable_sysmain", false).success);
    let calls = rendered(&exec);
    assert!(calls.iter().any(|c| c.contains("sc config") && c.ends_with("demand")));
    assert!(!calls.iter().any(|c| c.contains("disabled")));
}

#[test]
fn empty_batch_reports_zero() {
    let (d, exec, _dir) = dry_dispatcher();
    let report = d.apply_all(&[]);
    assert!(report.success);
    assert_eq!((report.attempted, report.succeeded, report.failed), (0, 0, 0));
    assert!(exec.calls().is_empty());
}

#[test]
fn batch_skips_disabled_entries() {
    let (d, _exec, _dir) = dry_dispatcher();
    let report = d.apply_all(&[
        OptimizationOption::new("explorer_show_extensions", true),
        OptimizationOption::new("appearance_dark_mode", false),
    ]);
    assert_eq!(report.attempted, 1);
    assert_eq!(report.results[0].id, "explorer_show_extensions");
}

#[test]
fn read_only_store_survives_reset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut saved = pc_tuner::Settings::new();
    saved.insert("appearance_dark_mode".into(), true);
    SettingsStore::new(&path).save(&saved).unwrap();

    let d = Dispatcher::new(
        Box::new(DryRunExecutor::new()),
        Box::new(Hdd),
        SettingsStore::read_only(&path),
    );
    assert!(d.reset().success);
    assert!(path.exists());
}

#[test]
fn explorer_is_killed_then_started_detached() {
    let (d, exec, _dir) = dry_dispatcher();
    assert!(d.apply("taskbar_center_icons", true).success);
    let calls = exec.calls();
    let n = calls.len();
    assert!(n >= 3);
    assert_eq!(calls[n - 2].to_string(), "taskkill /f /im explorer.exe");
    assert_eq!(
        calls[n - 1],
        Invocation::Detached {
            program: "explorer.exe".into(),
            args: Vec::new(),
        }
    );
    assert!(!calls.iter().any(|c| matches!(c, Invocation::Shell(_))));
}

#[test]
fn reset_reaches_values_the_table_sets() {
    let (d, exec, _dir) = dry_dispatcher();
    assert!(d.reset().success);
    let calls = rendered(&exec);
    for value in ["SoftLandingEnabled", "AllowTelemetry", "DODownloadMode", "GameDVR_Enabled"] {
        assert!(calls.iter().any(|c| c.contains(value)), "{} not reset", value);
    }
}
