//! Optimization Dispatcher: option id + desired state → system mutations.
//!
//! Every public operation returns an `OptimizationResult`; errors from the
//! layers below are converted here and never escape.

use crate::effect::{Effect, StartType};
use crate::error::MutationError;
use crate::executor::CommandExecutor;
use crate::options::{self, Action, OptimizationOption, OptionSpec, OptionTable};
use crate::services::{self, ServiceInfo};
use crate::settings::{Settings, SettingsStore};
use crate::tuning::{DriveProbe, TuningContext};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub success: bool,
    pub message: String,
}

impl OptimizationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionOutcome {
    pub id: String,
    pub success: bool,
    pub message: String,
    pub duration_ms: u64,
}

/// Result of `apply_all`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub success: bool,
    pub message: String,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<OptionOutcome>,
}

impl From<BatchReport> for OptimizationResult {
    fn from(report: BatchReport) -> Self {
        Self {
            success: report.success,
            message: report.message,
        }
    }
}

pub struct Dispatcher {
    exec: Box<dyn CommandExecutor>,
    probe: Box<dyn DriveProbe>,
    table: OptionTable,
    store: SettingsStore,
}

impl Dispatcher {
    pub fn new(
        exec: Box<dyn CommandExecutor>,
        probe: Box<dyn DriveProbe>,
        store: SettingsStore,
    ) -> Self {
        Self::with_table(exec, probe, store, OptionTable::standard())
    }

    pub fn with_table(
        exec: Box<dyn CommandExecutor>,
        probe: Box<dyn DriveProbe>,
        store: SettingsStore,
        table: OptionTable,
    ) -> Self {
        Self {
            exec,
            probe,
            table,
            store,
        }
    }

    pub fn table(&self) -> &OptionTable {
        &self.table
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Every option, with `enabled` taken from `saved` (default off).
    pub fn options(&self, saved: &Settings) -> Vec<OptimizationOption> {
        self.table
            .iter()
            .map(|spec| OptimizationOption {
                enabled: saved.get(spec.id).copied().unwrap_or(false),
                ..OptimizationOption::from(spec)
            })
            .collect()
    }

    /// Apply one option. Unknown ids fail without touching the system.
    pub fn apply(&self, id: &str, enabled: bool) -> OptimizationResult {
        let Some(spec) = self.table.get(id) else {
            log::warn!("Unsupported option id '{}'", id);
            return OptimizationResult::failed(format!("Tùy chọn không được hỗ trợ: {}", id));
        };

        log::info!("Applying {} = {}", id, enabled);
        match self.run_option(spec, enabled) {
            Ok(detail) => {
                let verb = if enabled { "Đã bật" } else { "Đã tắt" };
                let message = match detail {
                    Some(d) => format!("{} {}: {}", verb, spec.name, d),
                    None => format!("{} {}", verb, spec.name),
                };
                OptimizationResult::ok(message)
            }
            Err(e) => {
                log::warn!("{} = {} failed: {}", id, enabled, e);
                OptimizationResult::failed(format!("Lỗi khi áp dụng {}: {}", spec.name, e))
            }
        }
    }

    fn run_option(
        &self,
        spec: &OptionSpec,
        enabled: bool,
    ) -> Result<Option<String>, MutationError> {
        let detail = match &spec.action {
            Action::Procedure(procedure) => {
                let ctx = TuningContext {
                    exec: self.exec.as_ref(),
                    probe: self.probe.as_ref(),
                };
                Some(procedure(&ctx, enabled)?)
            }
            Action::OneShot(_) if !enabled => {
                return Ok(Some("không có gì cần hoàn tác".to_string()));
            }
            _ => {
                // plan() is only None for procedures
                let plan = spec.plan(enabled).unwrap_or_default();
                for effect in plan {
                    effect.perform(self.exec.as_ref())?;
                }
                None
            }
        };

        if spec.restart_explorer {
            Effect::RestartExplorer.perform(self.exec.as_ref())?;
        }
        Ok(detail)
    }

    /// Apply every enabled option in list order. Failures do not stop the
    /// batch; disabled entries are skipped.
    pub fn apply_all(&self, options: &[OptimizationOption]) -> BatchReport {
        let start = Instant::now();
        let mut results = Vec::new();

        for option in options.iter().filter(|o| o.enabled) {
            let item_start = Instant::now();
            let result = self.apply(&option.id, true);
            results.push(OptionOutcome {
                id: option.id.clone(),
                success: result.success,
                message: result.message,
                duration_ms: item_start.elapsed().as_millis() as u64,
            });
        }

        let attempted = results.len();
        let succeeded = results.iter().filter(|r| r.success).count();
        let failed = attempted - succeeded;
        let message = format!(
            "Đã áp dụng {}/{} tùy chọn ({} lỗi)",
            succeeded, attempted, failed
        );
        log::info!("Batch finished: {}/{} succeeded", succeeded, attempted);

        BatchReport {
            success: failed == 0,
            message,
            attempted,
            succeeded,
            failed,
            duration_ms: start.elapsed().as_millis() as u64,
            results,
        }
    }

    /// Apply every option stored as enabled in the settings file.
    pub fn apply_saved(&self) -> BatchReport {
        let saved = self.store.load_or_empty();
        self.apply_all(&self.options(&saved))
    }

    /// Best-effort revert to OS defaults, then forget saved settings.
    pub fn reset(&self) -> OptimizationResult {
        let plan = self.table.reset_plan();
        let mut failures = Vec::new();

        for effect in &plan {
            if let Err(e) = effect.perform(self.exec.as_ref()) {
                log::warn!("Reset step failed: {}", e);
                failures.push(e.to_string());
            }
        }
        if let Err(e) = Effect::RestartExplorer.perform(self.exec.as_ref()) {
            log::warn!("Explorer restart failed: {}", e);
            failures.push(e.to_string());
        }
        if let Err(e) = self.store.clear() {
            log::warn!("Could not delete settings file: {}", e);
            failures.push(e.to_string());
        }

        if failures.is_empty() {
            OptimizationResult::ok("Đã khôi phục cài đặt mặc định")
        } else {
            OptimizationResult::failed(format!(
                "Khôi phục mặc định gặp {} lỗi: {}",
                failures.len(),
                failures.join("; ")
            ))
        }
    }

    /// Persist the new state of one option.
    pub fn remember(&self, id: &str, enabled: bool) -> Result<(), crate::error::SettingsError> {
        let mut saved = self.store.load()?;
        saved.insert(id.to_string(), enabled);
        self.store.save(&saved)
    }

    pub fn list_services(&self) -> Result<Vec<ServiceInfo>, MutationError> {
        services::list_services(self.exec.as_ref())
    }

    pub fn start_service(&self, name: &str) -> OptimizationResult {
        to_result(services::start_service(self.exec.as_ref(), name))
    }

    pub fn stop_service(&self, name: &str) -> OptimizationResult {
        to_result(services::stop_service(self.exec.as_ref(), name))
    }

    pub fn set_service_start_type(&self, name: &str, start: StartType) -> OptimizationResult {
        to_result(services::set_start_type(self.exec.as_ref(), name, start))
    }
}

fn to_result(r: Result<String, MutationError>) -> OptimizationResult {
    match r {
        Ok(msg) => OptimizationResult::ok(msg),
        Err(e) => {
            log::warn!("{}", e);
            OptimizationResult::failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::fake::FakeExecutor;
    use crate::tuning::DriveMedia;
    use std::sync::Arc;

    struct FixedProbe(DriveMedia);

    impl DriveProbe for FixedProbe {
        fn system_drive(&self) -> DriveMedia {
            self.0
        }
    }

    fn dispatcher(fake: FakeExecutor) -> (Dispatcher, Arc<FakeExecutor>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let fake = Arc::new(fake);
        let d = Dispatcher::new(
            Box::new(fake.clone()),
            Box::new(FixedProbe(DriveMedia::Ssd)),
            SettingsStore::new(dir.path().join("settings.json")),
        );
        (d, fake, dir)
    }

    #[test]
    fn unknown_id_fails_and_names_it() {
        let (d, fake, _dir) = dispatcher(FakeExecutor::new());
        let r = d.apply("no_such_option", true);
        assert!(!r.success);
        assert!(r.message.contains("no_such_option"));
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn every_option_round_trips_without_panicking() {
        let (d, _fake, _dir) = dispatcher(FakeExecutor::new());
        let ids: Vec<&str> = d.table().iter().map(|s| s.id).collect();
        for id in ids {
            let on = d.apply(id, true);
            let off = d.apply(id, false);
            assert!(on.success, "{}: {}", id, on.message);
            assert!(off.success, "{}: {}", id, off.message);
            assert!(!on.message.is_empty());
            assert!(!off.message.is_empty());
        }
    }

    #[test]
    fn failure_is_reported_not_thrown() {
        let (d, _fake, _dir) = dispatcher(FakeExecutor::failing_on("sc config"));
        let r = d.apply("system_disable_sysmain", true);
        assert!(!r.success);
        assert!(r.message.contains("Access is denied"));
    }

    #[test]
    fn sequence_stops_at_first_failure() {
        let (d, fake, _dir) = dispatcher(FakeExecutor::failing_on("AppsUseLightTheme"));
        let r = d.apply("appearance_dark_mode", true);
        assert!(!r.success);
        assert_eq!(fake.calls().len(), 1);
    }

    #[test]
    fn explorer_restarts_after_taskbar_change() {
        let (d, fake, _dir) = dispatcher(FakeExecutor::new());
        assert!(d.apply("taskbar_align_left", true).success);
        let calls = fake.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1], "taskkill /f /im explorer.exe");
        assert_eq!(calls[2], "detached: explorer.exe");
    }

    #[test]
    fn disabling_a_one_shot_option_does_nothing() {
        let (d, fake, _dir) = dispatcher(FakeExecutor::new());
        let r = d.apply("network_flush_dns", false);
        assert!(r.success);
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn disk_procedure_uses_probe() {
        let (d, fake, _dir) = dispatcher(FakeExecutor::new());
        let r = d.apply("performance_disk", true);
        assert!(r.success);
        assert!(r.message.contains("SSD"));
        assert!(!fake.calls().iter().any(|c| c.starts_with("defrag")));
    }

    #[test]
    fn empty_batch_succeeds_with_zero_counts() {
        let (d, _fake, _dir) = dispatcher(FakeExecutor::new());
        let report = d.apply_all(&[]);
        assert!(report.success);
        assert_eq!(report.attempted, 0);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn batch_counts_only_enabled_options_and_keeps_going() {
        let (d, _fake, _dir) = dispatcher(FakeExecutor::failing_on("HideFileExt"));
        let options = vec![
            OptimizationOption::new("explorer_show_extensions", true),
            OptimizationOption::new("appearance_dark_mode", false),
            OptimizationOption::new("bogus", true),
            OptimizationOption::new("explorer_compact_mode", true),
        ];
        let report = d.apply_all(&options);
        assert!(!report.success);
        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(report.results[2].id, "explorer_compact_mode");

        let summary: OptimizationResult = report.into();
        assert!(summary.message.contains("1/3"));
    }

    #[test]
    fn options_merge_saved_state() {
        let (d, _fake, _dir) = dispatcher(FakeExecutor::new());
        let mut saved = Settings::new();
        saved.insert("appearance_dark_mode".into(), true);
        saved.insert("removed_in_older_version".into(), true);
        let options = d.options(&saved);
        assert_eq!(options.len(), d.table().len());
        assert_eq!(options.iter().filter(|o| o.enabled).count(), 1);
        assert!(options
            .iter()
            .any(|o| o.id == "appearance_dark_mode" && o.enabled));
    }

    #[test]
    fn reset_deletes_settings_and_selects_balanced_scheme() {
        let (d, fake, _dir) = dispatcher(FakeExecutor::new());
        d.remember("appearance_dark_mode", true).unwrap();
        assert!(d.store().path().exists());

        let r = d.reset();
        assert!(r.success, "{}", r.message);
        assert!(!d.store().path().exists());
        assert!(fake
            .calls()
            .iter()
            .any(|c| c.contains(options::BALANCED_SCHEME)));
    }

    #[test]
    fn reset_reverts_machine_policies_too() {
        let (d, fake, _dir) = dispatcher(FakeExecutor::new());
        assert!(d.reset().success);
        let calls = fake.calls();
        assert!(calls
            .iter()
            .any(|c| c.starts_with("reg delete") && c.contains("AllowTelemetry")));
        assert!(calls
            .iter()
            .any(|c| c.starts_with("reg add") && c.contains("HiberbootEnabled")));
    }

    #[test]
    fn reset_keeps_going_after_failures() {
        let (d, fake, _dir) = dispatcher(FakeExecutor::failing_on("reg delete"));
        let r = d.reset();
        assert!(!r.success);
        assert!(fake.calls().iter().any(|c| c.contains("powercfg")));
    }

    #[test]
    fn apply_saved_uses_settings_file() {
        let (d, fake, _dir) = dispatcher(FakeExecutor::new());
        d.remember("explorer_show_hidden", true).unwrap();
        d.remember("explorer_compact_mode", false).unwrap();
        let report = d.apply_saved();
        assert_eq!(report.attempted, 1);
        assert!(report.success);
        assert_eq!(fake.calls().len(), 1);
    }
}
