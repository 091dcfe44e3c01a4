pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod effect;
pub mod elevation;
pub mod error;
pub mod executor;
pub mod options;
pub mod services;
pub mod settings;
pub mod tuning;

use std::path::PathBuf;
use std::sync::Arc;

pub use dispatcher::{BatchReport, Dispatcher, OptimizationResult};
pub use effect::StartType;
pub use options::OptimizationOption;
pub use services::ServiceInfo;
pub use settings::{Settings, SettingsStore};

// ═══════════════════════════════════════════════════════════════════════════════
// Helper: run blocking code on a background thread
// ═══════════════════════════════════════════════════════════════════════════════

/// Wraps a blocking closure in tokio's spawn_blocking, used by every command.
async fn bg<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    match tokio::task::spawn_blocking(f).await {
        Ok(v) => v,
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    }
}

/// Shared handle the commands operate on.
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands: Optimization options
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn cmd_get_options(state: &AppState) -> Vec<OptimizationOption> {
    let d = state.dispatcher.clone();
    bg(move || {
        let saved = d.store().load_or_empty();
        d.options(&saved)
    })
    .await
}

/// Apply one option and, if that worked, remember the new state.
pub async fn cmd_apply(state: &AppState, id: String, enabled: bool) -> OptimizationResult {
    let d = state.dispatcher.clone();
    bg(move || {
        let mut result = d.apply(&id, enabled);
        if result.success {
            if let Err(e) = d.remember(&id, enabled) {
                log::warn!("Applied {} but could not save settings: {}", id, e);
                result.message = format!("{} (không lưu được cài đặt: {})", result.message, e);
            }
        }
        result
    })
    .await
}

pub async fn cmd_apply_saved(state: &AppState) -> BatchReport {
    let d = state.dispatcher.clone();
    bg(move || d.apply_saved()).await
}

pub async fn cmd_reset(state: &AppState) -> OptimizationResult {
    let d = state.dispatcher.clone();
    bg(move || d.reset()).await
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands: Services
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn cmd_list_services(state: &AppState) -> Result<Vec<ServiceInfo>, String> {
    let d = state.dispatcher.clone();
    bg(move || d.list_services().map_err(|e| e.to_string())).await
}

pub async fn cmd_start_service(state: &AppState, name: String) -> OptimizationResult {
    let d = state.dispatcher.clone();
    bg(move || d.start_service(&name)).await
}

pub async fn cmd_stop_service(state: &AppState, name: String) -> OptimizationResult {
    let d = state.dispatcher.clone();
    bg(move || d.stop_service(&name)).await
}

pub async fn cmd_set_service_startup(
    state: &AppState,
    name: String,
    start: StartType,
) -> OptimizationResult {
    let d = state.dispatcher.clone();
    bg(move || d.set_service_start_type(&name, start)).await
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands: Settings files
// ═══════════════════════════════════════════════════════════════════════════════

pub async fn cmd_export_settings(
    value: serde_json::Value,
    dir: PathBuf,
) -> Result<PathBuf, String> {
    bg(move || settings::export_settings(&value, &dir).map_err(|e| e.to_string())).await
}

/// Import a settings file and make it the saved state. Nothing is applied.
pub async fn cmd_import_settings(state: &AppState, path: PathBuf) -> Result<Settings, String> {
    let d = state.dispatcher.clone();
    bg(move || {
        let imported = settings::import_settings(&path).map_err(|e| e.to_string())?;
        d.store().save(&imported).map_err(|e| e.to_string())?;
        Ok(imported)
    })
    .await
}
