use clap::{Parser, Subcommand};
use pc_tuner::config::AppConfig;
use pc_tuner::executor::{CommandExecutor, DryRunExecutor, SystemExecutor};
use pc_tuner::tuning::SysinfoProbe;
use pc_tuner::{elevation, AppState, Dispatcher, OptimizationResult, SettingsStore, StartType};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pc-tuner", version, about = "Windows tuning toggles and service control")]
struct Cli {
    /// Print the commands that would run instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Settings file to read and update
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every option with its saved state
    Options,
    /// Turn one option on (or off with --off)
    Apply {
        id: String,
        #[arg(long)]
        off: bool,
    },
    /// Re-apply every option saved as enabled
    ApplySaved,
    /// Revert to Windows defaults and forget saved settings
    Reset,
    /// List installed services with catalog metadata
    Services,
    /// Control one service
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },
    /// Write the saved settings to a dated file
    Export {
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Replace the saved settings with an exported file
    Import { file: PathBuf },
}

#[derive(Subcommand)]
enum ServiceAction {
    Start { name: String },
    Stop { name: String },
    /// Set the start type: automatic, manual or disabled
    Startup { name: String, start: String },
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pc_tuner=info,warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn warn_if_not_elevated(what: &str) {
    if !elevation::is_elevated() {
        eprintln!("warning: {} needs administrator rights; run from an elevated prompt", what);
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn report(result: &OptimizationResult, json: bool) -> Result<(), String> {
    if json {
        print_json(result)?;
    } else {
        println!("{}", result.message);
    }
    if result.success {
        Ok(())
    } else {
        Err("operation failed".to_string())
    }
}

async fn run(cli: Cli, state: &AppState, config: &AppConfig) -> Result<(), String> {
    let json = cli.json;
    match cli.command {
        Command::Options => {
            let options = pc_tuner::cmd_get_options(state).await;
            if json {
                return print_json(&options);
            }
            let table = state.dispatcher().table();
            for o in &options {
                let admin = table
                    .get(&o.id)
                    .map(|s| s.requires_admin())
                    .unwrap_or(false);
                println!(
                    "[{}] {:<42} {}{}",
                    if o.enabled { "x" } else { " " },
                    o.id,
                    o.name,
                    if admin { " (admin)" } else { "" }
                );
            }
            Ok(())
        }
        Command::Apply { id, off } => {
            if let Some(spec) = state.dispatcher().table().get(&id) {
                if spec.requires_admin() {
                    warn_if_not_elevated(spec.id);
                }
            }
            let result = pc_tuner::cmd_apply(state, id, !off).await;
            report(&result, json)
        }
        Command::ApplySaved => {
            let batch = pc_tuner::cmd_apply_saved(state).await;
            if json {
                print_json(&batch)?;
            } else {
                for r in &batch.results {
                    println!("{} {}", if r.success { "ok  " } else { "FAIL" }, r.message);
                }
                println!("{}", batch.message);
            }
            if batch.success {
                Ok(())
            } else {
                Err("some options failed".to_string())
            }
        }
        Command::Reset => {
            warn_if_not_elevated("reset");
            let result = pc_tuner::cmd_reset(state).await;
            report(&result, json)
        }
        Command::Services => {
            let services = pc_tuner::cmd_list_services(state).await?;
            if json {
                return print_json(&services);
            }
            for s in &services {
                println!(
                    "{:<16} {:<10} {:<9} {:<7} {:<5} {}",
                    s.status_label,
                    s.start_type_label,
                    s.impact.label(),
                    if s.safe_to_disable { "safe" } else { "-" },
                    s.name,
                    s.display_name
                );
            }
            Ok(())
        }
        Command::Service { action } => {
            warn_if_not_elevated("service control");
            let result = match action {
                ServiceAction::Start { name } => pc_tuner::cmd_start_service(state, name).await,
                ServiceAction::Stop { name } => pc_tuner::cmd_stop_service(state, name).await,
                ServiceAction::Startup { name, start } => {
                    let start = StartType::parse(&start)
                        .ok_or_else(|| format!("unknown start type '{}'", start))?;
                    pc_tuner::cmd_set_service_startup(state, name, start).await
                }
            };
            report(&result, json)
        }
        Command::Export { dir } => {
            let saved = state.dispatcher().store().load().map_err(|e| e.to_string())?;
            let value = serde_json::to_value(&saved).map_err(|e| e.to_string())?;
            let dir = dir.unwrap_or_else(|| config.export_dir.clone());
            let path = pc_tuner::cmd_export_settings(value, dir).await?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Import { file } => {
            let imported = pc_tuner::cmd_import_settings(state, file).await?;
            if json {
                return print_json(&imported);
            }
            println!(
                "Imported {} settings; run `pc-tuner apply-saved` to apply them",
                imported.len()
            );
            Ok(())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let config = AppConfig::from_env().with_settings_path(cli.settings.clone());
    log::debug!("settings file: {}", config.settings_path.display());

    let recorder = cli.dry_run.then(|| Arc::new(DryRunExecutor::new()));
    let (exec, store): (Box<dyn CommandExecutor>, SettingsStore) = match &recorder {
        Some(r) => (
            Box::new(r.clone()),
            SettingsStore::read_only(&config.settings_path),
        ),
        None => (
            Box::new(SystemExecutor),
            SettingsStore::new(&config.settings_path),
        ),
    };
    let state = AppState::new(Dispatcher::new(exec, Box::new(SysinfoProbe), store));

    let outcome = run(cli, &state, &config).await;

    if let Some(r) = recorder {
        for call in r.calls() {
            println!("would run: {}", call);
        }
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
