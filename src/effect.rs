//! System mutations as values. Each `Effect` knows how to render itself into
//! Command Executor calls, so option declarations stay pure data.

use crate::error::{ExecError, MutationError};
use crate::executor::CommandExecutor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `sc stop` exit code for "The service has not been started."
const SERVICE_NOT_ACTIVE: i32 = 1062;

/// Programs that only succeed from an elevated token.
const ELEVATED_PROGRAMS: &[&str] = &["fsutil", "defrag", "wmic", "bcdedit", "netsh", "sc"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegData {
    Dword(u32),
    Sz(String),
}

impl RegData {
    fn reg_type(&self) -> &'static str {
        match self {
            RegData::Dword(_) => "REG_DWORD",
            RegData::Sz(_) => "REG_SZ",
        }
    }

    fn render(&self) -> String {
        match self {
            RegData::Dword(v) => v.to_string(),
            RegData::Sz(s) => s.clone(),
        }
    }
}

/// Service start type as stored by the service control manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartType {
    Boot,
    System,
    Automatic,
    Manual,
    Disabled,
}

impl StartType {
    /// Numeric code used by the service control manager.
    pub fn code(self) -> u32 {
        match self {
            StartType::Boot => 0,
            StartType::System => 1,
            StartType::Automatic => 2,
            StartType::Manual => 3,
            StartType::Disabled => 4,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(StartType::Boot),
            1 => Some(StartType::System),
            2 => Some(StartType::Automatic),
            3 => Some(StartType::Manual),
            4 => Some(StartType::Disabled),
            _ => None,
        }
    }

    /// Value for `sc config <svc> start= <token>`.
    pub fn sc_token(self) -> &'static str {
        match self {
            StartType::Boot => "boot",
            StartType::System => "system",
            StartType::Automatic => "auto",
            StartType::Manual => "demand",
            StartType::Disabled => "disabled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StartType::Boot => "Boot",
            StartType::System => "System",
            StartType::Automatic => "Automatic",
            StartType::Manual => "Manual",
            StartType::Disabled => "Disabled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "automatic" | "auto" => Some(StartType::Automatic),
            "manual" | "demand" => Some(StartType::Manual),
            "disabled" => Some(StartType::Disabled),
            "boot" => Some(StartType::Boot),
            "system" => Some(StartType::System),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetRegistryValue {
        key: String,
        name: String,
        data: RegData,
    },
    /// Sets the unnamed (default) value of a key, creating the key.
    SetRegistryDefault { key: String, data: String },
    DeleteRegistryValue { key: String, name: String },
    DeleteRegistryKey { key: String },
    SetServiceStartType { service: String, start: StartType },
    StopService { service: String },
    StartService { service: String },
    SetPowerScheme { guid: String },
    PowerCfg { args: Vec<String> },
    Netsh { args: Vec<String> },
    Program { program: String, args: Vec<String> },
    Shell(String),
    Script(String),
    RestartExplorer,
}

impl Effect {
    pub fn dword(key: &str, name: &str, value: u32) -> Self {
        Effect::SetRegistryValue {
            key: key.into(),
            name: name.into(),
            data: RegData::Dword(value),
        }
    }

    pub fn string(key: &str, name: &str, value: &str) -> Self {
        Effect::SetRegistryValue {
            key: key.into(),
            name: name.into(),
            data: RegData::Sz(value.into()),
        }
    }

    pub fn default_value(key: &str, data: &str) -> Self {
        Effect::SetRegistryDefault {
            key: key.into(),
            data: data.into(),
        }
    }

    pub fn delete_value(key: &str, name: &str) -> Self {
        Effect::DeleteRegistryValue {
            key: key.into(),
            name: name.into(),
        }
    }

    pub fn delete_key(key: &str) -> Self {
        Effect::DeleteRegistryKey { key: key.into() }
    }

    pub fn start_type(service: &str, start: StartType) -> Self {
        Effect::SetServiceStartType {
            service: service.into(),
            start,
        }
    }

    pub fn stop(service: &str) -> Self {
        Effect::StopService {
            service: service.into(),
        }
    }

    pub fn power_scheme(guid: &str) -> Self {
        Effect::SetPowerScheme { guid: guid.into() }
    }

    pub fn powercfg(args: &[&str]) -> Self {
        Effect::PowerCfg {
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn netsh(args: &[&str]) -> Self {
        Effect::Netsh {
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn program(program: &str, args: &[&str]) -> Self {
        Effect::Program {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn shell(command: &str) -> Self {
        Effect::Shell(command.into())
    }

    pub fn script(script: &str) -> Self {
        Effect::Script(script.into())
    }

    /// Whether this effect fails without an administrator token.
    pub fn needs_elevation(&self) -> bool {
        match self {
            Effect::SetRegistryValue { key, .. }
            | Effect::SetRegistryDefault { key, .. }
            | Effect::DeleteRegistryValue { key, .. }
            | Effect::DeleteRegistryKey { key } => is_machine_key(key),
            Effect::SetServiceStartType { .. }
            | Effect::StopService { .. }
            | Effect::StartService { .. }
            | Effect::Netsh { .. } => true,
            Effect::PowerCfg { args } => args.iter().any(|a| a.eq_ignore_ascii_case("/hibernate")),
            Effect::Program { program, .. } => ELEVATED_PROGRAMS.contains(&program.as_str()),
            Effect::SetPowerScheme { .. }
            | Effect::Shell(_)
            | Effect::Script(_)
            | Effect::RestartExplorer => false,
        }
    }

    /// Issue the effect. Commands run one after another and block.
    pub fn perform(&self, exec: &dyn CommandExecutor) -> Result<(), MutationError> {
        let wrap = |source: ExecError| MutationError::Command {
            effect: self.to_string(),
            source,
        };

        match self {
            Effect::SetRegistryValue { key, name, data } => {
                let value = data.render();
                exec.run(
                    "reg",
                    &["add", key, "/v", name, "/t", data.reg_type(), "/d", &value, "/f"],
                )
                .map_err(wrap)?;
            }
            Effect::SetRegistryDefault { key, data } => {
                exec.run("reg", &["add", key, "/ve", "/d", data, "/f"])
                    .map_err(wrap)?;
            }
            Effect::DeleteRegistryValue { key, name } => {
                // Absent already means the OS default is in effect.
                match exec.run("reg", &["query", key, "/v", name]) {
                    Ok(_) => {}
                    Err(ExecError::NonZeroExit { .. }) => {
                        log::debug!("{}\\{} not present, nothing to delete", key, name);
                        return Ok(());
                    }
                    Err(e) => return Err(wrap(e)),
                }
                exec.run("reg", &["delete", key, "/v", name, "/f"])
                    .map_err(wrap)?;
            }
            Effect::DeleteRegistryKey { key } => {
                match exec.run("reg", &["query", key]) {
                    Ok(_) => {}
                    Err(ExecError::NonZeroExit { .. }) => {
                        log::debug!("{} not present, nothing to delete", key);
                        return Ok(());
                    }
                    Err(e) => return Err(wrap(e)),
                }
                exec.run("reg", &["delete", key, "/f"]).map_err(wrap)?;
            }
            Effect::SetServiceStartType { service, start } => {
                exec.run("sc", &["config", service, "start=", start.sc_token()])
                    .map_err(wrap)?;
            }
            Effect::StopService { service } => match exec.run("sc", &["stop", service]) {
                Ok(_) => {}
                Err(e) if e.exit_code() == Some(SERVICE_NOT_ACTIVE) => {
                    log::debug!("{} already stopped", service);
                }
                Err(e) => return Err(wrap(e)),
            },
            Effect::StartService { service } => {
                exec.run("sc", &["start", service]).map_err(wrap)?;
            }
            Effect::SetPowerScheme { guid } => {
                exec.run("powercfg", &["/setactive", guid]).map_err(wrap)?;
            }
            Effect::PowerCfg { args } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                exec.run("powercfg", &args).map_err(wrap)?;
            }
            Effect::Netsh { args } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                exec.run("netsh", &args).map_err(wrap)?;
            }
            Effect::Program { program, args } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                exec.run(program, &args).map_err(wrap)?;
            }
            Effect::Shell(command) => {
                exec.run_shell(command).map_err(wrap)?;
            }
            Effect::Script(script) => {
                exec.run_script(script).map_err(wrap)?;
            }
            Effect::RestartExplorer => {
                // taskkill exits non-zero when explorer is not running
                match exec.run("taskkill", &["/f", "/im", "explorer.exe"]) {
                    Ok(_) => {}
                    Err(e @ ExecError::NonZeroExit { .. }) => {
                        log::debug!("taskkill explorer.exe: {}", e);
                    }
                    Err(e) => return Err(wrap(e)),
                }
                // The new shell outlives us; it must not hold our pipes.
                exec.spawn_detached("explorer.exe", &[]).map_err(wrap)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::SetRegistryValue { key, name, data } => {
                write!(f, "set {}\\{} = {}", key, name, data.render())
            }
            Effect::SetRegistryDefault { key, data } => {
                write!(f, "set {}\\(default) = \"{}\"", key, data)
            }
            Effect::DeleteRegistryValue { key, name } => write!(f, "delete {}\\{}", key, name),
            Effect::DeleteRegistryKey { key } => write!(f, "delete key {}", key),
            Effect::SetServiceStartType { service, start } => {
                write!(f, "set {} start type to {}", service, start.label())
            }
            Effect::StopService { service } => write!(f, "stop {}", service),
            Effect::StartService { service } => write!(f, "start {}", service),
            Effect::SetPowerScheme { guid } => write!(f, "activate power scheme {}", guid),
            Effect::PowerCfg { args } => write!(f, "powercfg {}", args.join(" ")),
            Effect::Netsh { args } => write!(f, "netsh {}", args.join(" ")),
            Effect::Program { program, args } => write!(f, "{} {}", program, args.join(" ")),
            Effect::Shell(command) => write!(f, "cmd /C {}", command),
            Effect::Script(script) => write!(f, "powershell {}", script),
            Effect::RestartExplorer => write!(f, "restart explorer.exe"),
        }
    }
}

fn is_machine_key(key: &str) -> bool {
    let upper = key.to_ascii_uppercase();
    upper.starts_with("HKLM\\") || upper.starts_with("HKEY_LOCAL_MACHINE\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::fake::FakeExecutor;
    use crate::executor::CommandOutput;

    #[test]
    fn registry_value_renders_reg_add() {
        let exec = FakeExecutor::new();
        Effect::dword("HKCU\\Software\\Test", "Flag", 1)
            .perform(&exec)
            .unwrap();
        assert_eq!(
            exec.calls(),
            vec!["reg add HKCU\\Software\\Test /v Flag /t REG_DWORD /d 1 /f"]
        );
    }

    #[test]
    fn delete_skips_missing_value() {
        let exec = FakeExecutor::failing_on("reg query");
        Effect::delete_value("HKCU\\Software\\Test", "Flag")
            .perform(&exec)
            .unwrap();
        assert_eq!(exec.calls().len(), 1);
    }

    #[test]
    fn delete_removes_present_value() {
        let exec = FakeExecutor::new();
        Effect::delete_value("HKCU\\Software\\Test", "Flag")
            .perform(&exec)
            .unwrap();
        let calls = exec.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].starts_with("reg delete"));
    }

    /// Every call fails to launch, as when `reg.exe` is missing.
    struct Unlaunchable;

    impl CommandExecutor for Unlaunchable {
        fn run(&self, program: &str, _args: &[&str]) -> Result<CommandOutput, ExecError> {
            Err(ExecError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
        }

        fn run_shell(&self, _command: &str) -> Result<CommandOutput, ExecError> {
            self.run("cmd", &[])
        }

        fn run_script(&self, _script: &str) -> Result<CommandOutput, ExecError> {
            self.run("powershell", &[])
        }

        fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<(), ExecError> {
            self.run(program, args).map(|_| ())
        }
    }

    #[test]
    fn delete_reports_query_that_cannot_start() {
        let err = Effect::delete_value("HKCU\\Software\\X", "A")
            .perform(&Unlaunchable)
            .unwrap_err();
        assert!(err.to_string().contains("reg"));
        assert!(Effect::delete_key("HKCU\\Software\\X")
            .perform(&Unlaunchable)
            .is_err());
    }

    #[test]
    fn explorer_restart_kills_then_detaches() {
        let exec = FakeExecutor::failing_on("taskkill");
        Effect::RestartExplorer.perform(&exec).unwrap();
        assert_eq!(
            exec.calls(),
            vec!["taskkill /f /im explorer.exe", "detached: explorer.exe"]
        );
        assert!(Effect::RestartExplorer.perform(&Unlaunchable).is_err());
    }

    #[test]
    fn stopping_an_inactive_service_is_not_an_error() {
        let mut exec = FakeExecutor::new();
        exec.fail_with_code.push(("sc stop".into(), SERVICE_NOT_ACTIVE));
        assert!(Effect::stop("SysMain").perform(&exec).is_ok());

        let exec = FakeExecutor::failing_on("sc stop");
        assert!(Effect::stop("SysMain").perform(&exec).is_err());
    }

    #[test]
    fn failure_carries_effect_description() {
        let exec = FakeExecutor::failing_on("sc config");
        let err = Effect::start_type("DiagTrack", StartType::Disabled)
            .perform(&exec)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DiagTrack"));
        assert!(msg.contains("Access is denied"));
    }

    #[test]
    fn elevation_follows_hive_and_kind() {
        assert!(!Effect::dword("HKCU\\Software\\X", "A", 0).needs_elevation());
        assert!(Effect::dword("HKLM\\SOFTWARE\\X", "A", 0).needs_elevation());
        assert!(Effect::start_type("WSearch", StartType::Manual).needs_elevation());
        assert!(!Effect::RestartExplorer.needs_elevation());
        assert!(Effect::powercfg(&["/hibernate", "off"]).needs_elevation());
    }

    #[test]
    fn start_type_codes_round_trip() {
        for st in [
            StartType::Boot,
            StartType::System,
            StartType::Automatic,
            StartType::Manual,
            StartType::Disabled,
        ] {
            assert_eq!(StartType::from_code(st.code()), Some(st));
        }
        assert_eq!(StartType::parse("Auto"), Some(StartType::Automatic));
        assert_eq!(StartType::parse("bogus"), None);
    }
}
