//! Command Executor, the only place that spawns external processes.
//! Every call blocks until the child exits; there is no timeout.

use crate::error::ExecError;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

#[cfg(windows)]
use std::os::windows::process::CommandExt;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

const POWERSHELL_UTF8_PREFIX: &str = "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8; ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// How a command was issued. Recorded by `DryRunExecutor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Program { program: String, args: Vec<String> },
    Shell(String),
    Script(String),
    Detached { program: String, args: Vec<String> },
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invocation::Program { program, args } => write_program(f, program, args),
            Invocation::Shell(cmd) => write!(f, "cmd /C {}", cmd),
            Invocation::Script(script) => write!(f, "powershell -Command {}", script),
            Invocation::Detached { program, args } => {
                write!(f, "detached: ")?;
                write_program(f, program, args)
            }
        }
    }
}

fn write_program(
    f: &mut std::fmt::Formatter<'_>,
    program: &str,
    args: &[String],
) -> std::fmt::Result {
    write!(f, "{}", program)?;
    for a in args {
        if a.is_empty() || a.contains(' ') {
            write!(f, " \"{}\"", a)?;
        } else {
            write!(f, " {}", a)?;
        }
    }
    Ok(())
}

pub trait CommandExecutor: Send + Sync {
    /// Run a program with arguments, failing on non-zero exit.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ExecError>;

    /// Run a command line through `cmd.exe`.
    fn run_shell(&self, command: &str) -> Result<CommandOutput, ExecError>;

    /// Run an inline PowerShell script.
    fn run_script(&self, script: &str) -> Result<CommandOutput, ExecError>;

    /// Start a program that outlives this process. Its stdio is not
    /// captured and the call does not wait for it.
    fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<(), ExecError>;
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for Arc<T> {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ExecError> {
        (**self).run(program, args)
    }

    fn run_shell(&self, command: &str) -> Result<CommandOutput, ExecError> {
        (**self).run_shell(command)
    }

    fn run_script(&self, script: &str) -> Result<CommandOutput, ExecError> {
        (**self).run_script(script)
    }

    fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<(), ExecError> {
        (**self).spawn_detached(program, args)
    }
}

/// Executes commands on the live system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl SystemExecutor {
    fn output(program: &str, mut cmd: Command) -> Result<CommandOutput, ExecError> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        let output = cmd.output().map_err(|e| ExecError::Spawn {
            program: program.to_string(),
            source: e,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            // reg/sc print their errors on stdout
            let detail = if stderr.is_empty() { stdout } else { stderr };
            Err(ExecError::NonZeroExit {
                program: program.to_string(),
                code: output.status.code(),
                stderr: detail,
            })
        }
    }
}

impl CommandExecutor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ExecError> {
        log::debug!("exec: {} {}", program, args.join(" "));
        let mut cmd = Command::new(program);
        cmd.args(args);
        Self::output(program, cmd)
    }

    fn run_shell(&self, command: &str) -> Result<CommandOutput, ExecError> {
        log::debug!("exec (cmd): {}", command);
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        Self::output("cmd", cmd)
    }

    fn run_script(&self, script: &str) -> Result<CommandOutput, ExecError> {
        log::debug!("exec (powershell): {}", script);
        let full_script = format!("{}{}", POWERSHELL_UTF8_PREFIX, script);
        let mut cmd = Command::new("powershell.exe");
        cmd.args([
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            &full_script,
        ]);
        Self::output("powershell", cmd)
    }

    fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<(), ExecError> {
        log::debug!("spawn (detached): {} {}", program, args.join(" "));
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        // The child is never waited on; dropping the handle does not kill it.
        cmd.spawn().map(drop).map_err(|e| ExecError::Spawn {
            program: program.to_string(),
            source: e,
        })
    }
}

/// Records every call instead of running it. Queries get empty output.
#[derive(Debug, Default)]
pub struct DryRunExecutor {
    calls: Mutex<Vec<Invocation>>,
}

impl DryRunExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything issued so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, call: Invocation) -> Result<CommandOutput, ExecError> {
        log::info!("dry-run: {}", call);
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        Ok(CommandOutput::default())
    }
}

impl CommandExecutor for DryRunExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ExecError> {
        self.record(Invocation::Program {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        })
    }

    fn run_shell(&self, command: &str) -> Result<CommandOutput, ExecError> {
        self.record(Invocation::Shell(command.to_string()))
    }

    fn run_script(&self, script: &str) -> Result<CommandOutput, ExecError> {
        self.record(Invocation::Script(script.to_string()))
    }

    fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<(), ExecError> {
        self.record(Invocation::Detached {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        })
        .map(drop)
    }
}
