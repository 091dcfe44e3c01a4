//! Error types for each layer. The operation boundary in `dispatcher` turns
//! all of these into a failed `OptimizationResult`.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single external command.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with code {code:?}: {stderr}")]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl ExecError {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecError::NonZeroExit { code, .. } => *code,
            ExecError::Spawn { .. } => None,
        }
    }
}

/// Failure of a system mutation or query issued by the dispatcher.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("{effect}: {source}")]
    Command {
        effect: String,
        #[source]
        source: ExecError,
    },

    #[error("unexpected output from {query}: {detail}")]
    Parse { query: String, detail: String },

    #[error("{0}")]
    Refused(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write settings file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("settings file {} does not contain a JSON object", .path.display())]
    NotAnObject { path: PathBuf },
}

/// Problems found while validating an option table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("duplicate option id '{0}'")]
    DuplicateId(String),

    #[error("option '{0}' is reversible but declares no reverse effect")]
    MissingReverse(String),

    #[error("option '{0}' declares no forward effect")]
    Empty(String),
}
