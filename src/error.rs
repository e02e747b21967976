//! Centralized error types for notq-deploy
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use thiserror::Error;

/// Top-level error type for notq-deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),
}

impl DeployError {
    /// Process exit code to report for this error.
    ///
    /// A failing subprocess's own non-zero code is propagated; anything
    /// without one (validation, spawn failure, signal) maps to 1.
    pub fn exit_code(&self) -> i32 {
        let code = match self {
            Self::Pipeline(e) => e.code(),
            Self::Launch(LaunchError::Exited { code, .. }) => *code,
            Self::Config(_) | Self::Launch(_) => None,
        };
        code.filter(|c| *c != 0).unwrap_or(1)
    }
}

/// Pipeline step errors, one per step of build → tag → login → push
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Build failed ({}): {stderr}", describe_code(.code))]
    Build { code: Option<i32>, stderr: String },

    #[error("Tag failed ({}): {stderr}", describe_code(.code))]
    Tag { code: Option<i32>, stderr: String },

    #[error("Registry login failed ({}): {stderr}", describe_code(.code))]
    Auth { code: Option<i32>, stderr: String },

    #[error("Push failed ({}): {stderr}", describe_code(.code))]
    Push { code: Option<i32>, stderr: String },
}

impl PipelineError {
    /// Exit code of the failing subprocess, if one ran and exited normally
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Build { code, .. }
            | Self::Tag { code, .. }
            | Self::Auth { code, .. }
            | Self::Push { code, .. } => *code,
        }
    }

    /// Captured standard error text
    pub fn stderr(&self) -> &str {
        match self {
            Self::Build { stderr, .. }
            | Self::Tag { stderr, .. }
            | Self::Auth { stderr, .. }
            | Self::Push { stderr, .. } => stderr,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "no exit code".to_string(),
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required configuration missing: {field}")]
    MissingField { field: String },

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },
}

/// Errors from the local entry point shortcuts
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("No command configured for `{target}`")]
    EmptyCommand { target: String },

    #[error("Failed to start `{program}`: {message}")]
    Spawn { program: String, message: String },

    #[error("`{target}` exited ({})", describe_code(.code))]
    Exited { target: String, code: Option<i32> },
}
