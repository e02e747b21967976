//! Subprocess execution
//!
//! Every external command goes through [`ProcessRunner`], so the pipeline
//! can be exercised against a recording runner in tests.

use async_trait::async_trait;
use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::domain::Secret;

/// Placeholder shown in logs for sensitive arguments
pub const MASK: &str = "***";

/// A fully described external command
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Written to the child's stdin, then stdin is closed
    pub stdin: Option<Secret>,
    pub current_dir: Option<PathBuf>,
    /// Indices into `args` that are masked in [`Invocation::display`]
    masked: Vec<usize>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            current_dir: None,
            masked: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Argument that is passed as-is but shown as `***` in logs
    pub fn sensitive_arg(mut self, arg: impl Into<String>) -> Self {
        self.masked.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    pub fn stdin(mut self, input: Secret) -> Self {
        self.stdin = Some(input);
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Command line for logs (stdin and sensitive arguments are never shown)
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in self.shown_args() {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn shown_args(&self) -> impl Iterator<Item = &str> {
        self.args.iter().enumerate().map(|(i, arg)| {
            if self.masked.contains(&i) {
                MASK
            } else {
                arg.as_str()
            }
        })
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.shown_args().collect::<Vec<_>>())
            .field("stdin", &self.stdin)
            .field("current_dir", &self.current_dir)
            .finish()
    }
}

/// Captured result of a finished subprocess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run to completion with stdout and stderr captured
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput>;

    /// Run attached to the current terminal and return its exit code
    async fn run_attached(&self, invocation: &Invocation) -> std::io::Result<Option<i32>>;
}

/// Runner backed by real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(ref dir) = invocation.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput> {
        debug!("$ {}", invocation.display());

        let mut cmd = Self::command(invocation);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd.stdin(if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = cmd.spawn()?;

        if let Some(ref input) = invocation.stdin {
            if let Some(mut stdin) = child.stdin.take() {
                // A child that exits without reading stdin still has a real
                // exit code and stderr to report.
                match stdin.write_all(input.expose().as_bytes()).await {
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                        debug!("{} closed stdin early", invocation.program);
                    }
                    result => result?,
                }
                drop(stdin);
            }
        }

        let output = child.wait_with_output().await?;
        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn run_attached(&self, invocation: &Invocation) -> std::io::Result<Option<i32>> {
        debug!("$ {}", invocation.display());

        let status = Self::command(invocation)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;
        Ok(status.code())
    }
}
