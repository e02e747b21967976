//! Local entry point launcher
//!
//! Runs one of the application's entry points attached to the terminal.
//! Not part of the deployment pipeline.

use std::fmt;
use std::path::Path;
use tracing::info;

use crate::error::LaunchError;
use crate::infrastructure::process::{Invocation, ProcessRunner};
use crate::tools;

/// Application entry points that can be started locally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTarget {
    /// Streamlit data app
    Stl,
    /// HTTP API process
    Main,
}

impl LaunchTarget {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Main => "main",
        }
    }
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Starts entry points through a [`ProcessRunner`]
pub struct Launcher<R> {
    runner: R,
}

impl<R: ProcessRunner> Launcher<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Run `command` (program followed by its arguments) until it exits
    pub async fn launch(
        &self,
        target: LaunchTarget,
        command: &[String],
        workdir: Option<&Path>,
    ) -> Result<(), LaunchError> {
        let (program, args) = command.split_first().ok_or_else(|| LaunchError::EmptyCommand {
            target: target.to_string(),
        })?;

        let mut inv = Invocation::new(program.as_str()).args(args.iter().cloned());
        if let Some(dir) = workdir {
            inv = inv.current_dir(dir);
        }

        info!("🚀 Starting {}: {}", target, inv.display());

        let code = self.runner.run_attached(&inv).await.map_err(|e| {
            let message = match tools::locate(program) {
                None if e.kind() == std::io::ErrorKind::NotFound => "not found on PATH".to_string(),
                _ => e.to_string(),
            };
            LaunchError::Spawn {
                program: program.clone(),
                message,
            }
        })?;

        if code == Some(0) {
            Ok(())
        } else {
            Err(LaunchError::Exited {
                target: target.to_string(),
                code,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::process::testing::RecordingRunner;

    fn cmd(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_launch_stl() {
        let launcher = Launcher::new(RecordingRunner::new());
        launcher
            .launch(LaunchTarget::Stl, &cmd(&["streamlit", "run", "streamlit.py"]), None)
            .await
            .unwrap();

        let calls = launcher.runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "streamlit");
        assert_eq!(calls[0].args, vec!["run", "streamlit.py"]);
        assert_eq!(calls[0].current_dir, None);
    }

    #[tokio::test]
    async fn test_launch_in_workdir() {
        let launcher = Launcher::new(RecordingRunner::new());
        launcher
            .launch(LaunchTarget::Main, &cmd(&["python", "main.py"]), Some(Path::new("/srv/app")))
            .await
            .unwrap();

        let calls = launcher.runner.calls();
        assert_eq!(calls[0].current_dir.as_deref(), Some(Path::new("/srv/app")));
    }

    #[tokio::test]
    async fn test_launch_propagates_exit_code() {
        let launcher = Launcher::new(RecordingRunner::new().then_fail(2, ""));
        let err = launcher
            .launch(LaunchTarget::Main, &cmd(&["python", "main.py"]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LaunchError::Exited { code: Some(2), .. }));
    }

    #[tokio::test]
    async fn test_launch_empty_command() {
        let launcher = Launcher::new(RecordingRunner::new());
        let err = launcher.launch(LaunchTarget::Stl, &[], None).await.unwrap_err();
        assert!(matches!(err, LaunchError::EmptyCommand { .. }));
        assert!(launcher.runner.calls().is_empty());
    }
}
