//! Local entry point commands for `stl` and `main`.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

use super::{keys, Lookup};
use crate::infrastructure::LaunchTarget;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchConfig {
    /// Command for the Streamlit app
    #[serde(default = "default_stl")]
    pub stl: Vec<String>,

    /// Command for the API process
    #[serde(default = "default_main")]
    pub main: Vec<String>,

    /// Directory the commands run in (current directory when unset)
    #[serde(default)]
    pub workdir: Option<PathBuf>,
}

fn default_stl() -> Vec<String> {
    vec!["streamlit".into(), "run".into(), "streamlit.py".into()]
}

fn default_main() -> Vec<String> {
    vec!["python".into(), "main.py".into()]
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            stl: default_stl(),
            main: default_main(),
            workdir: None,
        }
    }
}

impl LaunchConfig {
    pub fn command(&self, target: LaunchTarget) -> &[String] {
        match target {
            LaunchTarget::Stl => &self.stl,
            LaunchTarget::Main => &self.main,
        }
    }

    pub(super) fn apply_env(&mut self, lookup: &Lookup<'_>) {
        if let Some(v) = lookup(keys::STL_COMMAND) {
            self.stl = split_command(keys::STL_COMMAND, &v);
        }
        if let Some(v) = lookup(keys::MAIN_COMMAND) {
            self.main = split_command(keys::MAIN_COMMAND, &v);
        }
        if let Some(v) = lookup(keys::APP_DIR) {
            self.workdir = Some(PathBuf::from(v));
        }
    }
}

/// Whitespace split; quotes are kept as literal characters
fn split_command(key: &str, line: &str) -> Vec<String> {
    if line.contains(['"', '\'']) {
        warn!(
            "{} is split on whitespace; quotes are passed through literally (use the launch list in deploy.yaml instead)",
            key
        );
    }
    line.split_whitespace().map(str::to_string).collect()
}
