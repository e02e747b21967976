//! Runtime tool path resolution
//!
//! For each external tool (e.g. `docker`) we:
//! 1. Check for an environment variable `{TOOL}_BIN` (e.g. `DOCKER_BIN`)
//! 2. Fall back to PATH-based invocation if the envvar is not set
//!
//! This lets CI point at a specific client (or `podman`) without code changes.

use std::env;
use std::path::PathBuf;

/// Get the path to an external tool
///
/// Checks for an environment variable `{TOOL}_BIN` (uppercase tool name + "_BIN").
/// Falls back to the tool name itself if the envvar is not set, which relies on PATH.
pub fn get_tool_path(tool: &str) -> String {
    get_tool_path_with(tool, |key| env::var(key).ok())
}

fn get_tool_path_with(tool: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let env_var = format!("{}_BIN", tool.to_uppercase().replace('-', "_"));
    lookup(&env_var)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| tool.to_string())
}

/// Locate an executable, returning its absolute path if it can be found
///
/// Explicit paths are checked as-is; bare names are searched on PATH.
pub fn locate(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

/// Common tool names
pub mod names {
    pub const DOCKER: &str = "docker";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_tool_path_from_env() {
        let path = get_tool_path_with("docker", |key| {
            (key == "DOCKER_BIN").then(|| "/usr/local/bin/podman".to_string())
        });
        assert_eq!(path, "/usr/local/bin/podman");
    }

    #[test]
    fn test_get_tool_path_fallback() {
        assert_eq!(get_tool_path_with("docker", |_| None), "docker");
    }

    #[test]
    fn test_empty_override_ignored() {
        let path = get_tool_path_with("docker", |_| Some("  ".to_string()));
        assert_eq!(path, "docker");
    }

    #[test]
    fn test_dashed_tool_name() {
        let path = get_tool_path_with("docker-compose", |key| {
            (key == "DOCKER_COMPOSE_BIN").then(|| "/opt/compose".to_string())
        });
        assert_eq!(path, "/opt/compose");
    }

    #[test]
    fn test_locate_missing_program() {
        assert!(locate("definitely-not-a-real-binary-7f3a").is_none());
    }
}
