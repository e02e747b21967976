//! # Deployment Configuration
//!
//! Layered loading: `deploy.yaml` → environment variables → defaults.
//!
//! 1. **File** (`$DEPLOY_CONFIG`, else `./deploy.yaml` if present)
//!    ```yaml
//!    image:
//!      name: notq-ai
//!      tag: latest
//!      context: .
//!    registry:
//!      host: swr.example.com
//!      namespace: notq
//!    launch:
//!      stl: [streamlit, run, streamlit.py]
//!      main: [python, main.py]
//!    ```
//! 2. **Environment** overrides any file value (see [`keys`]). Empty
//!    variables count as unset.
//!
//! Registry credentials are never part of this file; they come from a
//! [`CredentialProvider`](crate::infrastructure::CredentialProvider).
//!
//! Values are validated when an operation needs them, so `stl` works
//! without any registry settings.

mod image;
mod launch;
mod registry;

pub use image::ImageConfig;
pub use launch::LaunchConfig;
pub use registry::RegistryConfig;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::{ImageRef, RegistryCoordinates, RemoteImageRef};
use crate::error::ConfigError;
use crate::infrastructure::{BuildSpec, CredentialSource};

/// Environment variable names
pub mod keys {
    pub const DEPLOY_CONFIG: &str = "DEPLOY_CONFIG";
    pub const IMAGE_NAME: &str = "IMAGE_NAME";
    pub const IMAGE_TAG: &str = "IMAGE_TAG";
    pub const BUILD_CONTEXT: &str = "BUILD_CONTEXT";
    pub const DOCKERFILE: &str = "DOCKERFILE";
    pub const BUILD_PLATFORM: &str = "BUILD_PLATFORM";
    pub const SWR_REGISTRY: &str = "SWR_REGISTRY";
    pub const SWR_NAMESPACE: &str = "SWR_NAMESPACE";
    pub const SWR_USERNAME: &str = "SWR_USERNAME";
    pub const SWR_PASSWORD: &str = "SWR_PASSWORD";
    pub const SWR_CREDENTIALS: &str = "SWR_CREDENTIALS";
    /// Split on whitespace only; shell quoting is not interpreted. Use the
    /// list form under `launch:` in `deploy.yaml` for arguments with spaces.
    pub const STL_COMMAND: &str = "STL_COMMAND";
    /// Same splitting rules as [`STL_COMMAND`].
    pub const MAIN_COMMAND: &str = "MAIN_COMMAND";
    pub const APP_DIR: &str = "APP_DIR";
}

/// Config file read when `DEPLOY_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "deploy.yaml";

/// Build context used when none is configured
pub const DEFAULT_BUILD_CONTEXT: &str = ".";

pub(crate) type Lookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Deployment configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub launch: LaunchConfig,

    /// Credential provider used by `login`
    #[serde(default)]
    pub credentials: CredentialSource,
}

impl DeployConfig {
    /// Load from the config file (if any) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = match lookup(keys::DEPLOY_CONFIG) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    debug!("No {} found, using environment only", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        config.apply_env(&lookup)?;
        Ok(config)
    }

    /// Parse a config file; relative paths inside it resolve against its directory
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            message: format!("{}: {}", path.display(), e),
        })?;

        let mut config = Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::ParseError { message } => ConfigError::ParseError {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.image.context = config.image.context.map(|p| rebase(base, p));
        config.launch.workdir = config.launch.workdir.map(|p| rebase(base, p));

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }

    fn apply_env(&mut self, lookup: &Lookup<'_>) -> Result<(), ConfigError> {
        self.image.apply_env(lookup);
        self.registry.apply_env(lookup);
        self.launch.apply_env(lookup);
        if let Some(v) = lookup(keys::SWR_CREDENTIALS) {
            self.credentials = v.parse()?;
        }
        Ok(())
    }

    /// Validated local image identity
    pub fn image_ref(&self) -> Result<ImageRef, ConfigError> {
        ImageRef::new(
            self.image.name.clone().unwrap_or_default(),
            self.image.tag.clone().unwrap_or_default(),
        )
    }

    /// Validated registry host and namespace
    pub fn coordinates(&self) -> Result<RegistryCoordinates, ConfigError> {
        RegistryCoordinates::new(
            self.registry.host.clone().unwrap_or_default(),
            self.registry.namespace.clone().unwrap_or_default(),
        )
    }

    /// Fully-qualified reference, derived fresh on every call
    pub fn remote_ref(&self) -> Result<RemoteImageRef, ConfigError> {
        Ok(self.coordinates()?.remote_ref(&self.image_ref()?))
    }

    /// Build inputs; the paths are checked when the build runs
    pub fn build_spec(&self) -> BuildSpec {
        let context = self
            .image
            .context
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_CONTEXT));
        BuildSpec {
            dockerfile: self.image.dockerfile.clone(),
            platform: self.image.platform.clone(),
            ..BuildSpec::new(context)
        }
    }
}

fn rebase(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::LaunchTarget;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_env_only() {
        let config = DeployConfig::load_with(env(&[
            ("IMAGE_NAME", "notq-ai"),
            ("SWR_REGISTRY", "swr.example.com"),
            ("SWR_NAMESPACE", "notq"),
        ]))
        .unwrap();

        assert_eq!(config.image_ref().unwrap().to_string(), "notq-ai:latest");
        assert_eq!(
            config.remote_ref().unwrap().to_string(),
            "swr.example.com/notq/notq-ai:latest"
        );
        assert_eq!(config.credentials, CredentialSource::Env);
        assert_eq!(config.build_spec().context, PathBuf::from("."));
    }

    #[test]
    fn test_missing_values_reported_on_use() {
        let config = DeployConfig::load_with(env(&[("IMAGE_NAME", "notq-ai")])).unwrap();
        assert!(config.image_ref().is_ok());
        let err = config.coordinates().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field } if field == "SWR_REGISTRY"));
    }

    #[test]
    fn test_empty_env_counts_as_unset() {
        let config = DeployConfig::load_with(env(&[("IMAGE_NAME", "notq-ai"), ("IMAGE_TAG", "")]))
            .unwrap();
        assert_eq!(config.image_ref().unwrap().tag(), "latest");
    }

    #[test]
    fn test_file_then_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.yaml");
        std::fs::write(
            &path,
            r#"
image:
  name: notq-ai
  tag: v1
  context: app
  platform: linux/amd64
registry:
  host: swr.example.com
  namespace: notq
launch:
  main: [uvicorn, "main:app"]
credentials: prompt
"#,
        )
        .unwrap();

        let config = DeployConfig::load_with(env(&[
            ("DEPLOY_CONFIG", path.to_str().unwrap()),
            ("IMAGE_TAG", "v2"),
        ]))
        .unwrap();

        assert_eq!(config.image_ref().unwrap().to_string(), "notq-ai:v2");
        assert_eq!(config.build_spec().context, dir.path().join("app"));
        assert_eq!(config.build_spec().platform.as_deref(), Some("linux/amd64"));
        assert_eq!(config.launch.command(LaunchTarget::Main), ["uvicorn", "main:app"]);
        assert_eq!(
            config.launch.command(LaunchTarget::Stl),
            ["streamlit", "run", "streamlit.py"]
        );
        assert_eq!(config.credentials, CredentialSource::Prompt);
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let err = DeployConfig::load_with(env(&[("DEPLOY_CONFIG", "/nonexistent/deploy.yaml")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_secrets_rejected_in_file() {
        let err = DeployConfig::from_yaml(
            "registry:\n  host: swr.example.com\n  namespace: notq\n  password: hunter2\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_launch_commands_from_env() {
        let config = DeployConfig::load_with(env(&[
            ("STL_COMMAND", "streamlit run app.py --server.port 8501"),
            ("APP_DIR", "/srv/notq"),
        ]))
        .unwrap();
        assert_eq!(
            config.launch.command(LaunchTarget::Stl),
            ["streamlit", "run", "app.py", "--server.port", "8501"]
        );
        assert_eq!(config.launch.workdir, Some(PathBuf::from("/srv/notq")));
    }

    #[test]
    fn test_invalid_credential_source() {
        let err = DeployConfig::load_with(env(&[("SWR_CREDENTIALS", "vault")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = DeployConfig::from_yaml("").unwrap();
        assert!(config.image.name.is_none());
        assert_eq!(config.launch.command(LaunchTarget::Main), ["python", "main.py"]);
    }
}
