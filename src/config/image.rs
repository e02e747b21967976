//! Image build configuration.

use serde::Deserialize;
use std::path::PathBuf;

use super::{keys, Lookup};

/// Image identity and build inputs
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    /// Image name (e.g., "notq-ai")
    #[serde(default)]
    pub name: Option<String>,

    /// Image tag, "latest" when unset
    #[serde(default)]
    pub tag: Option<String>,

    /// Build context directory
    #[serde(default)]
    pub context: Option<PathBuf>,

    /// Dockerfile path, relative to the context unless absolute
    #[serde(default)]
    pub dockerfile: Option<PathBuf>,

    /// Target platform passed to `--platform` (e.g., "linux/amd64")
    #[serde(default)]
    pub platform: Option<String>,
}

impl ImageConfig {
    pub(super) fn apply_env(&mut self, lookup: &Lookup<'_>) {
        if let Some(v) = lookup(keys::IMAGE_NAME) {
            self.name = Some(v);
        }
        if let Some(v) = lookup(keys::IMAGE_TAG) {
            self.tag = Some(v);
        }
        if let Some(v) = lookup(keys::BUILD_CONTEXT) {
            self.context = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup(keys::DOCKERFILE) {
            self.dockerfile = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup(keys::BUILD_PLATFORM) {
            self.platform = Some(v);
        }
    }
}
