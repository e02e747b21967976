//! Registry configuration for the published image.

use serde::Deserialize;

use super::{keys, Lookup};

/// Registry configuration for container images
///
/// Credentials are deliberately absent: unknown keys such as `password`
/// fail to parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Registry host (e.g., "swr.cn-north-4.myhuaweicloud.com")
    #[serde(default)]
    pub host: Option<String>,

    /// Organization/namespace under the host (e.g., "notq")
    #[serde(default)]
    pub namespace: Option<String>,
}

impl RegistryConfig {
    pub(super) fn apply_env(&mut self, lookup: &Lookup<'_>) {
        if let Some(v) = lookup(keys::SWR_REGISTRY) {
            self.host = Some(v);
        }
        if let Some(v) = lookup(keys::SWR_NAMESPACE) {
            self.namespace = Some(v);
        }
    }
}
