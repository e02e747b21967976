//! Image reference domain types
//!
//! Local image identity (`name:tag`), registry coordinates (`host/namespace`)
//! and the fully-qualified remote reference derived from both.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::error::ConfigError;

/// Tag used when none is configured
pub const DEFAULT_TAG: &str = "latest";

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("valid regex"))
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:(?:\.|_|__|-+)[a-z0-9]+)*(?:/[a-z0-9]+(?:(?:\.|_|__|-+)[a-z0-9]+)*)*$")
            .expect("valid regex")
    })
}

/// Local image identity: `name:tag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    name: String,
    tag: String,
}

impl ImageRef {
    /// Validate and build an image identity
    ///
    /// An empty tag falls back to [`DEFAULT_TAG`].
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into().trim().to_string();
        let mut tag = tag.into().trim().to_string();

        if name.is_empty() {
            return Err(ConfigError::MissingField {
                field: "IMAGE_NAME".to_string(),
            });
        }
        if !name_pattern().is_match(&name) {
            return Err(ConfigError::InvalidValue {
                field: "IMAGE_NAME".to_string(),
                value: name,
            });
        }

        if tag.is_empty() {
            tag = DEFAULT_TAG.to_string();
        }
        if !tag_pattern().is_match(&tag) {
            return Err(ConfigError::InvalidValue {
                field: "IMAGE_TAG".to_string(),
                value: tag,
            });
        }

        Ok(Self { name, tag })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

/// Registry host and namespace the image is published under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryCoordinates {
    host: String,
    namespace: String,
}

impl RegistryCoordinates {
    pub fn new(host: impl Into<String>, namespace: impl Into<String>) -> Result<Self, ConfigError> {
        let host = host.into().trim().trim_end_matches('/').to_string();
        let namespace = namespace.into().trim().trim_matches('/').to_string();

        if host.is_empty() {
            return Err(ConfigError::MissingField {
                field: "SWR_REGISTRY".to_string(),
            });
        }
        if host.contains("://") || host.contains('/') || host.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                field: "SWR_REGISTRY".to_string(),
                value: host,
            });
        }

        if namespace.is_empty() {
            return Err(ConfigError::MissingField {
                field: "SWR_NAMESPACE".to_string(),
            });
        }
        if !name_pattern().is_match(&namespace) {
            return Err(ConfigError::InvalidValue {
                field: "SWR_NAMESPACE".to_string(),
                value: namespace,
            });
        }

        Ok(Self { host, namespace })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Derive the remote reference for a local image
    pub fn remote_ref(&self, image: &ImageRef) -> RemoteImageRef {
        RemoteImageRef {
            host: self.host.clone(),
            namespace: self.namespace.clone(),
            image: image.clone(),
        }
    }
}

/// Fully-qualified remote reference: `host/namespace/name:tag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteImageRef {
    host: String,
    namespace: String,
    image: ImageRef,
}

impl RemoteImageRef {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }
}

impl fmt::Display for RemoteImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.namespace, self.image)
    }
}
