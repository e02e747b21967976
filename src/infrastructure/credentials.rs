//! Registry credential providers
//!
//! Credentials are injected at login time and never read from `deploy.yaml`.
//! - [`EnvCredentials`]: `SWR_USERNAME` / `SWR_PASSWORD`
//! - [`PromptCredentials`]: asks on the terminal, password input hidden

use serde::Deserialize;
use std::str::FromStr;

use crate::config::keys;
use crate::domain::Credentials;
use crate::error::{ConfigError, PipelineError};

/// Supplies registry credentials when `login` runs
pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> Result<Credentials, PipelineError>;
}

/// Which provider to use (`SWR_CREDENTIALS=env|prompt`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    #[default]
    Env,
    Prompt,
}

impl FromStr for CredentialSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "env" | "environment" => Ok(Self::Env),
            "prompt" | "interactive" => Ok(Self::Prompt),
            other => Err(ConfigError::InvalidValue {
                field: keys::SWR_CREDENTIALS.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl CredentialSource {
    pub fn provider(self) -> Box<dyn CredentialProvider> {
        match self {
            Self::Env => Box::new(EnvCredentials::new()),
            Self::Prompt => Box::new(PromptCredentials::new()),
        }
    }
}

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads credentials from environment variables
///
/// Missing variables produce empty fields; `login` rejects them before
/// starting the container client.
pub struct EnvCredentials {
    lookup: Lookup,
}

impl EnvCredentials {
    pub fn new() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> Result<Credentials, PipelineError> {
        let username = (self.lookup)(keys::SWR_USERNAME).unwrap_or_default();
        let password = (self.lookup)(keys::SWR_PASSWORD).unwrap_or_default();
        Ok(Credentials::new(username.trim(), password))
    }
}

/// Prompts on the controlling terminal
///
/// `SWR_USERNAME` is used as the username when set; the password is always
/// read with echo disabled.
#[derive(Debug, Default)]
pub struct PromptCredentials;

impl PromptCredentials {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialProvider for PromptCredentials {
    fn credentials(&self) -> Result<Credentials, PipelineError> {
        let term = console::Term::stderr();
        if !term.is_term() {
            return Err(prompt_error("no terminal available for credential prompt"));
        }

        let username = match std::env::var(keys::SWR_USERNAME) {
            Ok(u) if !u.trim().is_empty() => u,
            _ => {
                term.write_str("Registry username: ")
                    .map_err(|e| prompt_error(&e.to_string()))?;
                term.read_line().map_err(|e| prompt_error(&e.to_string()))?
            }
        };

        term.write_str("Registry password: ")
            .map_err(|e| prompt_error(&e.to_string()))?;
        let password = term
            .read_secure_line()
            .map_err(|e| prompt_error(&e.to_string()))?;

        Ok(Credentials::new(username.trim(), password))
    }
}

fn prompt_error(message: &str) -> PipelineError {
    PipelineError::Auth {
        code: None,
        stderr: message.to_string(),
    }
}

impl CredentialProvider for Credentials {
    fn credentials(&self) -> Result<Credentials, PipelineError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_credentials() {
        let provider = EnvCredentials::with_lookup(|key| match key {
            "SWR_USERNAME" => Some(" cn-north-4@AKID ".to_string()),
            "SWR_PASSWORD" => Some("s3cret".to_string()),
            _ => None,
        });
        let creds = provider.credentials().unwrap();
        assert_eq!(creds.username, "cn-north-4@AKID");
        assert_eq!(creds.password.expose(), "s3cret");
    }

    #[test]
    fn test_env_credentials_missing() {
        let provider = EnvCredentials::with_lookup(|_| None);
        let creds = provider.credentials().unwrap();
        assert_eq!(creds.missing_fields(), vec!["SWR_USERNAME", "SWR_PASSWORD"]);
    }

    #[test]
    fn test_credential_source_parse() {
        assert_eq!("env".parse::<CredentialSource>().unwrap(), CredentialSource::Env);
        assert_eq!("Prompt".parse::<CredentialSource>().unwrap(), CredentialSource::Prompt);
        assert!("vault".parse::<CredentialSource>().is_err());
    }

    #[test]
    fn test_static_credentials() {
        let creds = Credentials::new("user", "pass");
        assert_eq!(creds.credentials().unwrap().username, "user");
    }
}
