//! Registry credentials
//!
//! The password is wrapped in [`Secret`], which never prints its contents.

use std::fmt;

/// A string that must not end up in logs or error messages
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw value (only for handing to the container client)
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Username/password pair for `docker login`
///
/// Both halves are redacted in `Debug`; the username carries the access key ID.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Secret,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Secret::new(password),
        }
    }

    /// Names of the credential fields that are empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.username.trim().is_empty() {
            missing.push("SWR_USERNAME");
        }
        if self.password.is_empty() {
            missing.push("SWR_PASSWORD");
        }
        missing
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &"***")
            .field("password", &self.password)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_redacted() {
        let creds = Credentials::new("cn-north-4@AKID", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("AKID"));
        assert!(debug.contains("***"));
        assert_eq!(creds.password.to_string(), "***");
        assert_eq!(creds.password.expose(), "hunter2");
    }

    #[test]
    fn test_missing_fields() {
        assert!(Credentials::new("user", "pass").missing_fields().is_empty());
        assert_eq!(Credentials::new("", "pass").missing_fields(), vec!["SWR_USERNAME"]);
        assert_eq!(
            Credentials::new(" ", "").missing_fields(),
            vec!["SWR_USERNAME", "SWR_PASSWORD"]
        );
    }
}
