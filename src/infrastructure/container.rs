//! Container client operations
//!
//! Wraps the `docker` CLI for build, tag, login and push. Each operation is a
//! single subprocess; a non-zero exit becomes the matching [`PipelineError`]
//! carrying the exit code and captured stderr.

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::domain::{Credentials, ImageRef, RegistryCoordinates, RemoteImageRef};
use crate::error::PipelineError;
use crate::infrastructure::process::{Invocation, ProcessOutput, ProcessRunner};
use crate::tools;

/// Build inputs: context directory, Dockerfile and target platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSpec {
    pub context: PathBuf,
    /// Relative paths resolve against the context; `None` means the context's `Dockerfile`
    pub dockerfile: Option<PathBuf>,
    pub platform: Option<String>,
}

impl BuildSpec {
    pub fn new(context: impl Into<PathBuf>) -> Self {
        Self {
            context: context.into(),
            dockerfile: None,
            platform: None,
        }
    }

    /// Check the context and Dockerfile exist, returning absolute paths
    pub fn resolve(&self) -> Result<ResolvedBuild, PipelineError> {
        let context = self
            .context
            .canonicalize()
            .map_err(|e| {
                build_input_error(format!(
                    "build context {} not found: {}",
                    self.context.display(),
                    e
                ))
            })?;
        if !context.is_dir() {
            return Err(build_input_error(format!(
                "build context {} is not a directory",
                context.display()
            )));
        }

        let dockerfile = match self.dockerfile {
            Some(ref path) if path.is_absolute() => path.clone(),
            Some(ref path) => context.join(path),
            None => ["Dockerfile", "dockerfile"]
                .iter()
                .map(|name| context.join(name))
                .find(|p| p.is_file())
                .unwrap_or_else(|| context.join("Dockerfile")),
        };
        if !dockerfile.is_file() {
            return Err(build_input_error(format!(
                "Dockerfile not found at {}",
                dockerfile.display()
            )));
        }

        Ok(ResolvedBuild {
            explicit_dockerfile: self.dockerfile.is_some(),
            context,
            dockerfile,
            platform: self.platform.clone(),
        })
    }
}

/// A [`BuildSpec`] whose paths have been checked
#[derive(Debug, Clone)]
pub struct ResolvedBuild {
    pub context: PathBuf,
    pub dockerfile: PathBuf,
    pub platform: Option<String>,
    explicit_dockerfile: bool,
}

fn build_input_error(message: String) -> PipelineError {
    PipelineError::Build {
        code: None,
        stderr: message,
    }
}

/// Registry session established by `docker login`
///
/// The token itself lives in the container client's credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub host: String,
}

/// Outcome of a successful push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushResult {
    pub reference: RemoteImageRef,
    /// Manifest digest as reported by the client, when present
    pub digest: Option<String>,
}

fn digest_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"digest: (sha256:[0-9a-f]{64})").expect("valid regex"))
}

/// Extract the manifest digest from `docker push` output
pub fn parse_push_digest(output: &str) -> Option<String> {
    digest_pattern()
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Client for container image operations
pub struct ContainerClient<R> {
    runner: R,
    binary: String,
}

impl<R: ProcessRunner> ContainerClient<R> {
    /// Create a client using `DOCKER_BIN` or `docker` from PATH
    pub fn new(runner: R) -> Self {
        Self::with_binary(runner, tools::get_tool_path(tools::names::DOCKER))
    }

    pub fn with_binary(runner: R, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    #[cfg(test)]
    pub fn runner_ref(&self) -> &R {
        &self.runner
    }

    /// Build `image` from the build context
    ///
    /// Rebuilding with identical inputs simply replaces the local tag.
    pub async fn build(&self, image: &ImageRef, spec: &BuildSpec) -> Result<ImageRef, PipelineError> {
        let resolved = spec.resolve()?;
        info!("📂 Build context: {}", resolved.context.display());

        let mut inv = Invocation::new(&self.binary).args(["build", "-t"]).arg(image.to_string());
        if resolved.explicit_dockerfile {
            inv = inv.arg("-f").arg(resolved.dockerfile.display().to_string());
        }
        if let Some(ref platform) = resolved.platform {
            inv = inv.arg("--platform").arg(platform.as_str());
        }
        inv = inv.arg(resolved.context.display().to_string());

        let output = self
            .execute(&inv, &format!("Building {}...", image))
            .await
            .map_err(|(code, stderr)| PipelineError::Build { code, stderr })?;
        log_output(&output);

        info!("✅ Built {}", image);
        Ok(image.clone())
    }

    /// Point the registry-qualified reference at the local image
    pub async fn tag(
        &self,
        local: &ImageRef,
        coordinates: &RegistryCoordinates,
    ) -> Result<RemoteImageRef, PipelineError> {
        let remote = coordinates.remote_ref(local);
        let inv = Invocation::new(&self.binary)
            .arg("tag")
            .arg(local.to_string())
            .arg(remote.to_string());

        self.execute(&inv, &format!("Tagging {}...", remote))
            .await
            .map_err(|(code, stderr)| PipelineError::Tag { code, stderr })?;

        info!("✅ Tagged {} → {}", local, remote);
        Ok(remote)
    }

    /// Authenticate against `host`
    ///
    /// Empty credentials are rejected before any process is started. The
    /// password is handed over on stdin, never on the command line, and the
    /// username is masked wherever the command is logged.
    pub async fn login(&self, host: &str, credentials: &Credentials) -> Result<AuthSession, PipelineError> {
        let missing = credentials.missing_fields();
        if !missing.is_empty() {
            return Err(PipelineError::Auth {
                code: None,
                stderr: format!("{} must be set and non-empty", missing.join(" and ")),
            });
        }

        let inv = Invocation::new(&self.binary)
            .args(["login", host, "--username"])
            .sensitive_arg(credentials.username.as_str())
            .arg("--password-stdin")
            .stdin(credentials.password.clone());

        self.execute(&inv, &format!("Logging in to {}...", host))
            .await
            .map_err(|(code, stderr)| PipelineError::Auth { code, stderr })?;

        info!("✅ Logged in to {}", host);
        Ok(AuthSession {
            host: host.to_string(),
        })
    }

    /// Upload the tagged image
    pub async fn push(&self, remote: &RemoteImageRef) -> Result<PushResult, PipelineError> {
        let inv = Invocation::new(&self.binary).arg("push").arg(remote.to_string());

        let output = self
            .execute(&inv, &format!("Pushing {}...", remote))
            .await
            .map_err(|(code, stderr)| PipelineError::Push { code, stderr })?;
        log_output(&output);

        let digest = parse_push_digest(&output.stdout);
        match digest {
            Some(ref d) => info!("✅ Pushed {} ({})", remote, d),
            None => info!("✅ Pushed {}", remote),
        }
        Ok(PushResult {
            reference: remote.clone(),
            digest,
        })
    }

    /// Run one client command behind a spinner; failures come back as (code, stderr)
    async fn execute(
        &self,
        inv: &Invocation,
        message: &str,
    ) -> Result<ProcessOutput, (Option<i32>, String)> {
        info!("$ {}", inv.display());

        let spinner = crate::ui::spinner(message);
        let result = self.runner.run(inv).await;
        spinner.finish_and_clear();

        match result {
            Ok(output) if output.success() => Ok(output),
            Ok(output) => {
                let stderr = output.stderr.trim();
                let stderr = if stderr.is_empty() {
                    output.stdout.trim()
                } else {
                    stderr
                };
                Err((output.code, stderr.to_string()))
            }
            Err(e) => Err((None, spawn_failure(&self.binary, &e))),
        }
    }
}

fn spawn_failure(binary: &str, err: &std::io::Error) -> String {
    if err.kind() == std::io::ErrorKind::NotFound && tools::locate(binary).is_none() {
        format!(
            "`{}` not found on PATH (install it or set {}_BIN)",
            binary,
            tools::names::DOCKER.to_uppercase()
        )
    } else {
        format!("failed to run `{}`: {}", binary, err)
    }
}

fn log_output(output: &ProcessOutput) {
    for line in output.stdout.lines().chain(output.stderr.lines()) {
        debug!("   {}", line);
    }
}
