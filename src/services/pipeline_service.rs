//! Pipeline service - orchestrates the deployment pipeline
//!
//! Runs build → tag → login → push in order. The first failure stops the
//! run and is returned as-is: nothing is retried and nothing done by earlier
//! steps is undone.

use colored::Colorize;
use std::time::Instant;
use tracing::info;

use crate::domain::{
    ImageRef, PipelineState, PipelineStep, RegistryCoordinates, RemoteImageRef, StepResult,
};
use crate::error::PipelineError;
use crate::infrastructure::{
    AuthSession, BuildSpec, ContainerClient, CredentialProvider, ProcessRunner, PushResult,
};

/// Everything a pipeline run needs to know about the image
#[derive(Debug, Clone)]
pub struct PipelineTarget {
    pub image: ImageRef,
    pub build: BuildSpec,
    pub registry: RegistryCoordinates,
}

impl PipelineTarget {
    pub fn remote_ref(&self) -> RemoteImageRef {
        self.registry.remote_ref(&self.image)
    }
}

/// Outcome of a completed `deploy`
#[derive(Debug)]
pub struct DeployReport {
    pub results: Vec<StepResult>,
    pub pushed: PushResult,
}

/// Values produced by earlier steps for later ones
#[derive(Default)]
struct RunState {
    built: Option<ImageRef>,
    tagged: Option<RemoteImageRef>,
    pushed: Option<PushResult>,
}

/// Service for running pipeline steps
pub struct PipelineService<R> {
    client: ContainerClient<R>,
    credentials: Box<dyn CredentialProvider>,
}

impl<R: ProcessRunner> PipelineService<R> {
    pub fn new(client: ContainerClient<R>, credentials: Box<dyn CredentialProvider>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    pub async fn build(&self, image: &ImageRef, spec: &BuildSpec) -> Result<ImageRef, PipelineError> {
        self.client.build(image, spec).await
    }

    pub async fn tag(
        &self,
        local: &ImageRef,
        registry: &RegistryCoordinates,
    ) -> Result<RemoteImageRef, PipelineError> {
        self.client.tag(local, registry).await
    }

    /// Log in to `host` with freshly supplied credentials
    pub async fn login(&self, host: &str) -> Result<AuthSession, PipelineError> {
        let credentials = self.credentials.credentials()?;
        self.client.login(host, &credentials).await
    }

    pub async fn push(&self, remote: &RemoteImageRef) -> Result<PushResult, PipelineError> {
        self.client.push(remote).await
    }

    /// Run the full pipeline
    pub async fn deploy(&self, target: &PipelineTarget) -> Result<DeployReport, PipelineError> {
        self.print_plan(target);

        let mut results = Vec::new();
        let mut run = RunState::default();
        let mut state = PipelineState::Idle;

        while let Some(step) = state.next_step() {
            info!("{} Starting: {}", step.emoji(), step.name());

            let start = Instant::now();
            let result = self.execute_step(target, step, &mut run).await;
            let duration = start.elapsed();

            match result {
                Ok(()) => {
                    info!(
                        "{} {} completed in {:.1}s",
                        "✅".green(),
                        step.name(),
                        duration.as_secs_f64()
                    );
                    results.push(StepResult::success(step, duration));
                    state = match state.complete(step) {
                        Some(next) => next,
                        None => break,
                    };
                }
                Err(e) => {
                    info!("{} {} failed: {}", "❌".red(), step.name(), e);
                    results.push(StepResult::failure(step, duration, e.stderr()));
                    if let Some(failed) = state.fail(step) {
                        state = failed;
                    }

                    // Stop on first failure
                    self.print_summary(target, &results, state);
                    return Err(e);
                }
            }
        }

        debug_assert!(state.is_terminal());
        self.print_summary(target, &results, state);

        match run.pushed {
            Some(pushed) => Ok(DeployReport { results, pushed }),
            None => Err(PipelineError::Push {
                code: None,
                stderr: "pipeline ended without a push".to_string(),
            }),
        }
    }

    async fn execute_step(
        &self,
        target: &PipelineTarget,
        step: PipelineStep,
        run: &mut RunState,
    ) -> Result<(), PipelineError> {
        match step {
            PipelineStep::Build => {
                run.built = Some(self.build(&target.image, &target.build).await?);
            }
            PipelineStep::Tag => {
                let local = run.built.as_ref().unwrap_or(&target.image);
                run.tagged = Some(self.tag(local, &target.registry).await?);
            }
            PipelineStep::Login => {
                self.login(target.registry.host()).await?;
            }
            PipelineStep::Push => {
                let remote = run.tagged.clone().unwrap_or_else(|| target.remote_ref());
                run.pushed = Some(self.push(&remote).await?);
            }
        }
        Ok(())
    }

    fn print_plan(&self, target: &PipelineTarget) {
        crate::ui::print_header(&format!("Deploy: {}", target.image));
        info!("Image:    {} (tag {})", target.image.name(), target.image.tag());
        info!(
            "Registry: {} (namespace {})",
            target.registry.host(),
            target.registry.namespace()
        );
        info!("Target:   {}", target.remote_ref());
        info!("Client:   {}", self.client.binary());
        info!(
            "Steps:    {}",
            PipelineStep::ALL
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(" → ")
        );
        println!();
    }

    fn print_summary(&self, target: &PipelineTarget, results: &[StepResult], state: PipelineState) {
        println!();
        println!(
            "{}",
            "════════════════════════════════════════════════════════════".bright_blue()
        );

        match state {
            PipelineState::Pushed => {
                println!(
                    "{}",
                    format!("✅ Deployed: {}", target.remote_ref()).bright_green().bold()
                );
            }
            PipelineState::Failed(step) => {
                println!(
                    "{}",
                    format!("❌ Deploy failed at {}: {}", step.name(), target.image)
                        .bright_red()
                        .bold()
                );
            }
            _ => {}
        }

        println!();
        for result in results {
            let status = if result.success { "✅" } else { "❌" };
            println!(
                "   {} {} ({:.1}s)",
                status,
                result.step.name(),
                result.duration.as_secs_f64()
            );
            if let Some(ref message) = result.message {
                println!("      {}", message.dimmed());
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Credentials;
    use crate::infrastructure::process::testing::RecordingRunner;
    use crate::infrastructure::process::Invocation;

    fn target(context: &std::path::Path) -> PipelineTarget {
        PipelineTarget {
            image: ImageRef::new("notq-ai", "latest").unwrap(),
            build: BuildSpec::new(context),
            registry: RegistryCoordinates::new("swr.example.com", "notq").unwrap(),
        }
    }

    fn context_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Dockerfile"), "FROM python:3.11-slim\n").unwrap();
        dir
    }

    fn service(runner: RecordingRunner, creds: Credentials) -> PipelineService<RecordingRunner> {
        PipelineService::new(ContainerClient::with_binary(runner, "docker"), Box::new(creds))
    }

    fn calls(service: &PipelineService<RecordingRunner>) -> Vec<Invocation> {
        service.client.runner_ref().calls()
    }

    #[tokio::test]
    async fn test_deploy_call_sequence() {
        let dir = context_dir();
        let svc = service(RecordingRunner::new(), Credentials::new("user", "pass"));

        let report = svc.deploy(&target(dir.path())).await.unwrap();
        assert_eq!(
            report.pushed.reference.to_string(),
            "swr.example.com/notq/notq-ai:latest"
        );
        assert_eq!(report.results.len(), 4);
        assert!(report.results.iter().all(|r| r.success));

        let calls = calls(&svc);
        let context = dir.path().canonicalize().unwrap().display().to_string();
        let args: Vec<Vec<String>> = calls.iter().map(|c| c.args.clone()).collect();
        assert_eq!(
            args,
            vec![
                vec!["build", "-t", "notq-ai:latest", context.as_str()],
                vec!["tag", "notq-ai:latest", "swr.example.com/notq/notq-ai:latest"],
                vec!["login", "swr.example.com", "--username", "user", "--password-stdin"],
                vec!["push", "swr.example.com/notq/notq-ai:latest"],
            ]
            .into_iter()
            .map(|v| v.into_iter().map(String::from).collect::<Vec<String>>())
            .collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_failing_build_stops_pipeline() {
        let dir = context_dir();
        let runner = RecordingRunner::new().then_fail(1, "failed to solve");
        let svc = service(runner, Credentials::new("user", "pass"));

        let err = svc.deploy(&target(dir.path())).await.unwrap_err();
        assert!(matches!(err, PipelineError::Build { code: Some(1), .. }));
        assert_eq!(svc.client.runner_ref().subcommands(), vec!["build"]);
    }

    #[tokio::test]
    async fn test_missing_build_context_stops_pipeline() {
        let svc = service(RecordingRunner::new(), Credentials::new("user", "pass"));
        let err = svc
            .deploy(&target(std::path::Path::new("/nonexistent/context")))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Build { code: None, .. }));
        assert!(calls(&svc).is_empty());
    }

    #[tokio::test]
    async fn test_failed_step_result_keeps_client_stderr() {
        let dir = context_dir();
        let runner = RecordingRunner::new()
            .then_ok()
            .then_fail(1, "Error response from daemon: No such image: notq-ai:latest");
        let svc = service(runner, Credentials::new("user", "pass"));

        let err = svc.deploy(&target(dir.path())).await.unwrap_err();
        assert!(matches!(err, PipelineError::Tag { code: Some(1), .. }));
        assert_eq!(
            err.stderr(),
            "Error response from daemon: No such image: notq-ai:latest"
        );
        assert_eq!(svc.client.runner_ref().subcommands(), vec!["build", "tag"]);
    }

    #[tokio::test]
    async fn test_failing_login_never_pushes() {
        let dir = context_dir();
        let runner = RecordingRunner::new()
            .then_ok()
            .then_ok()
            .then_fail(1, "unauthorized: authentication required");
        let svc = service(runner, Credentials::new("user", "wrong"));

        let err = svc.deploy(&target(dir.path())).await.unwrap_err();
        assert!(matches!(err, PipelineError::Auth { code: Some(1), .. }));
        assert_eq!(
            svc.client.runner_ref().subcommands(),
            vec!["build", "tag", "login"]
        );
    }

    #[tokio::test]
    async fn test_empty_credentials_fail_before_login_process() {
        let dir = context_dir();
        let svc = service(RecordingRunner::new(), Credentials::new("", ""));

        let err = svc.deploy(&target(dir.path())).await.unwrap_err();
        assert!(matches!(err, PipelineError::Auth { code: None, .. }));
        assert_eq!(svc.client.runner_ref().subcommands(), vec!["build", "tag"]);
    }

    #[tokio::test]
    async fn test_failing_push_is_not_retried() {
        let dir = context_dir();
        let runner = RecordingRunner::new()
            .then_ok()
            .then_ok()
            .then_ok()
            .then_fail(1, "net/http: TLS handshake timeout");
        let svc = service(runner, Credentials::new("user", "pass"));

        let err = svc.deploy(&target(dir.path())).await.unwrap_err();
        assert_eq!(err.code(), Some(1));
        assert!(matches!(err, PipelineError::Push { .. }));
        assert_eq!(
            svc.client.runner_ref().subcommands(),
            vec!["build", "tag", "login", "push"]
        );
    }

    #[tokio::test]
    async fn test_single_operations() {
        let svc = service(RecordingRunner::new(), Credentials::new("user", "pass"));
        let t = target(std::path::Path::new("."));

        let remote = svc.tag(&t.image, &t.registry).await.unwrap();
        assert_eq!(remote, t.remote_ref());
        let session = svc.login("swr.example.com").await.unwrap();
        assert_eq!(session.host, "swr.example.com");
        let pushed = svc.push(&remote).await.unwrap();
        assert_eq!(pushed.reference, remote);

        assert_eq!(svc.client.runner_ref().subcommands(), vec!["tag", "login", "push"]);
    }
}
