//! Deployment pipeline domain types
//!
//! Defines the build → tag → login → push workflow as a state machine.
//! No transition skips a step; `Pushed` and `Failed` are terminal.

use std::time::Duration;

/// Individual steps of the deployment pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    /// Build the container image from the build context
    Build,
    /// Add the registry-qualified reference to the local image
    Tag,
    /// Authenticate the container client against the registry
    Login,
    /// Upload the tagged image
    Push,
}

impl PipelineStep {
    /// Canonical order used by `deploy`
    pub const ALL: [PipelineStep; 4] = [Self::Build, Self::Tag, Self::Login, Self::Push];

    /// Get human-readable name for the step
    pub fn name(&self) -> &'static str {
        match self {
            Self::Build => "Build",
            Self::Tag => "Tag",
            Self::Login => "Login",
            Self::Push => "Push",
        }
    }

    /// Get emoji for the step
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Build => "🔨",
            Self::Tag => "🏷️",
            Self::Login => "🔑",
            Self::Push => "📤",
        }
    }
}

/// Where a pipeline run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Built,
    Tagged,
    Authenticated,
    Pushed,
    /// Failed at a specific step
    Failed(PipelineStep),
}

impl PipelineState {
    /// The step that must run next, or `None` in a terminal state
    pub fn next_step(&self) -> Option<PipelineStep> {
        match self {
            Self::Idle => Some(PipelineStep::Build),
            Self::Built => Some(PipelineStep::Tag),
            Self::Tagged => Some(PipelineStep::Login),
            Self::Authenticated => Some(PipelineStep::Push),
            Self::Pushed | Self::Failed(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next_step().is_none()
    }

    /// Transition after `step` succeeded
    ///
    /// Returns `None` if `step` is not the one this state expects.
    pub fn complete(self, step: PipelineStep) -> Option<Self> {
        if self.next_step() != Some(step) {
            return None;
        }
        Some(match step {
            PipelineStep::Build => Self::Built,
            PipelineStep::Tag => Self::Tagged,
            PipelineStep::Login => Self::Authenticated,
            PipelineStep::Push => Self::Pushed,
        })
    }

    /// Transition after `step` failed
    pub fn fail(self, step: PipelineStep) -> Option<Self> {
        if self.next_step() != Some(step) {
            return None;
        }
        Some(Self::Failed(step))
    }
}

/// Result of a pipeline step execution
#[derive(Debug)]
pub struct StepResult {
    pub step: PipelineStep,
    pub success: bool,
    pub duration: Duration,
    pub message: Option<String>,
}

impl StepResult {
    pub fn success(step: PipelineStep, duration: Duration) -> Self {
        Self {
            step,
            success: true,
            duration,
            message: None,
        }
    }

    pub fn failure(step: PipelineStep, duration: Duration, message: impl Into<String>) -> Self {
        Self {
            step,
            success: false,
            duration,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_path() {
        let mut state = PipelineState::Idle;
        for step in PipelineStep::ALL {
            assert_eq!(state.next_step(), Some(step));
            state = state.complete(step).unwrap();
        }
        assert_eq!(state, PipelineState::Pushed);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_no_step_skipping() {
        assert_eq!(PipelineState::Idle.complete(PipelineStep::Tag), None);
        assert_eq!(PipelineState::Built.complete(PipelineStep::Push), None);
        assert_eq!(PipelineState::Tagged.complete(PipelineStep::Build), None);
    }

    #[test]
    fn test_failure_is_terminal() {
        let failed = PipelineState::Tagged.fail(PipelineStep::Login).unwrap();
        assert_eq!(failed, PipelineState::Failed(PipelineStep::Login));
        assert!(failed.is_terminal());
        assert_eq!(failed.complete(PipelineStep::Push), None);
        assert_eq!(PipelineState::Pushed.fail(PipelineStep::Push), None);
    }

    #[test]
    fn test_step_names() {
        let names: Vec<_> = PipelineStep::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Build", "Tag", "Login", "Push"]);
    }
}
