//! Infrastructure layer - external I/O adapters
//!
//! This module contains all code that interacts with external systems:
//! - Child processes (container client, application entry points)
//! - Container client (`docker` build/tag/login/push)
//! - Credential sources (environment, terminal prompt)

pub mod container;
pub mod credentials;
pub mod launcher;
pub mod process;

// Re-export commonly used types
pub use container::{AuthSession, BuildSpec, ContainerClient, PushResult};
pub use credentials::{CredentialProvider, CredentialSource};
pub use launcher::{LaunchTarget, Launcher};
pub use process::{ProcessRunner, SystemRunner};
