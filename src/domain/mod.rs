//! Domain layer - pure business logic
//!
//! This module contains business logic with no external I/O.
//! Types and functions here can be unit tested without mocking.

pub mod credentials;
pub mod image;
pub mod pipeline;

// Re-export commonly used types
pub use credentials::{Credentials, Secret};
pub use image::{ImageRef, RegistryCoordinates, RemoteImageRef};
pub use pipeline::{PipelineState, PipelineStep, StepResult};
