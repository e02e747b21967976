//! CLI definitions for notq-deploy
//!
//! Every operation is a zero-argument subcommand; inputs come from
//! `deploy.yaml` and the environment.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "notq-deploy",
    version,
    about = "Build, tag and push the notq-ai image to SWR",
    long_about = "Build, tag and push the notq-ai container image to an SWR registry,\n\
                  or start the app locally.\n\n\
                  Configuration: deploy.yaml (or $DEPLOY_CONFIG) overridden by\n\
                  IMAGE_NAME, IMAGE_TAG, BUILD_CONTEXT, SWR_REGISTRY, SWR_NAMESPACE.\n\
                  Credentials: SWR_USERNAME / SWR_PASSWORD, or SWR_CREDENTIALS=prompt."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Build the image from the build context
    Build,

    /// Tag the local image with its registry reference
    Tag,

    /// Log in to the registry
    Login,

    /// Push the tagged image to the registry
    Push,

    /// Build, tag, login and push, stopping at the first failure
    Deploy,

    /// Start the Streamlit app locally
    Stl,

    /// Start the API process locally
    Main,
}
