//! Command implementations, one module per subcommand

pub mod build;
pub mod deploy;
pub mod launch;
pub mod login;
pub mod push;
pub mod tag;

use tracing::debug;

use crate::config::DeployConfig;
use crate::infrastructure::{ContainerClient, SystemRunner};
use crate::services::PipelineService;

/// Pipeline service backed by the real container client
fn pipeline_service(config: &DeployConfig) -> PipelineService<SystemRunner> {
    let client = ContainerClient::new(SystemRunner);
    debug!("Container client: {}", client.binary());
    debug!("Credential source: {:?}", config.credentials);
    PipelineService::new(client, config.credentials.provider())
}
