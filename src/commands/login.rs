use anyhow::Result;

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::ui;

pub async fn execute(config: &DeployConfig) -> Result<()> {
    let registry = config.coordinates().map_err(DeployError::from)?;
    ui::print_header(&format!("Login: {}", registry.host()));

    let service = super::pipeline_service(config);
    let session = service
        .login(registry.host())
        .await
        .map_err(DeployError::from)?;

    println!();
    ui::print_success(&format!("Logged in to {}", session.host));
    Ok(())
}
