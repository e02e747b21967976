use anyhow::Result;

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::ui;

pub async fn execute(config: &DeployConfig) -> Result<()> {
    let image = config.image_ref().map_err(DeployError::from)?;
    let registry = config.coordinates().map_err(DeployError::from)?;
    ui::print_header(&format!("Tag: {}", image));

    let service = super::pipeline_service(config);
    let remote = service
        .tag(&image, &registry)
        .await
        .map_err(DeployError::from)?;

    println!();
    ui::print_success(&format!("Tagged {}", remote));
    Ok(())
}
