use anyhow::Result;

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::ui;

pub async fn execute(config: &DeployConfig) -> Result<()> {
    let image = config.image_ref().map_err(DeployError::from)?;
    ui::print_header(&format!("Build: {}", image));

    let service = super::pipeline_service(config);
    let built = service
        .build(&image, &config.build_spec())
        .await
        .map_err(DeployError::from)?;

    println!();
    ui::print_success(&format!("Build complete: {}", built));
    Ok(())
}
