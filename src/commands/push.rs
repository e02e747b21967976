use anyhow::Result;
use tracing::info;

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::ui;

pub async fn execute(config: &DeployConfig) -> Result<()> {
    let remote = config.remote_ref().map_err(DeployError::from)?;
    ui::print_header(&format!("Push: {}", remote.image()));
    info!("🎯 Target: {}", remote);
    info!("   Requires a prior `login` to {}", remote.host());

    let service = super::pipeline_service(config);
    let pushed = service.push(&remote).await.map_err(DeployError::from)?;

    println!();
    ui::print_success(&format!("Pushed {}", pushed.reference));
    if let Some(digest) = pushed.digest {
        ui::print_info(&format!("Digest: {}", digest));
    }
    Ok(())
}
