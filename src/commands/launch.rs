use anyhow::Result;

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::infrastructure::{LaunchTarget, Launcher, SystemRunner};
use crate::ui;

/// Start a local entry point; the pipeline is not involved
pub async fn execute(config: &DeployConfig, target: LaunchTarget) -> Result<()> {
    let command = config.launch.command(target);
    ui::print_info(&format!("Launching {}: {}", target, command.join(" ")));

    Launcher::new(SystemRunner)
        .launch(target, command, config.launch.workdir.as_deref())
        .await
        .map_err(DeployError::from)?;
    Ok(())
}
