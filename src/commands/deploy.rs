use anyhow::Result;

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::services::PipelineTarget;
use crate::ui;

/// Build → tag → login → push
pub async fn execute(config: &DeployConfig) -> Result<()> {
    let target = PipelineTarget {
        image: config.image_ref().map_err(DeployError::from)?,
        build: config.build_spec(),
        registry: config.coordinates().map_err(DeployError::from)?,
    };

    let service = super::pipeline_service(config);
    let report = service.deploy(&target).await.map_err(DeployError::from)?;

    let total: f64 = report
        .results
        .iter()
        .map(|r| r.duration.as_secs_f64())
        .sum();
    ui::print_success(&format!(
        "Deploy complete: {} ({:.1}s)",
        report.pushed.reference, total
    ));
    if let Some(digest) = report.pushed.digest {
        ui::print_info(&format!("Digest: {}", digest));
    }
    Ok(())
}
