use crate::app::CliApp;
use anyhow::{Context, Result};
use pgdump_core::orchestrator::discover_targets;
use tracing::{info, warn};

/// 发现并校验备份目标，不执行备份
pub async fn show_targets(app: &CliApp) -> Result<()> {
    info!("🔍 发现备份目标");
    info!("===============");

    let docker = app.docker_client();
    docker.check_docker_status().await.context("Docker 不可用")?;
    let discovery = discover_targets(&docker, &app.label_keys())
        .await
        .context("发现备份目标失败")?;

    if discovery.targets.is_empty() {
        info!("没有有效的备份目标");
    } else {
        info!("📋 备份目标 ({} 个):", discovery.targets.len());
        for target in &discovery.targets {
            info!(
                "   - {} [容器 {}] 用户: {}, 频率: {}, 保留: {} 天",
                target.prefix, target.id, target.username, target.frequency, target.retention_days
            );
        }
    }

    if !discovery.rejections.is_empty() {
        warn!("🚫 被忽略的容器 ({} 个):", discovery.rejections.len());
        for rejection in &discovery.rejections {
            warn!("   - {}: {}", rejection.workload_id, rejection.error);
        }
    }

    Ok(())
}
