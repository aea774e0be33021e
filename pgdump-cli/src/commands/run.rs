use crate::app::CliApp;
use anyhow::{Context, Result};
use pgdump_core::orchestrator::{RunReport, TargetOutcome};
use tracing::{error, info, instrument, warn};

/// 立即执行一轮备份
///
/// 单个目标失败只体现在汇总中，整轮中止（发现容器或获取清单失败）时返回错误。
#[instrument(skip(app))]
pub async fn run_once(app: &CliApp, dry_run: bool) -> Result<()> {
    info!("💾 执行备份任务");
    info!("===============");

    let orchestrator = app.orchestrator(dry_run).await?;
    if orchestrator.options().dry_run {
        info!("🔍 演练模式：不会生成、上传或删除任何文件");
    }

    let now = app.config.schedule.timezone.now();
    let report = orchestrator
        .run_once(now)
        .await
        .context("本轮备份任务中止")?;

    print_report(&report);
    Ok(())
}

/// 输出一轮执行的汇总
pub fn print_report(report: &RunReport) {
    info!("📊 本轮执行结果 (run_id: {})", report.run_id);

    if report.targets.is_empty() && report.rejections.is_empty() {
        info!("   没有发现需要备份的容器");
        return;
    }

    for item in &report.targets {
        let target = &item.target;
        match &item.outcome {
            TargetOutcome::Skipped { period_key } => {
                info!("   ⏭️  {} 本周期已有备份 ({}*)", target.prefix, period_key);
            }
            TargetOutcome::Planned {
                artifact_key,
                expired,
            } => {
                info!("   📝 {} 将备份为 {}", target.prefix, artifact_key);
                for key in expired {
                    info!("      - 将删除过期备份 {}", key);
                }
            }
            TargetOutcome::Cleaned {
                artifact_key,
                deleted,
            } => {
                info!(
                    "   ✅ {} 已上传 {}，清理过期备份 {} 个",
                    target.prefix,
                    artifact_key,
                    deleted.len()
                );
            }
            TargetOutcome::FailedGenerate { error } => {
                error!("   ❌ {} 生成备份失败: {}", target.prefix, error);
            }
            TargetOutcome::FailedUpload { error } => {
                error!("   ❌ {} 上传备份失败: {}", target.prefix, error);
            }
            TargetOutcome::FailedCleanup {
                artifact_key,
                error,
            } => {
                warn!(
                    "   ⚠️  {} 已上传 {}，但清理过期备份失败: {}",
                    target.prefix, artifact_key, error
                );
            }
        }
    }

    for rejection in &report.rejections {
        warn!("   🚫 容器 {} 被忽略: {}", rejection.workload_id, rejection.error);
    }

    info!(
        "   合计: 上传 {} 个，跳过 {} 个，失败 {} 个，忽略 {} 个容器",
        report.uploaded_count(),
        report.skipped_count(),
        report.failed_count(),
        report.rejections.len()
    );
}
