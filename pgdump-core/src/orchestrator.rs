//! # 备份编排
//!
//! 每轮执行的流程：
//!
//! 1. 列出带备份标签的容器并校验标签，校验失败的容器只记录日志
//! 2. 获取一次远端备份清单，失败则整轮放弃
//! 3. 依次处理每个目标：判断周期 -> 生成 -> 上传 -> 清理过期备份
//!
//! 单个目标失败不会影响其他目标。生成失败不再上传，上传失败不再清理；
//! 清理失败只记录日志，不影响已经成功的备份。

use crate::artifact::{artifact_key, period_key};
use crate::container::{CommandRunner, WorkloadInspector};
use crate::generator::DumpGenerator;
use crate::inventory::RemoteInventory;
use crate::reaper::{expired_keys, reap};
use crate::schedule::is_due;
use crate::storage::RemoteStore;
use crate::target::{Discovery, LabelKeys, Rejection, Target, ValidationError, validate_records};
use crate::uploader::upload;
use crate::{DumpError, Result};
use chrono::NaiveDateTime;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 编排选项
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub label_keys: LabelKeys,
    /// 只计算计划，不生成、不上传、不删除
    pub dry_run: bool,
}

/// 单个目标在一轮执行中的最终状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    /// 本周期已有备份
    Skipped { period_key: String },
    /// 演练模式下需要备份
    Planned {
        artifact_key: String,
        expired: Vec<String>,
    },
    /// 生成、上传、清理全部完成
    Cleaned {
        artifact_key: String,
        deleted: Vec<String>,
    },
    FailedGenerate { error: String },
    FailedUpload { error: String },
    /// 备份已上传，只有清理失败
    FailedCleanup { artifact_key: String, error: String },
}

impl TargetOutcome {
    /// 备份本身是否失败（清理失败不算）
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TargetOutcome::FailedGenerate { .. } | TargetOutcome::FailedUpload { .. }
        )
    }

    /// 本轮上传的备份文件
    pub fn uploaded_key(&self) -> Option<&str> {
        match self {
            TargetOutcome::Cleaned { artifact_key, .. }
            | TargetOutcome::FailedCleanup { artifact_key, .. } => Some(artifact_key),
            _ => None,
        }
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            TargetOutcome::Skipped { .. } => "skipped",
            TargetOutcome::Planned { .. } => "planned",
            TargetOutcome::Cleaned { .. } => "cleaned",
            TargetOutcome::FailedGenerate { .. } => "failed-generate",
            TargetOutcome::FailedUpload { .. } => "failed-upload",
            TargetOutcome::FailedCleanup { .. } => "failed-cleanup",
        }
    }
}

/// 单个目标的执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub target: Target,
    pub outcome: TargetOutcome,
}

/// 一轮执行的汇总
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: NaiveDateTime,
    pub targets: Vec<TargetReport>,
    pub rejections: Vec<Rejection>,
}

impl RunReport {
    fn new(run_id: Uuid, started_at: NaiveDateTime) -> Self {
        Self {
            run_id,
            started_at,
            targets: Vec::new(),
            rejections: Vec::new(),
        }
    }

    pub fn outcome_of(&self, prefix: &str) -> Option<&TargetOutcome> {
        self.targets
            .iter()
            .find(|report| report.target.prefix == prefix)
            .map(|report| &report.outcome)
    }

    pub fn uploaded_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|report| report.outcome.uploaded_key().is_some())
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|report| matches!(report.outcome, TargetOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|report| report.outcome.is_failure())
            .count()
    }
}

/// 执行中标记，释放时自动复位
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// 备份编排器
pub struct Orchestrator<I, R, S> {
    inspector: I,
    generator: DumpGenerator<R>,
    store: S,
    options: RunOptions,
    running: AtomicBool,
}

impl<I, R, S> Orchestrator<I, R, S>
where
    I: WorkloadInspector,
    R: CommandRunner,
    S: RemoteStore,
{
    pub fn new(inspector: I, generator: DumpGenerator<R>, store: S, options: RunOptions) -> Self {
        Self {
            inspector,
            generator,
            store,
            options,
            running: AtomicBool::new(false),
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// 发现并校验备份目标
    pub async fn discover(&self) -> Result<Discovery> {
        discover_targets(&self.inspector, &self.options.label_keys).await
    }

    /// 执行一轮备份
    ///
    /// 上一轮尚未结束时返回 [`DumpError::RunInProgress`]。
    pub async fn run_once(&self, now: NaiveDateTime) -> Result<RunReport> {
        let Some(_guard) = RunGuard::acquire(&self.running) else {
            return Err(DumpError::RunInProgress);
        };

        self.run_inner(Uuid::now_v7(), now).await
    }

    #[instrument(name = "run", skip(self, now), fields(dry_run = self.options.dry_run))]
    async fn run_inner(&self, run_id: Uuid, now: NaiveDateTime) -> Result<RunReport> {
        let mut report = RunReport::new(run_id, now);

        let discovery = self.discover().await?;
        report.rejections = discovery.rejections;
        if discovery.targets.is_empty() {
            info!("没有有效的备份目标");
            return Ok(report);
        }

        let inventory = RemoteInventory::fetch(&self.store).await.inspect_err(|e| {
            error!(error = %e, "无法获取远端备份清单，本轮放弃");
        })?;
        debug!(count = inventory.len(), "远端已有对象");

        for target in discovery.targets {
            let outcome = self.process_target(&target, now, &inventory).await;
            debug!(prefix = %target.prefix, state = outcome.state_name(), "目标处理结束");
            report.targets.push(TargetReport { target, outcome });
        }

        info!(
            uploaded = report.uploaded_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            rejected = report.rejections.len(),
            "本轮备份任务完成"
        );
        Ok(report)
    }

    #[instrument(skip_all, fields(prefix = %target.prefix, workload_id = %target.id))]
    async fn process_target(
        &self,
        target: &Target,
        now: NaiveDateTime,
        inventory: &RemoteInventory,
    ) -> TargetOutcome {
        let period_key = period_key(target, now);
        if !is_due(&period_key, inventory) {
            debug!(period_key = %period_key, "本周期已有备份，跳过");
            return TargetOutcome::Skipped { period_key };
        }

        if self.options.dry_run {
            let outcome = TargetOutcome::Planned {
                artifact_key: artifact_key(&target.prefix, now),
                expired: expired_keys(target, now, inventory),
            };
            info!(?outcome, "演练模式：需要备份");
            return outcome;
        }

        let local_path = self.generator.artifact_path(target, now);
        let outcome = self.dump_upload_clean(target, now, inventory).await;
        remove_scratch_file(&local_path).await;
        outcome
    }

    async fn dump_upload_clean(
        &self,
        target: &Target,
        now: NaiveDateTime,
        inventory: &RemoteInventory,
    ) -> TargetOutcome {
        let local_path = match self.generator.generate(target, now).await {
            Ok(path) => path,
            Err(e) => {
                error!(error = %e, "备份容器 {} 失败", target.id);
                return TargetOutcome::FailedGenerate {
                    error: e.to_string(),
                };
            }
        };
        info!("容器 {} 的备份已生成，开始上传", target.id);

        let artifact_key = match upload(&self.store, &local_path).await {
            Ok(key) => key,
            Err(e) => {
                error!(error = %e, "上传 {} 失败", local_path.display());
                return TargetOutcome::FailedUpload {
                    error: e.to_string(),
                };
            }
        };
        info!("容器 {} 的备份已上传，开始清理", target.id);

        match reap(&self.store, target, now, inventory).await {
            Ok(deleted) => {
                info!(
                    "前缀 {} 超过 {} 天的备份已清理（{} 个）",
                    target.prefix,
                    target.retention_days,
                    deleted.len()
                );
                TargetOutcome::Cleaned {
                    artifact_key,
                    deleted,
                }
            }
            Err(e) => {
                error!(
                    error = %e,
                    "无法清理前缀 {} 保留 {} 天以前的备份",
                    target.prefix,
                    target.retention_days
                );
                TargetOutcome::FailedCleanup {
                    artifact_key,
                    error: e.to_string(),
                }
            }
        }
    }
}

/// 列出带备份标记的容器并校验标签，校验失败的容器只记录日志
pub async fn discover_targets<I: WorkloadInspector>(
    inspector: &I,
    label_keys: &LabelKeys,
) -> Result<Discovery> {
    let ids = inspector.list_candidates().await?;
    info!("发现 {} 个需要备份的容器", ids.len());
    if ids.is_empty() {
        return Ok(Discovery::default());
    }

    let records = inspector.describe(&ids).await?;
    let discovery = validate_records(&records, label_keys);

    for rejection in &discovery.rejections {
        match rejection.error {
            ValidationError::MissingMarker => {
                warn!(workload_id = %rejection.workload_id, "{}", rejection.error)
            }
            _ => error!(workload_id = %rejection.workload_id, "{}", rejection.error),
        }
    }

    Ok(discovery)
}

/// 删除本地临时备份文件，失败只记录警告
async fn remove_scratch_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "已删除本地临时备份"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "删除本地临时备份失败"),
    }
}
