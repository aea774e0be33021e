use crate::artifact::artifact_key;
use crate::constants::dump;
use crate::container::CommandRunner;
use crate::target::Target;
use crate::{DumpError, Result};
use chrono::NaiveDateTime;
use std::path::PathBuf;
use tracing::{info, instrument};

/// 备份生成器，在目标容器内执行 pg_dumpall 并写入本地临时目录
#[derive(Debug, Clone)]
pub struct DumpGenerator<R> {
    runner: R,
    scratch_dir: PathBuf,
}

impl<R: CommandRunner> DumpGenerator<R> {
    pub fn new(runner: R, scratch_dir: PathBuf) -> Self {
        Self {
            runner,
            scratch_dir,
        }
    }

    /// 本地临时备份文件路径
    pub fn artifact_path(&self, target: &Target, now: NaiveDateTime) -> PathBuf {
        self.scratch_dir.join(artifact_key(&target.prefix, now))
    }

    /// 生成备份文件，返回本地路径
    #[instrument(skip(self, target), fields(prefix = %target.prefix))]
    pub async fn generate(&self, target: &Target, now: NaiveDateTime) -> Result<PathBuf> {
        let path = self.artifact_path(target, now);
        let command = dump_command(target);

        self.runner
            .run(&target.id, &command, &path)
            .await
            .map_err(DumpError::generation)?;

        info!(workload_id = %target.id, path = %path.display(), "备份文件已生成");
        Ok(path)
    }
}

/// 备份命令参数
pub fn dump_command(target: &Target) -> Vec<String> {
    vec![
        dump::PROGRAM.to_string(),
        dump::CLEAN_FLAG.to_string(),
        dump::USER_FLAG.to_string(),
        target.username.clone(),
    ]
}
