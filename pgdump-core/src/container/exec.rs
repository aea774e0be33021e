use super::CommandRunner;
use super::types::DockerClient;
use crate::{DumpError, Result};
use std::path::Path;
use std::process::Output;

impl CommandRunner for DockerClient {
    async fn run(&self, workload_id: &str, command: &[String], redirect_to: &Path) -> Result<()> {
        let file = tokio::fs::File::create(redirect_to).await?.into_std().await;

        let mut args = vec!["exec", workload_id];
        args.extend(command.iter().map(String::as_str));
        let output = self.run_docker_command_to_file(&args, file).await?;

        check_exec_output(workload_id, &output)
    }
}

/// 判断容器内命令是否成功：退出码非 0 或 stderr 非空都视为失败
pub(crate) fn check_exec_output(workload_id: &str, output: &Output) -> Result<()> {
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        return Err(DumpError::docker(format!(
            "容器 {workload_id} 中的命令退出码 {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }

    if !stderr.trim().is_empty() {
        return Err(DumpError::docker(format!(
            "容器 {workload_id} 中的命令输出了错误信息: {}",
            stderr.trim()
        )));
    }

    Ok(())
}
