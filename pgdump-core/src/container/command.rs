use super::types::DockerClient;
use crate::{DumpError, Result};
use std::process::Stdio;
use tokio::process::Command;

impl DockerClient {
    /// 检查 Docker 是否可用
    pub async fn check_docker_status(&self) -> Result<()> {
        // 检查 docker 命令
        if which::which("docker").is_err() {
            return Err(DumpError::docker("Docker 未安装或不在 PATH 中"));
        }

        // 检查 Docker 服务是否运行
        let output = self.run_docker_command(&["info"]).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DumpError::docker(format!("Docker 服务未运行: {stderr}")));
        }

        Ok(())
    }

    /// 执行 docker 命令，超时后子进程会被终止
    pub(crate) async fn run_docker_command(&self, args: &[&str]) -> Result<std::process::Output> {
        let child = Command::new("docker")
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        self.with_timeout(args.first().copied().unwrap_or("docker"), child)
            .await
    }

    /// 执行 docker 命令并把标准输出写入文件
    pub(crate) async fn run_docker_command_to_file(
        &self,
        args: &[&str],
        stdout: std::fs::File,
    ) -> Result<std::process::Output> {
        let child = Command::new("docker")
            .args(args)
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        self.with_timeout(args.first().copied().unwrap_or("docker"), child)
            .await
    }

    async fn with_timeout<F>(&self, operation: &str, child: F) -> Result<std::process::Output>
    where
        F: std::future::Future<Output = std::io::Result<std::process::Output>>,
    {
        match tokio::time::timeout(self.command_timeout, child).await {
            Ok(output) => Ok(output?),
            Err(_) => Err(DumpError::timeout(
                format!("docker {operation}"),
                self.command_timeout.as_secs(),
            )),
        }
    }
}
