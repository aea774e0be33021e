use super::WorkloadInspector;
use super::types::{DockerClient, InspectedContainer};
use crate::target::WorkloadMetadata;
use crate::{DumpError, Result};
use tracing::debug;

impl WorkloadInspector for DockerClient {
    async fn list_candidates(&self) -> Result<Vec<String>> {
        let filter = format!("label={}", self.marker_label);
        let output = self.run_docker_command(&["ps", "-q", "-f", &filter]).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DumpError::docker(format!("列出容器失败: {stderr}")));
        }

        let ids = parse_container_ids(&String::from_utf8_lossy(&output.stdout));
        debug!(count = ids.len(), marker = %self.marker_label, "发现带备份标签的容器");
        Ok(ids)
    }

    async fn describe(&self, ids: &[String]) -> Result<Vec<WorkloadMetadata>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut args = vec!["inspect"];
        args.extend(ids.iter().map(String::as_str));
        let output = self.run_docker_command(&args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DumpError::docker(format!("检查容器失败: {stderr}")));
        }

        parse_inspect_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// 解析 `docker ps -q` 的输出
pub(crate) fn parse_container_ids(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 解析 `docker inspect` 的 JSON 输出，保持 Docker 返回的顺序
pub(crate) fn parse_inspect_output(output: &str) -> Result<Vec<WorkloadMetadata>> {
    let containers: Vec<InspectedContainer> = serde_json::from_str(output)?;

    Ok(containers
        .into_iter()
        .map(|container| WorkloadMetadata {
            id: container.id,
            labels: container
                .config
                .and_then(|config| config.labels)
                .unwrap_or_default(),
        })
        .collect())
}
