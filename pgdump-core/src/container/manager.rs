use super::types::DockerClient;
use std::time::Duration;

impl DockerClient {
    /// 创建新的 Docker 客户端
    pub fn new(marker_label: impl Into<String>, command_timeout: Duration) -> Self {
        Self {
            marker_label: marker_label.into(),
            command_timeout,
        }
    }

    /// 获取备份标记标签
    pub fn marker_label(&self) -> &str {
        &self.marker_label
    }

    /// 获取命令超时时间
    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }
}
