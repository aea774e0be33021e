use std::time::Duration;

/// 通过 Docker CLI 发现容器并在容器内执行备份命令
#[derive(Debug, Clone)]
pub struct DockerClient {
    /// 参与备份的容器必须带有的标签
    pub(crate) marker_label: String,
    /// 单个 docker 命令的超时时间
    pub(crate) command_timeout: Duration,
}

/// `docker inspect` 输出中的单个容器
#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct InspectedContainer {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Config", default)]
    pub config: Option<InspectedConfig>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub(crate) struct InspectedConfig {
    #[serde(rename = "Labels", default)]
    pub labels: Option<std::collections::HashMap<String, String>>,
}
