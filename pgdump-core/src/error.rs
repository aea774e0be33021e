use thiserror::Error;

pub type Result<T> = std::result::Result<T, DumpError>;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("配置错误: {0}")]
    Config(#[from] toml::de::Error),

    #[error("配置无效: {0}")]
    InvalidConfig(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("对象存储错误: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Docker 命令执行失败: {0}")]
    Docker(String),

    #[error("获取远端备份清单失败: {0}")]
    Inventory(String),

    #[error("生成备份失败: {0}")]
    Generation(String),

    #[error("上传备份失败: {0}")]
    Upload(String),

    #[error("清理过期备份失败: {0}")]
    Cleanup(String),

    #[error("存储请求返回异常状态码: {0}")]
    Status(u16),

    #[error("超时错误: {operation} 操作超时 ({timeout_seconds}秒)")]
    Timeout {
        operation: String,
        timeout_seconds: u64,
    },

    #[error("上一轮备份任务仍在执行中")]
    RunInProgress,
}

impl DumpError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn docker(msg: impl Into<String>) -> Self {
        Self::Docker(msg.into())
    }

    pub fn inventory(err: impl std::fmt::Display) -> Self {
        Self::Inventory(err.to_string())
    }

    pub fn generation(err: impl std::fmt::Display) -> Self {
        Self::Generation(err.to_string())
    }

    pub fn upload(err: impl std::fmt::Display) -> Self {
        Self::Upload(err.to_string())
    }

    pub fn cleanup(err: impl std::fmt::Display) -> Self {
        Self::Cleanup(err.to_string())
    }

    pub fn timeout(operation: impl Into<String>, timeout_seconds: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_seconds,
        }
    }
}
