// 模块声明
mod command;
mod exec;
mod inspect;
mod manager;
mod types;

// 重新导出公共API
pub use types::DockerClient;

use crate::Result;
use crate::target::WorkloadMetadata;
use std::path::Path;

/// 发现并描述参与备份的容器
#[allow(async_fn_in_trait)]
pub trait WorkloadInspector {
    /// 列出带备份标记的容器 ID
    async fn list_candidates(&self) -> Result<Vec<String>>;

    /// 获取容器的标签信息，按传入顺序返回
    async fn describe(&self, ids: &[String]) -> Result<Vec<WorkloadMetadata>>;
}

/// 在容器内执行命令并把标准输出写入本地文件
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, workload_id: &str, command: &[String], redirect_to: &Path) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::inspect::{parse_container_ids, parse_inspect_output};
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_docker_client_creation() {
        let client = DockerClient::new("pgdump", Duration::from_secs(60));
        assert_eq!(client.marker_label(), "pgdump");
        assert_eq!(client.command_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_container_ids_parsing() {
        let ids = parse_container_ids("abc123\n\n  def456  \n");
        assert_eq!(ids, vec!["abc123".to_string(), "def456".to_string()]);
        assert!(parse_container_ids("").is_empty());
    }

    #[test]
    fn test_inspect_output_parsing() {
        let json_output = r#"[
  {
    "Id": "abc123",
    "Name": "/db",
    "Config": {
      "Image": "postgres:16",
      "Labels": {
        "pgdump": "true",
        "pgdump.username": "postgres",
        "pgdump.prefix": "app"
      }
    }
  },
  {
    "Id": "def456",
    "Config": { "Labels": null }
  },
  {
    "Id": "ghi789"
  }
]"#;

        let records = parse_inspect_output(json_output).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "abc123");
        assert_eq!(records[0].labels.get("pgdump.prefix").unwrap(), "app");
        assert!(records[1].labels.is_empty());
        assert!(records[2].labels.is_empty());
    }

    #[test]
    fn test_inspect_output_invalid_json() {
        assert!(parse_inspect_output("not json").is_err());
    }
}
