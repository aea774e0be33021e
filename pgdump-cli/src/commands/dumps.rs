use crate::app::CliApp;
use anyhow::{Context, Result};
use pgdump_core::artifact::belongs_to;
use pgdump_core::constants::artifact;
use pgdump_core::inventory::RemoteInventory;
use tracing::info;

/// 列出远端存储中的备份文件
pub async fn list_dumps(app: &CliApp, prefix: Option<&str>) -> Result<()> {
    let store = app.store()?;
    info!("📦 存储桶 {} 中的备份", store.bucket());

    let inventory = RemoteInventory::fetch(&store)
        .await
        .context("获取远端备份清单失败")?;

    let dumps = select_dumps(inventory.keys(), prefix);
    if dumps.is_empty() {
        info!("   没有找到备份文件");
        return Ok(());
    }

    for key in &dumps {
        info!("   - {}", key);
    }
    info!("   合计 {} 个备份文件", dumps.len());
    Ok(())
}

/// 按名称排序，指定前缀时只保留该前缀的备份
fn select_dumps<'a>(keys: &'a [String], prefix: Option<&str>) -> Vec<&'a str> {
    let mut dumps: Vec<&str> = keys
        .iter()
        .map(String::as_str)
        .filter(|key| match prefix {
            Some(prefix) => belongs_to(prefix, key),
            None => key.starts_with(artifact::KEY_PREFIX) && key.ends_with(artifact::KEY_SUFFIX),
        })
        .collect();
    dumps.sort_unstable();
    dumps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<String> {
        [
            "pgdump_shop_2024-03-01_00-00-00.sql",
            "pgdump_app_2024-03-02_00-00-00.sql",
            "pgdump_app_v2_2024-03-01_00-00-00.sql",
            "pgdump_app_2024-03-01_00-00-00.sql",
            "notes.txt",
        ]
        .iter()
        .map(|k| k.to_string())
        .collect()
    }

    #[test]
    fn test_select_all_dumps_sorted() {
        let keys = keys();
        assert_eq!(
            select_dumps(&keys, None),
            vec![
                "pgdump_app_2024-03-01_00-00-00.sql",
                "pgdump_app_2024-03-02_00-00-00.sql",
                "pgdump_app_v2_2024-03-01_00-00-00.sql",
                "pgdump_shop_2024-03-01_00-00-00.sql",
            ]
        );
    }

    #[test]
    fn test_select_dumps_by_prefix() {
        let keys = keys();
        assert_eq!(
            select_dumps(&keys, Some("app")),
            vec![
                "pgdump_app_2024-03-01_00-00-00.sql",
                "pgdump_app_2024-03-02_00-00-00.sql",
            ]
        );
        assert!(select_dumps(&keys, Some("missing")).is_empty());
    }
}
