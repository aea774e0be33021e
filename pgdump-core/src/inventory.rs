use crate::storage::RemoteStore;
use crate::{DumpError, Result};
use tracing::debug;

/// 远端备份清单快照，每轮只获取一次
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteInventory {
    keys: Vec<String>,
}

impl RemoteInventory {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    /// 从远端存储获取清单，任何错误都视为整轮失败
    pub async fn fetch<S: RemoteStore>(store: &S) -> Result<Self> {
        let keys = store.list().await.map_err(DumpError::inventory)?;
        debug!(count = keys.len(), "已获取远端备份清单");
        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// 是否存在以指定前缀开头的 key
    pub fn any_starts_with(&self, prefix: &str) -> bool {
        self.keys.iter().any(|key| key.starts_with(prefix))
    }

    /// 所有以指定前缀开头的 key
    pub fn starting_with<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.keys.iter().filter(move |key| key.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryStore;

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let store = MemoryStore::with_keys(["pgdump_a_2024-01-01_00-00-00.sql", "readme.txt"]);
        let inventory = RemoteInventory::fetch(&store).await.unwrap();

        assert_eq!(inventory.len(), 2);
        assert!(inventory.any_starts_with("pgdump_a_2024-01-01"));
        assert!(!inventory.any_starts_with("pgdump_b_"));
        assert_eq!(inventory.starting_with("pgdump_").count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_inventory_error() {
        let store = MemoryStore::default();
        store.fail_list();

        let err = RemoteInventory::fetch(&store).await.unwrap_err();
        assert!(matches!(err, DumpError::Inventory(_)));
    }
}
