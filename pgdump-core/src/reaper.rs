use crate::artifact::{belongs_to, key_prefix, retention_cutoff_key};
use crate::inventory::RemoteInventory;
use crate::storage::{RemoteStore, ensure_success};
use crate::target::Target;
use crate::{DumpError, Result};
use chrono::NaiveDateTime;
use tracing::{debug, info, instrument};

/// 计算该目标需要删除的过期备份
///
/// 只比较字符串：同一前缀下的完整时间戳文件名按字典序即按时间排序。
/// 恰好等于截止点的文件会被保留。
pub fn expired_keys(target: &Target, now: NaiveDateTime, inventory: &RemoteInventory) -> Vec<String> {
    let Some(cutoff) = retention_cutoff_key(target, now) else {
        return Vec::new();
    };

    let prefix = key_prefix(&target.prefix);
    inventory
        .starting_with(&prefix)
        .filter(|key| belongs_to(&target.prefix, key))
        .filter(|key| key.as_str() < cutoff.as_str())
        .cloned()
        .collect()
}

/// 删除过期备份，返回被删除的 key；没有过期文件时不发起请求
#[instrument(skip(store, target, inventory), fields(prefix = %target.prefix, retention_days = target.retention_days))]
pub async fn reap<S: RemoteStore>(
    store: &S,
    target: &Target,
    now: NaiveDateTime,
    inventory: &RemoteInventory,
) -> Result<Vec<String>> {
    let expired = expired_keys(target, now, inventory);
    if expired.is_empty() {
        debug!("没有需要清理的过期备份");
        return Ok(expired);
    }

    let status = store
        .delete_many(&expired)
        .await
        .map_err(DumpError::cleanup)?;
    ensure_success(status).map_err(DumpError::cleanup)?;

    info!(count = expired.len(), "已删除过期备份");
    Ok(expired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::artifact_key;
    use crate::target::Frequency;
    use crate::test_support::MemoryStore;
    use chrono::{NaiveDate, TimeDelta};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn target(prefix: &str, retention_days: u32) -> Target {
        Target {
            id: format!("{prefix}-container"),
            username: "postgres".to_string(),
            prefix: prefix.to_string(),
            frequency: Frequency::Daily,
            retention_days,
        }
    }

    fn keys_days_ago(prefix: &str, days: impl IntoIterator<Item = i64>) -> Vec<String> {
        days.into_iter()
            .map(|d| artifact_key(prefix, now() - TimeDelta::days(d)))
            .collect()
    }

    #[test]
    fn test_retention_boundary() {
        let inventory = RemoteInventory::new(keys_days_ago("p", 0..=10));

        let expired = expired_keys(&target("p", 7), now(), &inventory);

        // 恰好 7 天前的文件保留
        assert_eq!(expired, keys_days_ago("p", 8..=10));
    }

    #[test]
    fn test_other_prefixes_untouched() {
        let mut keys = keys_days_ago("app", [1, 30]);
        keys.extend(keys_days_ago("app_v2", [30]));
        keys.extend(keys_days_ago("shop", [30]));
        keys.push("pgdump_app_notes.txt".to_string());
        let inventory = RemoteInventory::new(keys);

        let expired = expired_keys(&target("app", 7), now(), &inventory);
        assert_eq!(expired, keys_days_ago("app", [30]));
    }

    #[test]
    fn test_zero_retention() {
        let mut keys = keys_days_ago("p", [0, 1]);
        keys.push(artifact_key("p", now() - TimeDelta::seconds(1)));
        let inventory = RemoteInventory::new(keys);

        let expired = expired_keys(&target("p", 0), now(), &inventory);
        assert_eq!(expired.len(), 2);
        assert!(!expired.contains(&artifact_key("p", now())));
    }

    #[tokio::test]
    async fn test_reap_deletes_in_one_batch() {
        let keys = keys_days_ago("p", 0..=10);
        let store = MemoryStore::with_keys(keys.iter().map(String::as_str));
        let inventory = RemoteInventory::new(keys);

        let deleted = reap(&store, &target("p", 7), now(), &inventory).await.unwrap();

        assert_eq!(deleted.len(), 3);
        assert_eq!(store.delete_batches(), vec![deleted.clone()]);
        assert_eq!(store.keys().len(), 8);
    }

    #[tokio::test]
    async fn test_reap_nothing_expired_is_noop() {
        let keys = keys_days_ago("p", 0..=3);
        let store = MemoryStore::with_keys(keys.iter().map(String::as_str));
        let inventory = RemoteInventory::new(keys);

        let deleted = reap(&store, &target("p", 7), now(), &inventory).await.unwrap();

        assert!(deleted.is_empty());
        assert!(store.delete_batches().is_empty());
    }

    #[tokio::test]
    async fn test_reap_failure_is_cleanup_error() {
        let keys = keys_days_ago("p", [30]);
        let store = MemoryStore::with_keys(keys.iter().map(String::as_str));
        store.set_delete_status(500);
        let inventory = RemoteInventory::new(keys);

        let err = reap(&store, &target("p", 7), now(), &inventory)
            .await
            .unwrap_err();
        assert!(matches!(err, DumpError::Cleanup(_)));
    }
}
