use super::RemoteStore;
use crate::Result;
use crate::config::StorageConfig;
use futures::{StreamExt, TryStreamExt, stream};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::{ClientOptions, ObjectStore, PutPayload};
use std::time::Duration;
use tracing::{debug, info};

/// object_store 没有暴露 HTTP 状态码，成功的请求统一记为 200
const STATUS_OK: u16 = 200;

/// S3 兼容存储
#[derive(Debug)]
pub struct S3Store {
    store: AmazonS3,
    bucket: String,
}

impl S3Store {
    /// 根据配置创建存储客户端（path-style 访问，兼容 MinIO 等自建服务）
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let client_options = ClientOptions::default()
            .with_timeout(Duration::from_secs(config.request_timeout_secs));

        let store = AmazonS3Builder::new()
            .with_endpoint(&config.endpoint)
            .with_region(&config.region)
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_virtual_hosted_style_request(false)
            .with_allow_http(config.allow_http)
            .with_client_options(client_options)
            .build()?;

        info!(
            endpoint = %config.endpoint,
            bucket = %config.bucket,
            "对象存储客户端已创建"
        );

        Ok(Self {
            store,
            bucket: config.bucket.clone(),
        })
    }

    /// 获取存储桶名称
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl RemoteStore for S3Store {
    async fn list(&self) -> Result<Vec<String>> {
        let keys: Vec<String> = self
            .store
            .list(None)
            .map_ok(|meta| meta.location.to_string())
            .try_collect()
            .await?;

        debug!(bucket = %self.bucket, count = keys.len(), "列出存储桶对象");
        Ok(keys)
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<u16> {
        let size = bytes.len();
        let put_result = self
            .store
            .put(&Path::from(key), PutPayload::from(bytes))
            .await?;

        debug!(key, size, ?put_result, "对象上传完成");
        Ok(STATUS_OK)
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u16> {
        let locations = stream::iter(
            keys.iter()
                .map(|key| Ok::<_, object_store::Error>(Path::from(key.as_str()))),
        )
        .boxed();

        let deleted: Vec<Path> = self.store.delete_stream(locations).try_collect().await?;

        debug!(count = deleted.len(), "批量删除对象完成");
        Ok(STATUS_OK)
    }
}

#[cfg(test)]
mod tests {
    use crate::artifact::{artifact_key, belongs_to, period_key};
    use crate::target::{LabelKeys, WorkloadMetadata, validate_records};
    use chrono::NaiveDate;
    use object_store::path::Path;

    #[test]
    fn test_accepted_prefix_keys_survive_path_encoding() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let records: Vec<WorkloadMetadata> = ["app", "app_v2", "shop-eu", "db.main", "db%1", "team[x]"]
            .iter()
            .map(|prefix| {
                WorkloadMetadata::new(format!("c-{prefix}"))
                    .with_label("pgdump", "true")
                    .with_label("pgdump.username", "postgres")
                    .with_label("pgdump.prefix", *prefix)
            })
            .collect();

        let discovery = validate_records(&records, &LabelKeys::default());
        assert_eq!(discovery.targets.len(), 4);
        assert_eq!(discovery.rejections.len(), 2);

        for target in &discovery.targets {
            let key = artifact_key(&target.prefix, now);
            let listed = Path::from(key.as_str()).to_string();
            assert_eq!(listed, key);
            assert!(listed.starts_with(&period_key(target, now)));
            assert!(belongs_to(&target.prefix, &listed));
        }
    }
}
