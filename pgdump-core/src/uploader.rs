use crate::storage::{RemoteStore, ensure_success};
use crate::{DumpError, Result};
use std::path::Path;
use tracing::{info, instrument};

/// 上传本地备份文件，以文件名作为远端 key，只上传一次
#[instrument(skip(store))]
pub async fn upload<S: RemoteStore>(store: &S, local_path: &Path) -> Result<String> {
    let key = local_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| DumpError::upload(format!("无法获取文件名: {}", local_path.display())))?;

    let bytes = tokio::fs::read(local_path)
        .await
        .map_err(DumpError::upload)?;
    let size = bytes.len();

    let status = store.put(&key, bytes).await.map_err(DumpError::upload)?;
    ensure_success(status).map_err(DumpError::upload)?;

    info!(key = %key, size, "备份文件已上传");
    Ok(key)
}
