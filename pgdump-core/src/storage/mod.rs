// 模块声明
mod s3;

// 重新导出公共API
pub use s3::S3Store;

use crate::{DumpError, Result};

/// 远端对象存储
///
/// 存储桶在构造实现时绑定。`put` 与 `delete_many` 返回请求的状态码，
/// 大于 299 的状态码视为失败，参见 [`ensure_success`]。
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// 列出存储桶内所有对象的 key
    async fn list(&self) -> Result<Vec<String>>;

    /// 上传一个对象
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<u16>;

    /// 批量删除对象
    async fn delete_many(&self, keys: &[String]) -> Result<u16>;
}

/// 状态码大于 299 时返回错误
pub fn ensure_success(status: u16) -> Result<()> {
    if status > 299 {
        return Err(DumpError::Status(status));
    }
    Ok(())
}
