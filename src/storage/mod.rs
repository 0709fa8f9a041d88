use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

#[cfg(test)]
pub(crate) mod mock;

/// Object summary as returned by a bucket listing / 列举返回的对象摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub bucket: String,
    pub key: String,
    pub size: u64,
    pub last_modified: Option<String>,
}

/// Object descriptor handed to callers: bucket (`root`) plus key (`path`) / 对象描述
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub root: String,
    pub path: String,
}

impl From<ObjectSummary> for ObjectRef {
    fn from(obj: ObjectSummary) -> Self {
        Self {
            root: obj.bucket,
            path: obj.key,
        }
    }
}

/// Object store primitives (one SDK request each) / 对象存储原语
///
/// Implemented by [`crate::S3Connection`]; the reader and writer only talk to
/// this trait.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List objects in a bucket. `prefix` is a hint: implementations may
    /// return keys outside it, callers filter again.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectSummary>>;

    /// Stream an object's body into `dest` / 下载对象内容到文件
    async fn download(&self, bucket: &str, key: &str, dest: &mut tokio::fs::File) -> Result<()>;

    /// Upload a local file, replacing any existing object / 上传本地文件
    async fn upload_file(&self, bucket: &str, key: &str, local_file: &Path) -> Result<()>;

    /// Put raw bytes as the object body / 上传二进制数据
    async fn put_bytes(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()>;

    /// Delete a single object / 删除单个对象
    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;
}
