use std::path::Path;
use std::sync::Arc;

use crate::config::S3Config;
use crate::drivers::s3::S3Connection;
use crate::error::{OperatorError, Result};
use crate::storage::ObjectStore;

use super::Reader;

/// Bucket writer / 存储桶写入器
pub struct Writer<S: ObjectStore + ?Sized = S3Connection> {
    store: Arc<S>,
}

impl<S: ObjectStore + ?Sized> Clone for Writer<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl Writer<S3Connection> {
    pub fn from_config(config: S3Config) -> Self {
        Self::new(Arc::new(S3Connection::new(config)))
    }
}

impl<S: ObjectStore + ?Sized> Writer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Delete every object under `path`, one by one / 清空目录
    ///
    /// Stops at the first failed delete; objects after it are left in place.
    pub async fn clean_directory(&self, root: &str, path: &str) -> Result<()> {
        let reader = Reader::new(self.store.clone());
        let objects = reader.list(root, path).await?;

        for obj in &objects {
            self.remove_file(&obj.root, &obj.path).await?;
        }

        tracing::info!("Cleaned {}/{}: {} objects removed", root, path, objects.len());
        Ok(())
    }

    /// Delete a single object / 删除单个对象
    pub async fn remove_file(&self, root: &str, path: &str) -> Result<()> {
        self.store.delete(root, path).await?;
        tracing::debug!("Removed {}/{}", root, path);
        Ok(())
    }

    /// Upload a local file to `root/path` / 上传本地文件
    pub async fn write(&self, root: &str, path: &str, local_file: impl AsRef<Path>) -> Result<()> {
        let local_file = local_file.as_ref();
        let is_file = tokio::fs::metadata(local_file)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(OperatorError::writer(format!(
                "File: {} does not exist",
                local_file.display()
            )));
        }

        self.store.upload_file(root, path, local_file).await?;
        tracing::info!("Uploaded {:?} to {}/{}", local_file, root, path);
        Ok(())
    }

    /// Write raw bytes as the object body / 写入二进制数据
    pub async fn write_binary(&self, root: &str, path: &str, data: Option<&[u8]>) -> Result<()> {
        let data = data.ok_or_else(|| OperatorError::writer("No binary data to write"))?;

        self.store.put_bytes(root, path, data).await?;
        tracing::info!("Wrote {} bytes to {}/{}", data.len(), root, path);
        Ok(())
    }
}
