use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;

use crate::config::S3Config;
use crate::drivers::s3::S3Connection;
use crate::error::{OperatorError, Result};
use crate::storage::{ObjectRef, ObjectStore};

/// Temp file suffix for a key: `"." + text after the last '.'` / 临时文件后缀
///
/// A key without any '.' yields `"." + key`.
pub fn temp_suffix(path: &str) -> String {
    format!(".{}", path.rsplit('.').next().unwrap_or(path))
}

/// Bucket reader / 存储桶读取器
pub struct Reader<S: ObjectStore + ?Sized = S3Connection> {
    store: Arc<S>,
    temp_dir: Option<PathBuf>,
}

impl<S: ObjectStore + ?Sized> Clone for Reader<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            temp_dir: self.temp_dir.clone(),
        }
    }
}

impl Reader<S3Connection> {
    /// Reader with its own lazily connected S3 handles
    pub fn from_config(config: S3Config) -> Self {
        Self::new(Arc::new(S3Connection::new(config)))
    }
}

impl<S: ObjectStore + ?Sized> Reader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            temp_dir: None,
        }
    }

    /// Create downloaded files in `dir` instead of the system temp directory
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// List objects in `root` whose key starts with `path` / 列出前缀下的对象
    ///
    /// An empty `path` returns the whole bucket.
    pub async fn list(&self, root: &str, path: &str) -> Result<Vec<ObjectRef>> {
        let objects = self.store.list_objects(root, path).await?;

        let refs: Vec<ObjectRef> = objects
            .into_iter()
            .filter(|obj| path.is_empty() || obj.key.starts_with(path))
            .map(ObjectRef::from)
            .collect();

        tracing::debug!("Listed {} objects under {}/{}", refs.len(), root, path);
        Ok(refs)
    }

    /// Download `root/path` into a new temp file and return its path / 下载对象到临时文件
    ///
    /// On success the file belongs to the caller. On failure it is removed
    /// and the download error is returned unchanged.
    pub async fn read(&self, root: &str, path: &str) -> Result<PathBuf> {
        let suffix = temp_suffix(path);
        let mut builder = tempfile::Builder::new();
        builder.suffix(&suffix);
        let temp = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        let mut dest = tokio::fs::File::from_std(temp.as_file().try_clone()?);
        let downloaded: Result<()> = async {
            self.store.download(root, path, &mut dest).await?;
            dest.flush().await?;
            Ok::<(), OperatorError>(())
        }
        .await;
        drop(dest);

        match downloaded {
            Ok(()) => {
                // 成功后保留文件，由调用方负责清理
                let (_file, local_path) = temp.keep().map_err(|e| OperatorError::Io(e.error))?;
                tracing::info!("Downloaded {}/{} to {:?}", root, path, local_path);
                Ok(local_path)
            }
            Err(e) => {
                tracing::warn!("Download of {}/{} failed, removing {:?}: {}", root, path, temp.path(), e);
                // NamedTempFile删除文件
                drop(temp);
                Err(e)
            }
        }
    }
}
