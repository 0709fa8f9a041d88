//! S3连接实现
//!
//! - 一个配置值构建所有句柄，每个实例只构建一次
//! - client: 区域 + 凭证 + 超时，首次使用时构建
//! - bucket: 每个存储桶一个句柄，按名称缓存
//! - 每个操作只发一次SDK请求，不做重试

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::Region;

use crate::config::S3Config;
use crate::error::{OperatorError, Result};
use crate::storage::{ObjectStore, ObjectSummary};

/// Low-level client handle shared by every bucket handle / 底层客户端句柄
pub struct S3Client {
    region: Region,
    credentials: Credentials,
    request_timeout: Duration,
    path_style: bool,
}

impl S3Client {
    /// 创建S3客户端（不发起网络请求）
    fn build(config: &S3Config) -> Result<Self> {
        config.check_signature_version()?;

        let credentials = Credentials::new(
            Some(&config.access_key_id),
            Some(&config.secret_access_key),
            config.session_token.as_deref(),
            None,
            None,
        )?;

        let region = if config.endpoint_url.is_empty() {
            Region::Custom {
                region: config.region.clone(),
                endpoint: format!("https://s3.{}.amazonaws.com", config.region),
            }
        } else {
            Region::Custom {
                region: config.region.clone(),
                endpoint: config.endpoint_url.clone(),
            }
        };

        Ok(Self {
            region,
            credentials,
            request_timeout: config.request_timeout(),
            path_style: config.force_path_style,
        })
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// 创建存储桶句柄
    fn bucket(&self, name: &str) -> Result<Box<Bucket>> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())?;

        let bucket = if self.path_style {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(bucket.with_request_timeout(self.request_timeout)?)
    }
}

/// S3 connection provider / S3连接提供者
pub struct S3Connection {
    config: S3Config,
    client: OnceCell<S3Client>,
    buckets: Mutex<HashMap<String, Arc<Bucket>>>,
}

impl S3Connection {
    pub fn new(config: S3Config) -> Self {
        Self {
            config,
            client: OnceCell::new(),
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &S3Config {
        &self.config
    }

    /// Client handle, built on first access / 获取客户端句柄
    pub fn client(&self) -> Result<&S3Client> {
        self.client.get_or_try_init(|| -> Result<S3Client> {
            let client = S3Client::build(&self.config)?;
            tracing::info!(
                "S3 client initialized: endpoint={}, region={}",
                self.config.endpoint_url,
                self.config.region
            );
            Ok(client)
        })
    }

    /// Bucket handle, built once per bucket name / 获取存储桶句柄
    pub fn bucket(&self, name: &str) -> Result<Arc<Bucket>> {
        let mut buckets = self.buckets.lock();
        if let Some(bucket) = buckets.get(name) {
            return Ok(bucket.clone());
        }

        let bucket: Arc<Bucket> = Arc::from(self.client()?.bucket(name)?);
        buckets.insert(name.to_string(), bucket.clone());
        tracing::debug!("S3 bucket handle created: {}", name);
        Ok(bucket)
    }
}

#[async_trait]
impl ObjectStore for S3Connection {
    async fn list_objects(&self, bucket_name: &str, prefix: &str) -> Result<Vec<ObjectSummary>> {
        let bucket = self.bucket(bucket_name)?;

        // 不带分隔符，递归列出前缀下的所有对象（SDK自动翻页）
        let results = bucket.list(prefix.to_string(), None).await?;

        let mut objects = Vec::new();
        for result in results {
            for obj in result.contents {
                objects.push(ObjectSummary {
                    bucket: bucket_name.to_string(),
                    key: obj.key,
                    size: obj.size as u64,
                    last_modified: Some(obj.last_modified),
                });
            }
        }

        tracing::debug!("S3 list {}/{}: {} objects", bucket_name, prefix, objects.len());
        Ok(objects)
    }

    async fn download(&self, bucket_name: &str, key: &str, dest: &mut tokio::fs::File) -> Result<()> {
        let bucket = self.bucket(bucket_name)?;
        let code = bucket.get_object_to_writer(key, dest).await?;
        OperatorError::check_status("get", bucket_name, key, code)?;

        tracing::debug!("S3 GetObject {}/{} -> {}", bucket_name, key, code);
        Ok(())
    }

    async fn upload_file(&self, bucket_name: &str, key: &str, local_file: &Path) -> Result<()> {
        let data = tokio::fs::read(local_file).await?;
        self.put_bytes(bucket_name, key, &data).await
    }

    async fn put_bytes(&self, bucket_name: &str, key: &str, data: &[u8]) -> Result<()> {
        let bucket = self.bucket(bucket_name)?;
        let response = bucket.put_object(key, data).await?;
        OperatorError::check_status("put", bucket_name, key, response.status_code())?;

        tracing::debug!("S3 PutObject {}/{} ({} bytes)", bucket_name, key, data.len());
        Ok(())
    }

    async fn delete(&self, bucket_name: &str, key: &str) -> Result<()> {
        let bucket = self.bucket(bucket_name)?;
        let response = bucket.delete_object(key).await?;
        OperatorError::check_status("delete", bucket_name, key, response.status_code())?;

        tracing::debug!("S3 DeleteObject {}/{}", bucket_name, key);
        Ok(())
    }
}
