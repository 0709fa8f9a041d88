//! In-memory store for tests: records every call and can fail on demand.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use tokio::io::AsyncWriteExt;

use super::{ObjectStore, ObjectSummary};
use crate::error::{OperatorError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List(String),
    Download(String, String),
    UploadFile(String, String),
    PutBytes(String, String),
    Delete(String, String),
}

#[derive(Default)]
pub(crate) struct MockStore {
    /// (bucket, key, body) in listing order
    objects: Mutex<Vec<(String, String, Vec<u8>)>>,
    calls: Mutex<Vec<Call>>,
    fail_download: bool,
    /// 1-based index of the delete call that fails
    fail_delete_at: Option<usize>,
}

impl MockStore {
    pub fn with_objects(bucket: &str, keys: &[&str]) -> Self {
        let store = Self::default();
        for key in keys {
            store.insert(bucket, key, key.as_bytes().to_vec());
        }
        store
    }

    pub fn failing_download(mut self) -> Self {
        self.fail_download = true;
        self
    }

    pub fn failing_delete_at(mut self, n: usize) -> Self {
        self.fail_delete_at = Some(n);
        self
    }

    pub fn insert(&self, bucket: &str, key: &str, body: Vec<u8>) {
        let mut objects = self.objects.lock();
        objects.retain(|(b, k, _)| !(b == bucket && k == key));
        objects.push((bucket.to_string(), key.to_string(), body));
    }

    pub fn body(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .iter()
            .find(|(b, k, _)| b == bucket && k == key)
            .map(|(_, _, body)| body.clone())
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .iter()
            .filter(|(b, _, _)| b == bucket)
            .map(|(_, k, _)| k.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn upload_calls(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, Call::UploadFile(..) | Call::PutBytes(..)))
            .count()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::Delete(_, key) => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock();
        calls.push(call);
        calls.len()
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    /// Ignores the prefix hint and returns the whole bucket, like a plain listing.
    async fn list_objects(&self, bucket: &str, _prefix: &str) -> Result<Vec<ObjectSummary>> {
        self.record(Call::List(bucket.to_string()));
        Ok(self
            .objects
            .lock()
            .iter()
            .filter(|(b, _, _)| b == bucket)
            .map(|(b, k, body)| ObjectSummary {
                bucket: b.clone(),
                key: k.clone(),
                size: body.len() as u64,
                last_modified: None,
            })
            .collect())
    }

    async fn download(&self, bucket: &str, key: &str, dest: &mut tokio::fs::File) -> Result<()> {
        self.record(Call::Download(bucket.to_string(), key.to_string()));
        if self.fail_download {
            // leave a partial body on disk before failing
            dest.write_all(b"partial").await?;
            return Err(OperatorError::Other(anyhow::anyhow!("connection reset")));
        }

        let body = self.body(bucket, key).ok_or_else(|| OperatorError::Status {
            op: "get",
            bucket: bucket.to_string(),
            key: key.to_string(),
            code: 404,
        })?;
        dest.write_all(&body).await?;
        Ok(())
    }

    async fn upload_file(&self, bucket: &str, key: &str, local_file: &Path) -> Result<()> {
        self.record(Call::UploadFile(bucket.to_string(), key.to_string()));
        let body = tokio::fs::read(local_file).await?;
        self.insert(bucket, key, body);
        Ok(())
    }

    async fn put_bytes(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()> {
        self.record(Call::PutBytes(bucket.to_string(), key.to_string()));
        self.insert(bucket, key, data.to_vec());
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.record(Call::Delete(bucket.to_string(), key.to_string()));
        let nth = self.delete_calls().len();
        if self.fail_delete_at == Some(nth) {
            return Err(OperatorError::Status {
                op: "delete",
                bucket: bucket.to_string(),
                key: key.to_string(),
                code: 500,
            });
        }
        self.objects
            .lock()
            .retain(|(b, k, _)| !(b == bucket && k == key));
        Ok(())
    }
}
