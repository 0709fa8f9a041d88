//! Error types for bucket operations / 存储桶操作错误类型
//!
//! - [`OperatorError::Writer`] is the only error raised locally (input validation)
//! - everything else wraps what the SDK or the local filesystem reported

use s3::creds::error::CredentialsError;
use s3::error::S3Error;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OperatorError>;

#[derive(Error, Debug)]
pub enum OperatorError {
    /// Writer input validation failed (missing local file, absent payload) / 写入参数校验失败
    #[error("{0}")]
    Writer(String),

    /// SDK or transport error, passed through unchanged / SDK或传输层错误
    #[error("S3 request failed: {0}")]
    S3(#[from] S3Error),

    /// The service answered with a non-success status
    #[error("S3 {op} {bucket}/{key} returned status {code}")]
    Status {
        op: &'static str,
        bucket: String,
        key: String,
        code: u16,
    },

    #[error("Invalid S3 credentials: {0}")]
    Credentials(#[from] CredentialsError),

    /// Configuration errors / 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local filesystem errors (temp files, upload sources) / 本地文件错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OperatorError {
    pub fn writer(msg: impl Into<String>) -> Self {
        Self::Writer(msg.into())
    }

    /// Whether this is the writer validation error / 是否为写入校验错误
    pub fn is_writer_error(&self) -> bool {
        matches!(self, Self::Writer(_))
    }

    /// Turn a non-2xx status into an error
    pub(crate) fn check_status(op: &'static str, bucket: &str, key: &str, code: u16) -> Result<()> {
        if (200..300).contains(&code) {
            Ok(())
        } else {
            Err(Self::Status {
                op,
                bucket: bucket.to_string(),
                key: key.to_string(),
                code,
            })
        }
    }
}
