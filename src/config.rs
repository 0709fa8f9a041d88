//! Connection configuration module / 连接配置模块
//!
//! Loaded once from the environment or a JSON file, then passed by value to
//! [`crate::S3Connection::new`]. There is no global instance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::{OperatorError, Result};

/// Default connect/read timeout in seconds / 默认超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 1500;

/// Signature version spellings accepted for SigV4 / 支持的签名版本
const SIGV4_NAMES: &[&str] = &["s3v4", "v4", "aws4-hmac-sha256"];

/// S3 connection configuration / S3连接配置
#[derive(Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// S3 endpoint URL / S3端点地址
    /// AWS: https://s3.{region}.amazonaws.com
    /// MinIO: http://localhost:9000
    pub endpoint_url: String,
    /// Access Key ID
    pub access_key_id: String,
    /// Secret Access Key
    pub secret_access_key: String,
    /// Session token for temporary credentials / 临时凭证的会话令牌
    #[serde(default)]
    pub session_token: Option<String>,
    /// Region / 区域
    #[serde(default = "default_region")]
    pub region: String,
    /// Signature version, only SigV4 is supported / 签名版本
    #[serde(default = "default_signature_version")]
    pub signature_version: String,
    /// Connect timeout (seconds) / 连接超时
    #[serde(default = "default_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout (seconds) / 读取超时
    #[serde(default = "default_timeout")]
    pub read_timeout_secs: u64,
    /// 强制使用路径风格（而非虚拟主机风格）
    /// MinIO等需要设置为true
    #[serde(default)]
    pub force_path_style: bool,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_signature_version() -> String {
    "s3v4".to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            session_token: None,
            region: default_region(),
            signature_version: default_signature_version(),
            connect_timeout_secs: default_timeout(),
            read_timeout_secs: default_timeout(),
            force_path_style: false,
        }
    }
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("endpoint_url", &self.endpoint_url)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .field("signature_version", &self.signature_version)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

impl S3Config {
    /// Load from process environment / 从环境变量加载配置
    ///
    /// Required: `S3_ENDPOINT_URL`, `S3_ACCESS_KEY_ID`, `S3_SECRET_ACCESS_KEY`.
    /// Optional: `S3_REGION`, `S3_SIGNED_VERSION`, `S3_SESSION_TOKEN`,
    /// `S3_FORCE_PATH_STYLE`, `S3_CONNECT_TIMEOUT`, `S3_READ_TIMEOUT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup / 通过变量查找函数构建配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| OperatorError::Config(format!("{} must be set", name)))
        };
        let timeout = |name: &str| -> Result<u64> {
            match lookup(name) {
                Some(v) => v
                    .trim()
                    .parse()
                    .map_err(|e| OperatorError::Config(format!("{}: {}", name, e))),
                None => Ok(DEFAULT_TIMEOUT_SECS),
            }
        };

        let force_path_style = match lookup("S3_FORCE_PATH_STYLE") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|e| OperatorError::Config(format!("S3_FORCE_PATH_STYLE: {}", e)))?,
            None => false,
        };

        let config = Self {
            endpoint_url: required("S3_ENDPOINT_URL")?,
            access_key_id: required("S3_ACCESS_KEY_ID")?,
            secret_access_key: required("S3_SECRET_ACCESS_KEY")?,
            session_token: lookup("S3_SESSION_TOKEN").filter(|v| !v.is_empty()),
            region: lookup("S3_REGION").unwrap_or_else(default_region),
            signature_version: lookup("S3_SIGNED_VERSION").unwrap_or_else(default_signature_version),
            connect_timeout_secs: timeout("S3_CONNECT_TIMEOUT")?,
            read_timeout_secs: timeout("S3_READ_TIMEOUT")?,
            force_path_style,
        };

        tracing::debug!("Loaded S3 configuration from environment: {:?}", config);
        Ok(config)
    }

    /// Load from a JSON file / 从JSON文件加载配置
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| OperatorError::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| OperatorError::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        tracing::info!("Loaded S3 configuration from {:?}", path);
        Ok(config)
    }

    /// Reject anything but SigV4, the only scheme the SDK signs with / 校验签名版本
    pub fn check_signature_version(&self) -> Result<()> {
        let version = self.signature_version.trim().to_ascii_lowercase();
        if SIGV4_NAMES.contains(&version.as_str()) {
            Ok(())
        } else {
            Err(OperatorError::Config(format!(
                "Unsupported signature version: {}",
                self.signature_version
            )))
        }
    }

    /// SDK request timeout: the larger of connect and read timeouts
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(self.read_timeout_secs))
    }
}
