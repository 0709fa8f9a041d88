pub mod config;
pub mod error;
pub mod logging;
pub mod operator;
pub mod storage;

// Driver modules (point to project root drivers via path attribute) / 驱动模块
#[path = "../drivers/mod.rs"]
pub mod drivers;

pub use config::S3Config;
pub use drivers::s3::{S3Client, S3Connection};
pub use error::{OperatorError, Result};
pub use operator::{Reader, Writer};
pub use storage::{ObjectRef, ObjectStore, ObjectSummary};
