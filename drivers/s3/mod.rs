//! S3 object storage connection / S3对象存储连接

pub mod driver;

pub use driver::{S3Client, S3Connection};
