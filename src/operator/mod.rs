//! Bucket operators / 存储桶操作
//!
//! [`Reader`] lists and downloads, [`Writer`] uploads and deletes. Both share
//! one [`crate::storage::ObjectStore`] through an `Arc`.

pub mod reader;
pub mod writer;

pub use reader::Reader;
pub use writer::Writer;
