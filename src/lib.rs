#![doc = include_str!("../README.md")]

use thiserror::Error;

pub mod acl;
pub mod attributes;
pub mod external_types;
pub mod metadata;
pub mod options;
pub mod path;
pub mod s3;
pub mod store;

pub use acl::{AclEntity, AclEntry, AclRole};
pub use attributes::{
    derive_attributes, file_key_of_directory, file_key_of_object, read_attributes,
    FileAttributes, FileKey,
};
pub use metadata::{FileType, ObjectMetadata};
pub use options::{WriteOption, WriteOptions};
pub use path::CloudPath;
pub use s3::S3Store;
pub use store::{MemoryStore, MetadataStore};

/// A specialized `Result` type for attribute operations.
pub type Result<T> = std::result::Result<T, AttributesError>;

/// Errors returned when deriving attributes or talking to a store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributesError {
    /// A path, URI or other argument is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// No object backs a non-directory path.
    #[error("no such object: {0}")]
    NotFound(String),
    /// The metadata store failed; the cause is passed through as text.
    #[error("object store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AttributesError {
    pub(crate) fn invalid(message: impl Into<String>) -> AttributesError {
        AttributesError::InvalidArgument(message.into())
    }
}

impl<E, R> From<external_types::SdkError<E, R>> for AttributesError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(err: external_types::SdkError<E, R>) -> AttributesError {
        AttributesError::StoreUnavailable(
            aws_sdk_s3::error::DisplayErrorContext(&err).to_string(),
        )
    }
}

impl From<AttributesError> for std::io::Error {
    fn from(error: AttributesError) -> std::io::Error {
        let kind = match error {
            AttributesError::InvalidArgument(_) => std::io::ErrorKind::InvalidInput,
            AttributesError::NotFound(_) => std::io::ErrorKind::NotFound,
            AttributesError::StoreUnavailable(_) => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, error)
    }
}
