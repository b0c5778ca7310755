use std::collections::{BTreeSet, HashMap};
use std::time::SystemTime;

use crate::acl::AclEntry;
use crate::options::WriteOptions;

/// Classification of a path
///
/// Object storage has no symlinks or special files, so a path is always
/// either a directory or a regular file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileType {
    Directory,
    RegularFile,
}

impl FileType {
    pub fn is_dir(&self) -> bool {
        *self == FileType::Directory
    }

    pub fn is_file(&self) -> bool {
        *self == FileType::RegularFile
    }

    pub fn is_symlink(&self) -> bool {
        false
    }

    pub fn is_other(&self) -> bool {
        false
    }
}

/// Metadata of one stored object, as returned by a
/// [`MetadataStore`](crate::MetadataStore)
///
/// Every optional field is `None` unless the object was written with it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub cache_control: Option<String>,
    /// Content (MIME) type.
    pub content_type: Option<String>,
    pub acl: Option<BTreeSet<AclEntry>>,
    pub content_disposition: Option<String>,
    pub content_encoding: Option<String>,
    /// Custom user metadata.
    pub user_metadata: HashMap<String, String>,
    /// Object size in bytes.
    pub size: u64,
    /// Marker that changes with every write of the object.
    pub generation: String,
    pub etag: Option<String>,
    pub last_modified: Option<SystemTime>,
}

impl ObjectMetadata {
    /// Creates metadata with only the size and generation set.
    #[must_use]
    pub fn new(size: u64, generation: impl Into<String>) -> Self {
        Self {
            size,
            generation: generation.into(),
            ..Self::default()
        }
    }

    /// Creates the metadata a write with `options` leaves behind.
    #[must_use]
    pub fn from_options(options: &WriteOptions, size: u64, generation: impl Into<String>) -> Self {
        let acl = if options.acl().is_empty() {
            None
        } else {
            Some(options.acl().iter().cloned().collect())
        };
        Self {
            cache_control: options.cache_control().map(str::to_string),
            content_type: options.mime_type().map(str::to_string),
            acl,
            content_disposition: options.content_disposition().map(str::to_string),
            content_encoding: options.content_encoding().map(str::to_string),
            user_metadata: options.user_metadata().clone(),
            ..Self::new(size, generation)
        }
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    #[must_use]
    pub fn with_last_modified(mut self, last_modified: SystemTime) -> Self {
        self.last_modified = Some(last_modified);
        self
    }
}
