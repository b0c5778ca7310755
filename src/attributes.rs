//! The attribute view of a path.
//!
//! [`derive_attributes`] turns a [`CloudPath`] and the metadata of its object
//! into an immutable [`FileAttributes`] snapshot. Directory paths are
//! classified from the trailing delimiter alone and never touch the store.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::time::SystemTime;

use log::debug;

use crate::acl::AclEntry;
use crate::metadata::{FileType, ObjectMetadata};
use crate::path::{CloudPath, DEFAULT_DELIMITER};
use crate::store::MetadataStore;
use crate::{AttributesError, Result};

/// Identity of a path
///
/// Keys of distinct paths never compare equal, and a directory key never
/// equals an object key. The delimiter a path was classified with is part of
/// its key, just as it is part of the path. An object's key also carries the
/// generation it was read at, so it changes when the object is rewritten.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileKey(KeyKind);

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum KeyKind {
    Directory {
        bucket: String,
        key: String,
        delimiter: char,
    },
    Object {
        bucket: String,
        key: String,
        delimiter: char,
        generation: String,
    },
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delimiter = match &self.0 {
            KeyKind::Directory {
                bucket,
                key,
                delimiter,
            } => {
                write!(f, "dir:{bucket}/{key}")?;
                *delimiter
            }
            KeyKind::Object {
                bucket,
                key,
                delimiter,
                generation,
            } => {
                write!(f, "obj:{bucket}/{key}#{generation}")?;
                *delimiter
            }
        };
        if delimiter != DEFAULT_DELIMITER {
            write!(f, " (delimiter {delimiter:?})")?;
        }
        Ok(())
    }
}

/// Returns the key of a directory path
///
/// Fails with [`AttributesError::InvalidArgument`] if `path` is not a
/// directory.
pub fn file_key_of_directory(path: &CloudPath) -> Result<FileKey> {
    if !path.is_directory() {
        return Err(AttributesError::invalid(format!("{path} is not a directory")));
    }
    Ok(FileKey(KeyKind::Directory {
        bucket: path.bucket().to_string(),
        key: path.key().to_string(),
        delimiter: path.delimiter(),
    }))
}

/// Returns the key of the object at `path` as of `generation`
///
/// Fails with [`AttributesError::InvalidArgument`] if `path` is a directory
/// or `generation` is empty.
pub fn file_key_of_object(path: &CloudPath, generation: &str) -> Result<FileKey> {
    if path.is_directory() {
        return Err(AttributesError::invalid(format!(
            "{path} is a directory, not an object"
        )));
    }
    if generation.is_empty() {
        return Err(AttributesError::invalid(format!(
            "empty generation marker for {path}"
        )));
    }
    Ok(FileKey(KeyKind::Object {
        bucket: path.bucket().to_string(),
        key: path.key().to_string(),
        delimiter: path.delimiter(),
        generation: generation.to_string(),
    }))
}

/// Attributes of a path at the moment they were read
///
/// Two snapshots are equal when they come from the same path and the same
/// metadata. A snapshot is never updated; read again to see later writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileAttributes {
    path: CloudPath,
    file_type: FileType,
    file_key: FileKey,
    cache_control: Option<String>,
    mime_type: Option<String>,
    acl: Option<BTreeSet<AclEntry>>,
    content_disposition: Option<String>,
    content_encoding: Option<String>,
    user_metadata: HashMap<String, String>,
    size: u64,
    generation: Option<String>,
    etag: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileAttributes {
    fn directory(path: &CloudPath) -> Result<FileAttributes> {
        Ok(FileAttributes {
            path: path.clone(),
            file_type: FileType::Directory,
            file_key: file_key_of_directory(path)?,
            cache_control: None,
            mime_type: None,
            acl: None,
            content_disposition: None,
            content_encoding: None,
            user_metadata: HashMap::new(),
            size: 0,
            generation: None,
            etag: None,
            last_modified: None,
        })
    }

    fn object(path: &CloudPath, metadata: ObjectMetadata) -> Result<FileAttributes> {
        Ok(FileAttributes {
            path: path.clone(),
            file_type: FileType::RegularFile,
            file_key: file_key_of_object(path, &metadata.generation)?,
            cache_control: metadata.cache_control,
            mime_type: metadata.content_type,
            acl: metadata.acl,
            content_disposition: metadata.content_disposition,
            content_encoding: metadata.content_encoding,
            user_metadata: metadata.user_metadata,
            size: metadata.size,
            generation: Some(metadata.generation),
            etag: metadata.etag,
            last_modified: metadata.last_modified,
        })
    }

    /// The path these attributes were derived from
    pub fn path(&self) -> &CloudPath {
        &self.path
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn file_key(&self) -> &FileKey {
        &self.file_key
    }

    pub fn is_directory(&self) -> bool {
        self.file_type.is_dir()
    }

    pub fn is_regular_file(&self) -> bool {
        self.file_type.is_file()
    }

    /// Always `false`: object storage has no special files
    pub fn is_other(&self) -> bool {
        self.file_type.is_other()
    }

    /// Always `false`: object storage has no symbolic links
    pub fn is_symbolic_link(&self) -> bool {
        self.file_type.is_symlink()
    }

    pub fn cache_control(&self) -> Option<&str> {
        self.cache_control.as_deref()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn acl(&self) -> Option<&BTreeSet<AclEntry>> {
        self.acl.as_ref()
    }

    pub fn content_disposition(&self) -> Option<&str> {
        self.content_disposition.as_deref()
    }

    pub fn content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }

    /// User metadata; empty for directories
    pub fn user_metadata(&self) -> &HashMap<String, String> {
        &self.user_metadata
    }

    /// Value of one user metadata entry, `None` if it was never set
    pub fn user_metadata_value(&self, name: &str) -> Option<&str> {
        self.user_metadata.get(name).map(String::as_str)
    }

    /// Object size in bytes, `0` for directories
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Generation of the object; `None` for directories
    pub fn generation(&self) -> Option<&str> {
        self.generation.as_deref()
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Last modification time; `None` for directories
    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }
}

/// Derives the attributes of `path`
///
/// A directory path yields a directory view without a store lookup. Any
/// other path is looked up in `store`; a missing object is
/// [`AttributesError::NotFound`], and store failures are passed through
/// unchanged.
///
/// # Example
///
/// ```
/// use objattrs::{derive_attributes, CloudPath, MemoryStore};
///
/// let store = MemoryStore::new();
/// let dir = CloudPath::parse("gs://bucket/randompath/").unwrap();
///
/// let attributes = derive_attributes(&dir, &store).unwrap();
/// assert!(attributes.is_directory());
/// assert!(attributes.user_metadata().is_empty());
/// ```
pub fn derive_attributes<S>(path: &CloudPath, store: &S) -> Result<FileAttributes>
where
    S: MetadataStore + ?Sized,
{
    if path.is_directory() {
        debug!("attributes of {path}: directory");
        return FileAttributes::directory(path);
    }

    match store.lookup(path.bucket(), path.key())? {
        Some(metadata) => {
            debug!(
                "attributes of {path}: object, generation {}",
                metadata.generation
            );
            FileAttributes::object(path, metadata)
        }
        None => {
            debug!("attributes of {path}: no object");
            Err(AttributesError::NotFound(path.to_string()))
        }
    }
}

/// Parses `uri` and derives its attributes
///
/// ```
/// use objattrs::{read_attributes, AttributesError, MemoryStore};
///
/// let store = MemoryStore::new();
/// assert!(matches!(
///     read_attributes("", &store),
///     Err(AttributesError::InvalidArgument(_))
/// ));
/// assert!(matches!(
///     read_attributes("gs://bucket/randompath", &store),
///     Err(AttributesError::NotFound(_))
/// ));
/// ```
pub fn read_attributes<S>(uri: &str, store: &S) -> Result<FileAttributes>
where
    S: MetadataStore + ?Sized,
{
    derive_attributes(&CloudPath::parse(uri)?, store)
}
