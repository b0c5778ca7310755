use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use bytes::Bytes;
use log::trace;
use parking_lot::RwLock;

use crate::metadata::ObjectMetadata;
use crate::options::WriteOptions;
use crate::path::CloudPath;
use crate::{AttributesError, Result};

/// Read access to object metadata
///
/// Implementations must be safe to call from several threads at once;
/// [`derive_attributes`](crate::derive_attributes) adds no locking of its own.
pub trait MetadataStore: Send + Sync {
    /// Returns the metadata of the object at `key` in `bucket`, or `None` if
    /// there is no such object.
    fn lookup(&self, bucket: &str, key: &str) -> Result<Option<ObjectMetadata>>;
}

impl<T: MetadataStore + ?Sized> MetadataStore for Arc<T> {
    fn lookup(&self, bucket: &str, key: &str) -> Result<Option<ObjectMetadata>> {
        (**self).lookup(bucket, key)
    }
}

impl<T: MetadataStore + ?Sized> MetadataStore for &T {
    fn lookup(&self, bucket: &str, key: &str) -> Result<Option<ObjectMetadata>> {
        (**self).lookup(bucket, key)
    }
}

struct StoredObject {
    content: Bytes,
    metadata: ObjectMetadata,
}

/// An in-process object store
///
/// Every write replaces the object's content and metadata and assigns a new
/// generation, so re-deriving attributes after a write yields a new
/// [`FileKey`](crate::FileKey).
///
/// # Example
///
/// ```
/// use objattrs::{CloudPath, MemoryStore, MetadataStore, WriteOptions};
///
/// let store = MemoryStore::new();
/// let path = CloudPath::parse("gs://bucket/randompath").unwrap();
/// store.write(&path, "hello", &WriteOptions::new().with_cache_control("potato")).unwrap();
///
/// let metadata = store.lookup("bucket", "randompath").unwrap().unwrap();
/// assert_eq!(metadata.cache_control.as_deref(), Some("potato"));
/// assert_eq!(metadata.size, 5);
/// ```
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<(String, String), StoredObject>>,
    generation: AtomicU64,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Stores `content` at `path` with the given attributes
    ///
    /// Returns the metadata the store now holds for the object. Directory
    /// paths cannot hold objects and are rejected.
    pub fn write(
        &self,
        path: &CloudPath,
        content: impl Into<Bytes>,
        options: &WriteOptions,
    ) -> Result<ObjectMetadata> {
        if path.is_directory() {
            return Err(AttributesError::invalid(format!(
                "cannot write an object at directory path {path}"
            )));
        }
        self.check_available()?;

        let content = content.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let metadata =
            ObjectMetadata::from_options(options, content.len() as u64, generation.to_string())
                .with_last_modified(SystemTime::now());
        trace!("write {path} generation {generation}");

        self.objects.write().insert(
            (path.bucket().to_string(), path.key().to_string()),
            StoredObject {
                content,
                metadata: metadata.clone(),
            },
        );
        Ok(metadata)
    }

    /// Returns the content of the object at `path`, if there is one
    pub fn read(&self, path: &CloudPath) -> Result<Option<Bytes>> {
        self.check_available()?;
        Ok(self
            .objects
            .read()
            .get(&(path.bucket().to_string(), path.key().to_string()))
            .map(|object| object.content.clone()))
    }

    /// Removes the object at `path`; returns whether there was one
    pub fn delete(&self, path: &CloudPath) -> Result<bool> {
        self.check_available()?;
        trace!("delete {path}");
        Ok(self
            .objects
            .write()
            .remove(&(path.bucket().to_string(), path.key().to_string()))
            .is_some())
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes every subsequent call fail with
    /// [`AttributesError::StoreUnavailable`] until reset
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AttributesError::StoreUnavailable(
                "memory store is offline".to_string(),
            ));
        }
        Ok(())
    }
}

impl MetadataStore for MemoryStore {
    fn lookup(&self, bucket: &str, key: &str) -> Result<Option<ObjectMetadata>> {
        self.check_available()?;
        trace!("lookup {bucket}/{key}");
        Ok(self
            .objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|object| object.metadata.clone()))
    }
}
