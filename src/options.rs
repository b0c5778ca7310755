//! Attribute options recognized when writing an object.
//!
//! These are consumed by the stores that can create objects
//! ([`MemoryStore`](crate::MemoryStore), [`S3Store`](crate::S3Store)); the
//! attribute model itself only ever reads the resulting metadata.

use std::collections::HashMap;

use crate::acl::AclEntry;

/// A single write option
///
/// A list of options collects into [`WriteOptions`]:
///
/// ```
/// use objattrs::{WriteOption, WriteOptions};
/// let options: WriteOptions = vec![
///     WriteOption::MimeType("text/potato".to_string()),
///     WriteOption::UserMetadata("green".to_string(), "bean".to_string()),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(options.mime_type(), Some("text/potato"));
/// assert_eq!(options.cache_control(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOption {
    CacheControl(String),
    MimeType(String),
    Acl(AclEntry),
    ContentDisposition(String),
    ContentEncoding(String),
    UserMetadata(String, String),
}

/// The attributes an object is written with
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    cache_control: Option<String>,
    mime_type: Option<String>,
    acl: Vec<AclEntry>,
    content_disposition: Option<String>,
    content_encoding: Option<String>,
    user_metadata: HashMap<String, String>,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cache_control(mut self, value: impl Into<String>) -> Self {
        self.apply(WriteOption::CacheControl(value.into()));
        self
    }

    #[must_use]
    pub fn with_mime_type(mut self, value: impl Into<String>) -> Self {
        self.apply(WriteOption::MimeType(value.into()));
        self
    }

    /// Adds an ACL entry; may be called repeatedly.
    #[must_use]
    pub fn with_acl(mut self, entry: AclEntry) -> Self {
        self.apply(WriteOption::Acl(entry));
        self
    }

    #[must_use]
    pub fn with_content_disposition(mut self, value: impl Into<String>) -> Self {
        self.apply(WriteOption::ContentDisposition(value.into()));
        self
    }

    #[must_use]
    pub fn with_content_encoding(mut self, value: impl Into<String>) -> Self {
        self.apply(WriteOption::ContentEncoding(value.into()));
        self
    }

    /// Adds a user metadata pair; a repeated key keeps the last value.
    #[must_use]
    pub fn with_user_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.apply(WriteOption::UserMetadata(key.into(), value.into()));
        self
    }

    /// Applies a single option, overriding an earlier value for the same field
    pub fn apply(&mut self, option: WriteOption) {
        match option {
            WriteOption::CacheControl(value) => self.cache_control = Some(value),
            WriteOption::MimeType(value) => self.mime_type = Some(value),
            WriteOption::Acl(entry) => self.acl.push(entry),
            WriteOption::ContentDisposition(value) => self.content_disposition = Some(value),
            WriteOption::ContentEncoding(value) => self.content_encoding = Some(value),
            WriteOption::UserMetadata(key, value) => {
                self.user_metadata.insert(key, value);
            }
        }
    }

    pub fn cache_control(&self) -> Option<&str> {
        self.cache_control.as_deref()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn acl(&self) -> &[AclEntry] {
        &self.acl
    }

    pub fn content_disposition(&self) -> Option<&str> {
        self.content_disposition.as_deref()
    }

    pub fn content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }

    pub fn user_metadata(&self) -> &HashMap<String, String> {
        &self.user_metadata
    }
}

impl FromIterator<WriteOption> for WriteOptions {
    fn from_iter<I: IntoIterator<Item = WriteOption>>(iter: I) -> Self {
        let mut options = WriteOptions::new();
        options.extend(iter);
        options
    }
}

impl Extend<WriteOption> for WriteOptions {
    fn extend<I: IntoIterator<Item = WriteOption>>(&mut self, iter: I) {
        for option in iter {
            self.apply(option);
        }
    }
}
