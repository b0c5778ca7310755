use std::fmt;

use crate::{AttributesError, Result};

/// Delimiter used when none is configured
pub const DEFAULT_DELIMITER: char = '/';

/// URI schemes accepted by [`CloudPath::parse`]
pub const SCHEMES: [&str; 2] = ["s3", "gs"];

/// The location of an object, or of an implied directory, in a bucket
///
/// The key is normalized on construction, so two paths that name the same
/// entry compare equal. A key that is empty or ends with the delimiter is
/// directory-like.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CloudPath {
    bucket: String,
    key: String,
    delimiter: char,
}

impl CloudPath {
    /// Returns a `CloudPath` for `key` in `bucket`, using `/` as delimiter
    ///
    /// # Example
    ///
    /// ```
    /// use objattrs::CloudPath;
    /// let path = CloudPath::new("mybucket", "path//to/./file.xls").unwrap();
    ///
    /// assert_eq!(path.bucket(), "mybucket");
    /// assert_eq!(path.key(), "path/to/file.xls");
    /// assert!(!path.is_directory());
    /// ```
    pub fn new(bucket: &str, key: &str) -> Result<CloudPath> {
        CloudPath::with_delimiter(bucket, key, DEFAULT_DELIMITER)
    }

    /// Returns a `CloudPath` whose directory classification uses `delimiter`
    pub fn with_delimiter(bucket: &str, key: &str, delimiter: char) -> Result<CloudPath> {
        if bucket.is_empty() {
            return Err(AttributesError::invalid("bucket name must not be empty"));
        }
        if bucket.contains(delimiter) {
            return Err(AttributesError::invalid(format!(
                "bucket name {bucket:?} contains the delimiter {delimiter:?}"
            )));
        }
        Ok(CloudPath {
            bucket: bucket.to_string(),
            key: normalize_key(key, delimiter),
            delimiter,
        })
    }

    /// Returns a `CloudPath` for a `s3://` or `gs://` URI
    ///
    /// A URI without a key, such as `gs://bucket`, names the bucket root.
    ///
    /// # Example
    ///
    /// ```
    /// use objattrs::CloudPath;
    /// let dir = CloudPath::parse("gs://bucket/randompath/").unwrap();
    ///
    /// assert_eq!(dir.bucket(), "bucket");
    /// assert_eq!(dir.key(), "randompath/");
    /// assert!(dir.is_directory());
    /// ```
    pub fn parse(uri: &str) -> Result<CloudPath> {
        if uri.is_empty() {
            return Err(AttributesError::invalid("URI must not be empty"));
        }
        let rest = SCHEMES
            .iter()
            .find_map(|scheme| {
                uri.strip_prefix(scheme)
                    .and_then(|rest| rest.strip_prefix("://"))
            })
            .ok_or_else(|| AttributesError::invalid(format!("unsupported URI scheme in {uri:?}")))?;

        let (bucket, key) = match rest.find(DEFAULT_DELIMITER) {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => (rest, ""),
        };
        if bucket.is_empty() {
            return Err(AttributesError::invalid(format!("missing bucket in {uri:?}")));
        }
        CloudPath::new(bucket, key)
    }

    /// Returns the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Returns the normalized key
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Whether the key names a directory: it is the bucket root or ends with
    /// the delimiter. No backing object is needed.
    pub fn is_directory(&self) -> bool {
        self.key.is_empty() || self.key.ends_with(self.delimiter)
    }

    /// Renders the path as a URI with the given scheme
    ///
    /// ```
    /// use objattrs::CloudPath;
    /// let path = CloudPath::parse("gs://bucket/a/b").unwrap();
    /// assert_eq!(path.to_uri("s3"), "s3://bucket/a/b");
    /// ```
    pub fn to_uri(&self, scheme: &str) -> String {
        format!("{scheme}://{self}")
    }
}

impl fmt::Display for CloudPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Collapses repeated delimiters, drops `.` segments and resolves `..`
/// against the preceding segment. The trailing delimiter survives, and a
/// key ending in `.` or `..` also names a directory.
fn normalize_key(key: &str, delimiter: char) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let mut trailing = false;
    for segment in key.split(delimiter) {
        trailing = matches!(segment, "" | "." | "..");
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join(delimiter.to_string().as_str());
    if trailing && !normalized.is_empty() {
        normalized.push(delimiter);
    }
    normalized
}
