use std::collections::BTreeSet;
use std::time::SystemTime;

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use log::{trace, warn};
use tokio::runtime::Runtime;

use crate::acl::{grant_headers, AclEntry, AclRole};
use crate::external_types;
use crate::metadata::ObjectMetadata;
use crate::options::WriteOptions;
use crate::path::CloudPath;
use crate::store::MetadataStore;
use crate::{AttributesError, Result};

/// A [`MetadataStore`] backed by S3
///
/// Lookups issue a `HeadObject` request for the object's headers and a
/// `GetObjectAcl` request for its grants. The async requests are driven by a
/// runtime owned by the store, so the store must not be used from inside
/// another tokio runtime.
///
/// # Example
/// ```no_run
/// use objattrs::{derive_attributes, CloudPath, S3Store};
///
/// let store = S3Store::new().unwrap();
/// let path = CloudPath::parse("s3://my-bucket/path/to/file").unwrap();
///
/// let attributes = derive_attributes(&path, &store).unwrap();
/// println!("{:?}", attributes.mime_type());
/// ```
pub struct S3Store {
    client: aws_sdk_s3::Client,
    runtime: Runtime,
}

impl S3Store {
    /// Creates a new `S3Store` with the AWS configuration from the environment
    ///
    /// This method does not check for connectivity or credentials.
    pub fn new() -> Result<S3Store> {
        let runtime = new_runtime()?;
        let config = runtime.block_on(aws_config::load_defaults(
            aws_config::BehaviorVersion::latest(),
        ));
        Ok(S3Store::with_runtime(&config, runtime))
    }

    /// Creates a new `S3Store` with a custom AWS `SdkConfig`
    ///
    /// Useful if you don't want to use the default config loaded from the
    /// environment, e.g. to point at a local S3-compatible endpoint.
    pub fn from_config(config: &external_types::SdkConfig) -> Result<S3Store> {
        Ok(S3Store::with_runtime(config, new_runtime()?))
    }

    fn with_runtime(config: &external_types::SdkConfig, runtime: Runtime) -> S3Store {
        S3Store {
            client: aws_sdk_s3::Client::new(config),
            runtime,
        }
    }

    /// Fetches the metadata of an object; `None` if S3 answers 404
    pub async fn fetch_metadata(&self, bucket: &str, key: &str) -> Result<Option<ObjectMetadata>> {
        trace!("HeadObject {bucket}/{key}");
        let head = match self.client.head_object().bucket(bucket).key(key).send().await {
            Ok(head) => head,
            Err(err)
                if err
                    .as_service_error()
                    .map_or(false, |e| e.is_not_found()) =>
            {
                return Ok(None)
            }
            Err(err) => return Err(err.into()),
        };
        let acl = self.fetch_acl(bucket, key).await;
        Ok(Some(metadata_from_head(&head, acl)))
    }

    /// Fetches the grants of an object
    ///
    /// Reading an ACL needs a permission that reading the object does not,
    /// so a failure here leaves the ACL absent instead of failing the lookup.
    async fn fetch_acl(&self, bucket: &str, key: &str) -> Option<BTreeSet<AclEntry>> {
        trace!("GetObjectAcl {bucket}/{key}");
        match self.client.get_object_acl().bucket(bucket).key(key).send().await {
            Ok(output) => Some(output.grants().iter().filter_map(AclEntry::from_grant).collect()),
            Err(err) => {
                warn!(
                    "could not read ACL of {bucket}/{key}: {}",
                    aws_sdk_s3::error::DisplayErrorContext(&err)
                );
                None
            }
        }
    }

    /// Uploads `content` to `path` with the given attributes
    ///
    /// This is an `async` method, see [`S3Store::write`] for the blocking
    /// version.
    pub async fn put(
        &self,
        path: &CloudPath,
        content: Bytes,
        options: &WriteOptions,
    ) -> Result<()> {
        if path.is_directory() {
            return Err(AttributesError::invalid(format!(
                "cannot write an object at directory path {path}"
            )));
        }
        let grants = grant_headers(options.acl())?;

        let mut request = self
            .client
            .put_object()
            .bucket(path.bucket())
            .key(path.key())
            .body(ByteStream::from(content))
            .set_cache_control(options.cache_control().map(str::to_string))
            .set_content_type(options.mime_type().map(str::to_string))
            .set_content_disposition(options.content_disposition().map(str::to_string))
            .set_content_encoding(options.content_encoding().map(str::to_string));
        for (name, value) in options.user_metadata() {
            request = request.metadata(name, value);
        }
        for (role, grantees) in grants {
            request = match role {
                AclRole::Reader => request.grant_read(grantees),
                AclRole::Owner => request.grant_full_control(grantees),
                AclRole::ReadAcl => request.grant_read_acp(grantees),
                AclRole::WriteAcl => request.grant_write_acp(grantees),
                // rejected by grant_headers
                AclRole::Writer => request,
            };
        }

        trace!("PutObject {path}");
        request.send().await?;
        Ok(())
    }

    /// Uploads `content` to `path` with the given attributes
    pub fn write(
        &self,
        path: &CloudPath,
        content: impl Into<Bytes>,
        options: &WriteOptions,
    ) -> Result<()> {
        self.runtime.block_on(self.put(path, content.into(), options))
    }
}

impl MetadataStore for S3Store {
    fn lookup(&self, bucket: &str, key: &str) -> Result<Option<ObjectMetadata>> {
        self.runtime.block_on(self.fetch_metadata(bucket, key))
    }
}

fn new_runtime() -> Result<Runtime> {
    Runtime::new().map_err(|err| {
        AttributesError::StoreUnavailable(format!("could not start runtime: {err}"))
    })
}

/// Builds the metadata of an object from its `HeadObject` response
///
/// The generation marker is the version id if the bucket is versioned, else
/// the ETag, else the modification time.
fn metadata_from_head(
    head: &external_types::HeadObjectOutput,
    acl: Option<BTreeSet<AclEntry>>,
) -> ObjectMetadata {
    let generation = head
        .version_id()
        .or(head.e_tag())
        .map(str::to_string)
        .or_else(|| head.last_modified().map(|t| t.to_millis().unwrap_or(t.secs()).to_string()))
        .unwrap_or_else(|| "0".to_string());

    ObjectMetadata {
        cache_control: head.cache_control().map(str::to_string),
        content_type: head.content_type().map(str::to_string),
        acl,
        content_disposition: head.content_disposition().map(str::to_string),
        content_encoding: head.content_encoding().map(str::to_string),
        user_metadata: head.metadata().cloned().unwrap_or_default(),
        size: head
            .content_length()
            .and_then(|len| u64::try_from(len).ok())
            .unwrap_or(0),
        generation,
        etag: head.e_tag().map(str::to_string),
        last_modified: head
            .last_modified()
            .and_then(|t| SystemTime::try_from(*t).ok()),
    }
}
