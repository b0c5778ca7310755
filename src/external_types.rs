/// Re-exported types from `aws_sdk_s3` and `aws_types`
pub use aws_types::sdk_config::SdkConfig;
pub use aws_sdk_s3::error::SdkError;
pub use aws_sdk_s3::operation::get_object_acl::GetObjectAclError;
pub use aws_sdk_s3::operation::head_object::HeadObjectError;
pub use aws_sdk_s3::operation::head_object::HeadObjectOutput;
pub use aws_sdk_s3::operation::put_object::PutObjectError;
pub use aws_sdk_s3::primitives::DateTime;
pub use aws_sdk_s3::types::{Grant, Grantee, Permission};
