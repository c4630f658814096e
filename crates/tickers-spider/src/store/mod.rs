use crate::error::{BoxError, Error, Result};
use crate::{fs, mime};
use aws_sdk_s3::types::{ObjectCannedAcl, ServerSideEncryption};
use std::future::Future;
use std::path::Path;
use tracing::{debug, error, info};

mod s3;

pub use s3::S3;

/// Everything one PUT carries.
#[derive(Clone, Debug, PartialEq)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_length: i64,
    pub content_type: String,
    pub content_disposition: String,
    pub acl: ObjectCannedAcl,
    pub server_side_encryption: ServerSideEncryption,
}

/// An object store the dump can be uploaded to.
pub trait ObjectStore {
    fn put_object(
        &self,
        object: PutObject,
    ) -> impl Future<Output = std::result::Result<(), BoxError>> + Send;
}

/// Upload `dir/file_name` to `bucket`, keyed by the file name.
///
/// The file is read whole into memory; it is private, AES256 encrypted, and served as an
/// attachment. Returns the object key.
pub async fn upload_file<S>(store: &S, bucket: &str, dir: &Path, file_name: &str) -> Result<String>
where
    S: ObjectStore + Sync,
{
    let fail = |source: BoxError| {
        error!("failed to upload {file_name} to {bucket}, error({source})");
        Error::Upload {
            bucket: bucket.to_string(),
            key: file_name.to_string(),
            source,
        }
    };

    let body = fs::read_sized(&dir.join(file_name))
        .await
        .map_err(|err| fail(err.into()))?;
    let object = PutObject {
        bucket: bucket.to_string(),
        key: file_name.to_string(),
        content_length: body.len() as i64,
        content_type: mime::sniff(&body).to_string(),
        content_disposition: "attachment".to_string(),
        acl: ObjectCannedAcl::Private,
        server_side_encryption: ServerSideEncryption::Aes256,
        body,
    };
    debug!(
        "uploading {} bytes of {} to s3://{bucket}/{file_name}",
        object.content_length, object.content_type
    );

    store.put_object(object).await.map_err(fail)?;
    info!("uploaded s3://{bucket}/{file_name}");

    Ok(file_name.to_string())
}
