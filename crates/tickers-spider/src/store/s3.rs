use super::{ObjectStore, PutObject};
use crate::error::BoxError;
use aws_sdk_s3::primitives::ByteStream;

#[derive(Clone, Debug)]
pub struct S3 {
    inner: aws_sdk_s3::Client,
}

impl S3 {
    pub fn new(inner: aws_sdk_s3::Client) -> Self {
        Self { inner }
    }
}

impl ObjectStore for S3 {
    async fn put_object(&self, object: PutObject) -> Result<(), BoxError> {
        self.inner
            .put_object()
            .bucket(object.bucket)
            .key(object.key)
            .acl(object.acl)
            .body(ByteStream::from(object.body))
            .content_length(object.content_length)
            .content_type(object.content_type)
            .content_disposition(object.content_disposition)
            .server_side_encryption(object.server_side_encryption)
            .send()
            .await?;
        Ok(())
    }
}
