//! S3-compatible package source.
//!
//! Serves the same layout as [`DirSource`](crate::DirSource) from a bucket:
//! `<prefix>/<namespace>/<name>/index.json` holds the JSON array of
//! published revision manifests, and each revision's payload lives under
//! `<prefix>/<namespace>/<name>/<revision>/`. Works against AWS S3 and
//! S3-compatible services (Backblaze B2, Tigris, MinIO).
//!
//! # Credentials
//!
//! Credentials are provided explicitly by the hosting application; the AWS
//! SDK credential-provider chain is not consulted.

use crate::error::{ErrorKind, Result};
use crate::manifest::{Manifest, validate_payload_path};
use crate::source::PackageSource;
use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region, retry::RetryConfig},
};
use exn::ResultExt;
use std::path::Path;

const INDEX_FILE: &str = "index.json";

/// S3-compatible package source.
///
/// # Examples
///
/// ```no_run
/// use gibbs_registry::S3Source;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = S3Source::new(
///     "data-packages",
///     "my-bucket",
///     Some("packages/".to_string()),
///     "us-west-004",
///     Some("https://s3.us-west-004.backblazeb2.com".to_string()),
///     "access_key_id",
///     "secret_access_key",
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct S3Source {
    name: String,
    client: Client,
    bucket: String,
    prefix: Option<String>,
}

impl S3Source {
    /// Create a new S3 package source.
    ///
    /// # Arguments
    /// * `name` - A name for this source (used in logging)
    /// * `bucket` - S3 bucket name
    /// * `prefix` - Optional key prefix (acts as virtual directory)
    /// * `region` - AWS region or provider-specific region
    /// * `endpoint` - Custom endpoint URL for S3-compatible services
    /// * `key_id` - AWS/provider access key ID
    /// * `key_secret` - AWS/provider secret access key
    pub fn new(
        name: impl Into<String>,
        bucket: impl Into<String>,
        prefix: Option<String>,
        region: impl Into<String>,
        endpoint: Option<impl Into<String>>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Credentials::new(key_id, key_secret, None, None, "gibbs-config");
        let mut config_builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(region.into()))
            // Exponential backoff: 1 initial attempt + 3 retries
            .retry_config(RetryConfig::standard().with_max_attempts(4))
            // Path-style addressing for compatibility with S3-compatible
            // services (Backblaze, MinIO, etc.)
            .force_path_style(true);
        if let Some(endpoint_url) = endpoint {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }
        Ok(Self {
            name: name.into(),
            client: Client::from_conf(config_builder.build()),
            bucket: bucket.into(),
            prefix: prefix.map(|p| p.trim_end_matches('/').to_string()),
        })
    }

    fn full_key(&self, relative: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}/{relative}"),
            None => relative.to_string(),
        }
    }

    /// Fetch an object body, or `None` for a missing key.
    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let response = match self.client.get_object().bucket(&self.bucket).key(key).send().await {
            Ok(response) => response,
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_key()) => return Ok(None),
            Err(err) => exn::bail!(ErrorKind::Network(err.to_string())),
        };
        let bytes = response.body.collect().await.map_err(|e| ErrorKind::Network(e.to_string()))?;
        Ok(Some(bytes.into_bytes().to_vec()))
    }
}

#[async_trait]
impl PackageSource for S3Source {
    fn name(&self) -> &str {
        &self.name
    }

    async fn manifests(&self, package: &str) -> Result<Vec<Manifest>> {
        // Guard against a package name smuggling `..` into the key space;
        // keys are flat strings but downstream installs join on it.
        validate_payload_path(package)?;
        let key = self.full_key(&format!("{package}/{INDEX_FILE}"));
        let Some(bytes) = self.get_object(&key).await? else {
            exn::bail!(ErrorKind::PackageNotFound(package.to_string()));
        };
        let manifests: Vec<Manifest> =
            serde_json::from_slice(&bytes).or_raise(|| ErrorKind::InvalidManifest)?;
        for manifest in &manifests {
            for file in &manifest.files {
                validate_payload_path(file)?;
            }
        }
        Ok(manifests)
    }

    async fn read_file(&self, manifest: &Manifest, path: &Path) -> Result<Vec<u8>> {
        let validated = validate_payload_path(path)?;
        let relative = validated.to_string_lossy();
        let key = self.full_key(&format!("{}/{}/{relative}", manifest.package, manifest.revision));
        match self.get_object(&key).await? {
            Some(bytes) => Ok(bytes),
            None => exn::bail!(ErrorKind::Io(std::io::Error::from(std::io::ErrorKind::NotFound))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(prefix: Option<&str>) -> S3Source {
        S3Source::new(
            "test",
            "bucket",
            prefix.map(str::to_string),
            "auto",
            None::<String>,
            "key",
            "secret",
        )
        .unwrap()
    }

    #[test]
    fn test_full_key_without_prefix() {
        let source = source(None);
        assert_eq!(source.full_key("ns/pkg/index.json"), "ns/pkg/index.json");
    }

    #[test]
    fn test_full_key_with_prefix() {
        let source = source(Some("packages"));
        assert_eq!(source.full_key("ns/pkg/index.json"), "packages/ns/pkg/index.json");
    }

    #[test]
    fn test_trailing_slash_prefix_is_normalized() {
        let source = source(Some("packages/"));
        assert_eq!(source.full_key("ns/pkg/index.json"), "packages/ns/pkg/index.json");
    }
}
