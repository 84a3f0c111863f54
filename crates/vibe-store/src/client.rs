//! Store client implementation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use vibe_models::{CompositionSpec, RemoteResource, ResourceIdentifier};

use crate::error::{StoreError, StoreResult};
use crate::locator;

/// Default upload timeout (seconds).
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 120;

/// Default fetch timeout (seconds). Materialization of a long concatenation
/// can take a while on the store side, so this is generous.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 300;

/// Configuration for the store client.
///
/// Credentials are always explicit: `from_env` fails with a typed error when
/// a required variable is unset, and nothing is embedded as a fallback.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Upload API base URL
    pub api_base_url: String,
    /// Delivery base URL (derived media is requested against this host)
    pub delivery_base_url: String,
    /// Cloud (tenant) name
    pub cloud_name: String,
    /// API key
    pub api_key: String,
    /// API secret used for request signing
    pub api_secret: String,
    /// Timeout for one publish call
    pub upload_timeout: Duration,
    /// Timeout for one fetch call
    pub fetch_timeout: Duration,
}

impl StoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        let api_base_url = std::env::var("MEDIA_STORE_API_URL")
            .unwrap_or_else(|_| "https://api.mediastore.io/v1".to_string());
        let delivery_base_url = std::env::var("MEDIA_STORE_DELIVERY_URL")
            .unwrap_or_else(|_| "https://media.mediastore.io".to_string());

        for base in [&api_base_url, &delivery_base_url] {
            url::Url::parse(base)
                .map_err(|e| StoreError::config_error(format!("invalid base URL '{}': {}", base, e)))?;
        }

        Ok(Self {
            api_base_url,
            delivery_base_url,
            cloud_name: std::env::var("MEDIA_STORE_CLOUD_NAME")
                .map_err(|_| StoreError::config_error("MEDIA_STORE_CLOUD_NAME not set"))?,
            api_key: std::env::var("MEDIA_STORE_API_KEY")
                .map_err(|_| StoreError::config_error("MEDIA_STORE_API_KEY not set"))?,
            api_secret: std::env::var("MEDIA_STORE_API_SECRET")
                .map_err(|_| StoreError::config_error("MEDIA_STORE_API_SECRET not set"))?,
            upload_timeout: Duration::from_secs(
                std::env::var("MEDIA_STORE_UPLOAD_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_SECS),
            ),
            fetch_timeout: Duration::from_secs(
                std::env::var("MEDIA_STORE_FETCH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
            ),
        })
    }
}

/// A successfully published resource, as confirmed by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishedResource {
    /// Identifier the store filed the resource under
    pub public_id: String,
    /// Delivery URL for the raw resource
    pub secure_url: String,
}

/// Remote media store client.
#[derive(Clone)]
pub struct StoreClient {
    http: Client,
    config: StoreConfig,
}

impl StoreClient {
    /// Create a new store client from configuration.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let http = Client::builder().build().map_err(StoreError::Network)?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        Self::new(StoreConfig::from_env()?)
    }

    /// Publish a local file as an addressable resource under `identifier`.
    ///
    /// Both audio and video go through the store's video resource class; its
    /// audio handling is a subset of the video pipeline. Republishing under
    /// the same identifier overwrites, so a re-run of a whole job is safe.
    ///
    /// The confirmed identifier must equal the requested one; the store
    /// silently renaming a resource would corrupt every locator built from
    /// it, so that case is an error.
    pub async fn publish(
        &self,
        path: impl AsRef<Path>,
        identifier: &ResourceIdentifier,
    ) -> StoreResult<RemoteResource> {
        let path = path.as_ref();
        debug!("Publishing {} as '{}'", path.display(), identifier);

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| identifier.to_string());

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign_upload(identifier.as_str(), &timestamp);

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("public_id", identifier.to_string())
            .text("overwrite", "true")
            .text("timestamp", timestamp)
            .text("api_key", self.config.api_key.clone())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let url = format!(
            "{}/{}/video/upload",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.cloud_name
        );

        let response = self
            .http
            .post(&url)
            .timeout(self.config.upload_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::publish_failed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::publish_failed(format!(
                "store returned {}: {}",
                status, body
            )));
        }

        let published: PublishedResource = response
            .json()
            .await
            .map_err(|e| StoreError::invalid_response(e.to_string()))?;

        if published.public_id != identifier.as_str() {
            return Err(StoreError::IdentifierMismatch {
                requested: identifier.to_string(),
                returned: published.public_id,
            });
        }

        info!(
            identifier = %identifier,
            url = %published.secure_url,
            "Published resource"
        );

        Ok(RemoteResource {
            identifier: identifier.clone(),
            delivery_url: published.secure_url,
        })
    }

    /// Resolve the delivery locator for a composition. Pure; no network.
    pub fn delivery_url(&self, spec: &CompositionSpec) -> String {
        locator::splice_url(
            &self.config.delivery_base_url,
            &self.config.cloud_name,
            spec,
        )
    }

    /// Fetch a locator and write the bytes to `out_path`.
    ///
    /// The body is streamed chunk-by-chunk into a `.part` sibling, which is
    /// renamed into place only after the stream completes. A failure never
    /// leaves a partial file at the output path.
    pub async fn fetch_to_file(&self, url: &str, out_path: impl AsRef<Path>) -> StoreResult<()> {
        let out_path = out_path.as_ref();
        debug!("Fetching {} to {}", url, out_path.display());

        let response = self
            .http
            .get(url)
            .timeout(self.config.fetch_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::RetrievalFailed {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let part_path = partial_path(out_path);
        match stream_body_to(response, &part_path).await {
            Ok(written) => {
                tokio::fs::rename(&part_path, out_path).await?;
                info!(
                    output = %out_path.display(),
                    bytes = written,
                    "Fetched materialized result"
                );
                Ok(())
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&part_path).await {
                    warn!(
                        path = %part_path.display(),
                        error = %cleanup,
                        "Failed to remove partial download"
                    );
                }
                Err(e)
            }
        }
    }

    /// SHA-256 signature over the signed upload parameters, in the store's
    /// `key=value&key=value` + secret scheme (keys in lexicographic order,
    /// file and api_key excluded).
    fn sign_upload(&self, public_id: &str, timestamp: &str) -> String {
        let to_sign = format!(
            "overwrite=true&public_id={}&timestamp={}{}",
            public_id, timestamp, self.config.api_secret
        );
        let digest = Sha256::digest(to_sign.as_bytes());
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// In-progress download path: the output path with `.part` appended.
fn partial_path(out_path: &Path) -> PathBuf {
    let mut name = OsString::from(out_path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

async fn stream_body_to(mut response: reqwest::Response, path: &Path) -> StoreResult<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}
