//! Cleanup service HTTP client.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use vibe_models::{format_file_size, CleanupOp};

use crate::error::{CleanupError, CleanupResult};

/// Default request timeout (seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default interval between status polls (milliseconds).
const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// Default overall deadline for one edit (milliseconds).
const DEFAULT_POLL_DEADLINE_MS: u64 = 300_000;

/// Configuration for the cleanup client.
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Service base URL
    pub base_url: String,
    /// API key (required; there is no embedded fallback)
    pub api_key: String,
    /// Timeout for a single request
    pub timeout: Duration,
    /// Interval between status polls
    pub poll_interval: Duration,
    /// Overall deadline for an edit to complete
    pub poll_deadline: Duration,
    /// Max retries for transient transport failures
    pub max_retries: u32,
}

impl CleanupConfig {
    /// Create config from environment variables.
    pub fn from_env() -> CleanupResult<Self> {
        Ok(Self {
            base_url: std::env::var("CLEANUP_SERVICE_URL")
                .unwrap_or_else(|_| "https://api.cleanvoice.ai/v2".to_string()),
            api_key: std::env::var("CLEANUP_API_KEY")
                .map_err(|_| CleanupError::ConfigError("CLEANUP_API_KEY not set".to_string()))?,
            timeout: Duration::from_secs(
                std::env::var("CLEANUP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            poll_interval: Duration::from_millis(
                std::env::var("CLEANUP_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            ),
            poll_deadline: Duration::from_millis(
                std::env::var("CLEANUP_POLL_DEADLINE_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_POLL_DEADLINE_MS),
            ),
            max_retries: std::env::var("CLEANUP_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadSlot {
    #[serde(rename = "signedUrl")]
    signed_url: String,
}

#[derive(Debug, Deserialize)]
struct EditCreated {
    id: String,
}

#[derive(Debug, Deserialize)]
struct EditStatus {
    status: String,
    #[serde(default)]
    result: Option<EditResult>,
}

#[derive(Debug, Deserialize)]
struct EditResult {
    download_url: Option<String>,
}

/// Client for the remote audio cleanup service.
pub struct CleanupClient {
    http: Client,
    config: CleanupConfig,
}

impl CleanupClient {
    /// Create a new cleanup client.
    pub fn new(config: CleanupConfig) -> CleanupResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(CleanupError::Network)?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> CleanupResult<Self> {
        Self::new(CleanupConfig::from_env()?)
    }

    /// Run the whole cycle for one file: upload, submit, wait, download.
    ///
    /// The result lands next to the input, named
    /// `<stem>-<operation-token-with-dashes><ext>` with the input's own
    /// extension (the service keeps the container).
    pub async fn process_file(&self, path: impl AsRef<Path>, op: CleanupOp) -> CleanupResult<PathBuf> {
        let path = path.as_ref();
        info!(file = %path.display(), operation = %op, "Starting cleanup cycle");

        let signed_url = self.upload(path).await?;
        let edit_id = self.submit(&signed_url, op).await?;
        let download_url = self.wait(&edit_id).await?;

        let out_path = derived_output_path(path, op);
        self.download(&download_url, &out_path).await?;

        let size = tokio::fs::metadata(&out_path).await?.len();
        info!(
            output = %out_path.display(),
            size = %format_file_size(size),
            operation = %op,
            "Cleanup cycle finished"
        );

        Ok(out_path)
    }

    /// Request an upload slot and PUT the file bytes into it.
    ///
    /// Returns the signed URL, which doubles as the file reference in the
    /// subsequent edit request.
    pub async fn upload(&self, path: impl AsRef<Path>) -> CleanupResult<String> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                CleanupError::RequestFailed(format!("not a file path: {}", path.display()))
            })?;

        let slot_url = format!(
            "{}/upload?filename={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&filename)
        );

        let slot: UploadSlot = self
            .with_retry(|| async {
                let response = self
                    .http
                    .post(&slot_url)
                    .header("X-API-Key", &self.config.api_key)
                    .send()
                    .await?;
                expect_success(response, "upload slot").await
            })
            .await?
            .json()
            .await
            .map_err(|e| CleanupError::InvalidResponse(e.to_string()))?;

        debug!(file = %path.display(), "Uploading to signed slot");
        let bytes = tokio::fs::read(path).await?;

        let response = self.http.put(&slot.signed_url).body(bytes).send().await?;
        expect_success(response, "file upload").await?;

        Ok(slot.signed_url)
    }

    /// Submit an edit for an uploaded file.
    pub async fn submit(&self, signed_url: &str, op: CleanupOp) -> CleanupResult<String> {
        let url = format!("{}/edits", self.config.base_url.trim_end_matches('/'));
        let payload = serde_json::json!({
            "input": {
                "files": [signed_url],
                "config": op.config_payload(),
            }
        });

        let created: EditCreated = self
            .with_retry(|| async {
                let response = self
                    .http
                    .post(&url)
                    .header("X-API-Key", &self.config.api_key)
                    .json(&payload)
                    .send()
                    .await?;
                expect_success(response, "edit submit").await
            })
            .await?
            .json()
            .await
            .map_err(|e| CleanupError::InvalidResponse(e.to_string()))?;

        debug!(edit_id = %created.id, operation = %op, "Edit submitted");
        Ok(created.id)
    }

    /// Poll the edit until it completes; returns the result download URL.
    ///
    /// Polls at the configured interval; once the overall deadline elapses
    /// the wait surfaces as a typed `Timeout` rather than blocking further.
    pub async fn wait(&self, edit_id: &str) -> CleanupResult<String> {
        let url = format!(
            "{}/edits/{}",
            self.config.base_url.trim_end_matches('/'),
            edit_id
        );
        let started = Instant::now();

        loop {
            if started.elapsed() > self.config.poll_deadline {
                return Err(CleanupError::Timeout(self.config.poll_deadline.as_secs()));
            }

            let response = self
                .http
                .get(&url)
                .header("X-API-Key", &self.config.api_key)
                .send()
                .await?;
            let status: EditStatus = expect_success(response, "edit status")
                .await?
                .json()
                .await
                .map_err(|e| CleanupError::InvalidResponse(e.to_string()))?;

            match status.status.as_str() {
                "SUCCESS" => {
                    return status
                        .result
                        .and_then(|r| r.download_url)
                        .ok_or_else(|| {
                            CleanupError::InvalidResponse(
                                "successful edit carried no download_url".to_string(),
                            )
                        });
                }
                "FAILURE" => {
                    return Err(CleanupError::EditFailed(format!("edit {} failed", edit_id)));
                }
                other => {
                    debug!(edit_id = %edit_id, status = %other, "Edit still running");
                }
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// Download a finished result, streamed to a `.part` file and renamed
    /// into place on completion.
    pub async fn download(&self, url: &str, out_path: impl AsRef<Path>) -> CleanupResult<()> {
        let out_path = out_path.as_ref();
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(CleanupError::RequestFailed(format!(
                "result download returned {}",
                response.status()
            )));
        }

        let part_path = partial_path(out_path);
        match stream_body_to(response, &part_path).await {
            Ok(()) => {
                tokio::fs::rename(&part_path, out_path).await?;
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

    /// Execute with bounded exponential retry for transient failures.
    async fn with_retry<F, Fut>(&self, operation: F) -> CleanupResult<reqwest::Response>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = CleanupResult<reqwest::Response>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Cleanup request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(CleanupError::RequestFailed("Unknown error".to_string())))
    }
}

async fn expect_success(
    response: reqwest::Response,
    what: &str,
) -> CleanupResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status.is_server_error() {
        Err(CleanupError::ServiceUnavailable(format!(
            "{} returned {}: {}",
            what, status, body
        )))
    } else {
        Err(CleanupError::RequestFailed(format!(
            "{} returned {}: {}",
            what, status, body
        )))
    }
}

/// Output path for a processed file: `<stem>-<op slug><ext>` next to the
/// input.
fn derived_output_path(input: &Path, op: CleanupOp) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let ext = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let file_name = format!("{}-{}{}", stem, op.output_slug(), ext);
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

fn partial_path(out_path: &Path) -> PathBuf {
    let mut name = OsString::from(out_path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

async fn stream_body_to(mut response: reqwest::Response, path: &Path) -> CleanupResult<()> {
    let mut file = tokio::fs::File::create(path).await?;

    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(())
}
