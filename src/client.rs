//! Asynchronous Uberduck client.

use std::time::Duration;

use serde_json::Value;
use tokio::runtime::Handle;

use crate::audio::{self, SynthesisResult};
use crate::error::{classify, Result, UberduckError};
use crate::job::{JobStatus, SpeakReceipt, SynthesisJob};
use crate::speak::{SpeakOptions, SpeakOutput};
use crate::voice::{self, AsVoiceName, Voice};

/// Client for the Uberduck text-to-speech API.
///
/// Construction takes an API key and secret; both stay mutable afterwards so
/// they can be rotated without rebuilding the client. Credentials are read at
/// the moment a submission request is built. Mutating them requires
/// `&mut self`, so a single client cannot be re-credentialed while a call
/// borrows it; clones used concurrently each keep the credentials they were
/// cloned with.
///
/// ```rust,no_run
/// use uberduck::{SpeakOptions, SpeakOutput, UberduckClient};
///
/// #[tokio::main]
/// async fn main() -> uberduck::Result<()> {
///     let client = UberduckClient::new("api-key", "api-secret")?;
///     let output = client
///         .speak("hello world", "big-bird", &SpeakOptions::default())
///         .await?;
///     if let SpeakOutput::Bytes(audio) = output {
///         println!("rendered {} bytes of WAV audio", audio.len());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct UberduckClient {
    http: reqwest::Client,
    base_url: String,
    /// API key used for submission auth; may be changed between calls.
    pub api_key: String,
    /// API secret used for submission auth; may be changed between calls.
    pub api_secret: String,
}

impl UberduckClient {
    /// Create a client against the production endpoint with default settings.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        Self::builder()
            .api_key(api_key)
            .api_secret(api_secret)
            .build()
    }

    pub fn builder() -> UberduckClientBuilder {
        UberduckClientBuilder::new()
    }

    /// Fetch every voice the API can synthesize with.
    pub async fn voices(&self) -> Result<Vec<Voice>> {
        voice::catalog_voices(voice::fetch_catalog(&self.http, &self.base_url).await?)
    }

    /// Fetch only the voice names, the cheaper call when full records are
    /// not needed.
    pub async fn voice_names(&self) -> Result<Vec<String>> {
        voice::catalog_names(voice::fetch_catalog(&self.http, &self.base_url).await?)
    }

    /// Submit a synthesis request and obtain the job handle.
    ///
    /// The voice name is lower-cased before transmission, as the service
    /// expects. Credentials are read here, when the request is built.
    pub async fn submit<V: AsVoiceName>(&self, speech: &str, voice: V) -> Result<SynthesisJob> {
        let voice = voice.voice_name().to_lowercase();
        let url = format!("{}/speak", self.base_url);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&serde_json::json!({ "speech": speech, "voice": voice }))
            .send()
            .await?;
        let status = response.status().as_u16();
        let body: Value = response.json().await?;
        tracing::debug!(status, voice = %voice, "synthesis job submitted");
        classify(status, &body, Some(&voice))?;
        let receipt: SpeakReceipt = serde_json::from_value(body)?;
        Ok(SynthesisJob {
            uuid: receipt.uuid,
            speech: speech.to_owned(),
            voice,
        })
    }

    /// Query a job's completion state once.
    pub async fn job_status(&self, job: &SynthesisJob) -> Result<JobStatus> {
        let url = format!("{}/speak-status?uuid={}", self.base_url, job.uuid);
        let response = self.http.get(&url).send().await?;
        let status = response.status().as_u16();
        let body: Value = response.json().await?;
        let job_status = JobStatus::from_response(status, &body)?;
        tracing::debug!(uuid = %job.uuid, ready = job_status.is_ready(), "polled job status");
        Ok(job_status)
    }

    /// Poll a job at a fixed interval until its audio is ready.
    ///
    /// Polls forever: there is no attempt cap and no backoff. A fatal
    /// classification aborts immediately. Callers needing a timeout should
    /// wrap this (or `speak`) in `tokio::time::timeout`.
    pub async fn await_audio(
        &self,
        job: &SynthesisJob,
        check_every: Duration,
    ) -> Result<SynthesisResult> {
        loop {
            match self.job_status(job).await? {
                JobStatus::Ready(path) => return Ok(SynthesisResult::new(path)),
                JobStatus::Pending => tokio::time::sleep(check_every).await,
            }
        }
    }

    /// Synthesize `speech` with `voice`: submit, wait for completion, then
    /// materialize the requested outputs.
    ///
    /// File write, playback and the returned bytes share a single download
    /// of the rendered audio. Playback runs on a blocking worker (of
    /// [`SpeakOptions::runtime`] if given, otherwise the ambient runtime) so
    /// the caller's executor stays free.
    pub async fn speak<V: AsVoiceName>(
        &self,
        speech: &str,
        voice: V,
        options: &SpeakOptions,
    ) -> Result<SpeakOutput> {
        let job = self.submit(speech, voice).await?;
        let mut result = self.await_audio(&job, options.check_every).await?;

        if let Some(path) = &options.file_path {
            let bytes = result.fetch(&self.http).await?;
            tokio::fs::write(path, &bytes).await?;
            tracing::debug!(path = %path.display(), "wrote audio to file");
        }
        if options.play_sound {
            let bytes = result.fetch(&self.http).await?;
            tracing::debug!(uuid = %job.uuid, voice = %job.voice, "playing rendered audio");
            let handle = match &options.runtime {
                Some(handle) => handle.clone(),
                None => Handle::current(),
            };
            handle
                .spawn_blocking(move || audio::play_wav(&bytes))
                .await
                .map_err(|e| UberduckError::Playback(format!("playback task failed: {}", e)))??;
        }
        if options.return_bytes {
            Ok(SpeakOutput::Bytes(result.fetch(&self.http).await?))
        } else {
            Ok(SpeakOutput::Path(result.path().to_owned()))
        }
    }
}

/// Builder for [`UberduckClient`].
pub struct UberduckClientBuilder {
    api_key: Option<String>,
    api_secret: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl UberduckClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            base_url: None,
            timeout: None,
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn api_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.api_secret = Some(api_secret.into());
        self
    }

    /// Override the API base URL (mainly for tests against a local server).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<UberduckClient> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("UBERDUCK_API_KEY").ok())
            .ok_or_else(|| {
                UberduckError::Configuration("API key required (UBERDUCK_API_KEY)".into())
            })?;
        let api_secret = self
            .api_secret
            .or_else(|| std::env::var("UBERDUCK_API_SECRET").ok())
            .ok_or_else(|| {
                UberduckError::Configuration("API secret required (UBERDUCK_API_SECRET)".into())
            })?;
        let base_url = self
            .base_url
            .unwrap_or_else(|| crate::DEFAULT_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or_else(default_timeout))
            .build()
            .map_err(|e| {
                UberduckError::Configuration(format!("failed to create HTTP client: {}", e))
            })?;
        Ok(UberduckClient {
            http,
            base_url,
            api_key,
            api_secret,
        })
    }
}

impl Default for UberduckClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Request timeout, env-overridable.
pub(crate) fn default_timeout() -> Duration {
    let secs = std::env::var("UBERDUCK_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(30);
    Duration::from_secs(secs)
}
