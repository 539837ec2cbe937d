//! Blocking client surface.
//!
//! Mirrors the async [`UberduckClient`](crate::UberduckClient) with the same
//! behavior contract; each call occupies the calling thread for its full
//! duration, including the indefinite poll loop. Do not use this surface
//! from inside an async runtime; spawning a thread around a blocking call
//! gives no safe way to interrupt an in-progress poll, so callers wanting a
//! timeout should use the async client under `tokio::time::timeout` instead.

use std::time::Duration;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::audio::{self, SynthesisResult};
use crate::client::default_timeout;
use crate::error::{classify, Result, UberduckError};
use crate::job::{JobStatus, SpeakReceipt, SynthesisJob};
use crate::speak::{SpeakOptions, SpeakOutput};
use crate::voice::{self, AsVoiceName, Voice};

/// Shared client backing the module-level catalog helpers.
static CATALOG_HTTP: Lazy<reqwest::blocking::Client> = Lazy::new(reqwest::blocking::Client::new);

/// Fetch every voice the API can synthesize with.
pub fn voices() -> Result<Vec<Voice>> {
    voice::catalog_voices(voice::fetch_catalog_blocking(
        &CATALOG_HTTP,
        crate::DEFAULT_BASE_URL,
    )?)
}

/// Fetch only the voice names, the cheaper call when full records are not
/// needed.
pub fn voice_names() -> Result<Vec<String>> {
    voice::catalog_names(voice::fetch_catalog_blocking(
        &CATALOG_HTTP,
        crate::DEFAULT_BASE_URL,
    )?)
}

/// Blocking client for the Uberduck text-to-speech API.
///
/// Same contract as the async client: see
/// [`UberduckClient`](crate::UberduckClient) for the credential and
/// materialization semantics.
///
/// ```rust,no_run
/// use uberduck::SpeakOptions;
///
/// fn main() -> uberduck::Result<()> {
///     let client = uberduck::blocking::UberduckClient::new("api-key", "api-secret")?;
///     let options = SpeakOptions::new().save_to("quack.wav");
///     client.speak("hello world", "big-bird", &options)?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct UberduckClient {
    http: reqwest::blocking::Client,
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
    pub fn voices(&self) -> Result<Vec<Voice>> {
        voice::catalog_voices(voice::fetch_catalog_blocking(&self.http, &self.base_url)?)
    }

    /// Fetch only the voice names.
    pub fn voice_names(&self) -> Result<Vec<String>> {
        voice::catalog_names(voice::fetch_catalog_blocking(&self.http, &self.base_url)?)
    }

    /// Submit a synthesis request and obtain the job handle.
    ///
    /// The voice name is lower-cased before transmission, as the service
    /// expects.
    pub fn submit<V: AsVoiceName>(&self, speech: &str, voice: V) -> Result<SynthesisJob> {
        let voice = voice.voice_name().to_lowercase();
        let url = format!("{}/speak", self.base_url);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&serde_json::json!({ "speech": speech, "voice": voice }))
            .send()?;
        let status = response.status().as_u16();
        let body: Value = response.json()?;
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
    pub fn job_status(&self, job: &SynthesisJob) -> Result<JobStatus> {
        let url = format!("{}/speak-status?uuid={}", self.base_url, job.uuid);
        let response = self.http.get(&url).send()?;
        let status = response.status().as_u16();
        let body: Value = response.json()?;
        let job_status = JobStatus::from_response(status, &body)?;
        tracing::debug!(uuid = %job.uuid, ready = job_status.is_ready(), "polled job status");
        Ok(job_status)
    }

    /// Poll a job at a fixed interval until its audio is ready, sleeping the
    /// calling thread between queries.
    ///
    /// Polls forever: no attempt cap, no backoff. A fatal classification
    /// aborts immediately.
    pub fn await_audio(&self, job: &SynthesisJob, check_every: Duration) -> Result<SynthesisResult> {
        loop {
            match self.job_status(job)? {
                JobStatus::Ready(path) => return Ok(SynthesisResult::new(path)),
                JobStatus::Pending => std::thread::sleep(check_every),
            }
        }
    }

    /// Synthesize `speech` with `voice`: submit, wait for completion, then
    /// materialize the requested outputs.
    ///
    /// File write, playback and the returned bytes share a single download
    /// of the rendered audio. Playback happens on the calling thread;
    /// [`SpeakOptions::runtime`] is ignored here.
    pub fn speak<V: AsVoiceName>(
        &self,
        speech: &str,
        voice: V,
        options: &SpeakOptions,
    ) -> Result<SpeakOutput> {
        let job = self.submit(speech, voice)?;
        let mut result = self.await_audio(&job, options.check_every)?;

        if let Some(path) = &options.file_path {
            let bytes = result.fetch_blocking(&self.http)?;
            audio::write_file(path, &bytes)?;
        }
        if options.play_sound {
            let bytes = result.fetch_blocking(&self.http)?;
            tracing::debug!(uuid = %job.uuid, voice = %job.voice, "playing rendered audio");
            audio::play_wav(&bytes)?;
        }
        if options.return_bytes {
            Ok(SpeakOutput::Bytes(result.fetch_blocking(&self.http)?))
        } else {
            Ok(SpeakOutput::Path(result.path().to_owned()))
        }
    }
}

/// Builder for the blocking [`UberduckClient`].
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
        let http = reqwest::blocking::Client::builder()
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
