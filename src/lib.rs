//! # uberduck
//!
//! Rust client for the [Uberduck](https://uberduck.ai) text-to-speech API.
//!
//! ## Overview
//!
//! Uberduck renders speech through a fire-and-forget job queue: a submission
//! returns a job uuid, and the audio becomes fetchable some polls later. This
//! crate bridges that protocol into a call that behaves like an ordinary
//! function returning audio bytes — submit, poll at a fixed interval until
//! the job is ready, then materialize the result as returned bytes, a saved
//! file and/or played sound, downloading the audio at most once per call.
//!
//! Both an async and a blocking surface are provided with identical
//! semantics: [`UberduckClient`] suspends at every network call and never
//! blocks the executor, while [`blocking::UberduckClient`] occupies the
//! calling thread for the whole call.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use uberduck::{SpeakOptions, SpeakOutput, UberduckClient};
//!
//! #[tokio::main]
//! async fn main() -> uberduck::Result<()> {
//!     let client = UberduckClient::new("api-key", "api-secret")?;
//!
//!     // Pick a voice from the catalog (also reachable without a client
//!     // through `uberduck::voices()`).
//!     let names = client.voice_names().await?;
//!     println!("{} voices available", names.len());
//!
//!     let output = client
//!         .speak("quack quack", "big-bird", &SpeakOptions::default())
//!         .await?;
//!     if let SpeakOutput::Bytes(audio) = output {
//!         // A WAV container, ready to save or play.
//!         println!("rendered {} bytes", audio.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Async client: catalog, submission, polling, synthesis façade |
//! | [`blocking`] | Blocking mirror of the client |
//! | [`voice`] | Voice catalog records and module-level catalog helpers |
//! | [`job`] | Job handle and completion-state interpretation |
//! | [`audio`] | Result materialization: fetch-once bytes, file write, playback |
//! | [`speak`] | Options and output of the synthesis façade |
//! | [`error`] | Error taxonomy shared by every operation |
//!
//! ## Errors
//!
//! Every operation returns [`Result`]. Remote failures are classified into
//! [`UberduckError::InvalidVoice`], [`UberduckError::Unauthorized`],
//! [`UberduckError::RateLimited`] or the generic
//! [`UberduckError::Http`] carrier; a fatal classification aborts the whole
//! synthesis call with no partial result. Only non-fatal "not ready yet"
//! poll responses are retried, and those indefinitely — callers wanting a
//! timeout wrap the async call in `tokio::time::timeout`.

pub mod audio;
pub mod blocking;
pub mod client;
pub mod error;
pub mod job;
pub mod speak;
pub mod voice;

pub use audio::SynthesisResult;
pub use client::{UberduckClient, UberduckClientBuilder};
pub use error::{Result, UberduckError};
pub use job::{JobStatus, SynthesisJob};
pub use speak::{SpeakOptions, SpeakOutput};
pub use voice::{voice_names, voices, AsVoiceName, Membership, Voice};

/// Production API endpoint; overridable per client through the builders.
pub const DEFAULT_BASE_URL: &str = "https://api.uberduck.ai";
