//! Shared surface of the synthesis façade: what a `speak` call should
//! produce, and on what cadence to wait for it.

use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use tokio::runtime::Handle;

/// Options accepted by both `speak` surfaces.
///
/// However many outputs are requested (returned bytes, saved file, playback),
/// the rendered audio is downloaded exactly once per call.
#[derive(Debug, Clone)]
pub struct SpeakOptions {
    /// Return the audio bytes; when `false` the audio URL is returned
    /// instead. Defaults to `true`.
    pub return_bytes: bool,
    /// Fixed interval between status polls. Defaults to one second; may be
    /// fractional. Polling continues until the job resolves, with no attempt
    /// cap.
    pub check_every: Duration,
    /// Also write the audio to this path, overwriting any existing file.
    pub file_path: Option<PathBuf>,
    /// Also decode the audio (WAV) and play it on the default output device.
    pub play_sound: bool,
    /// Runtime to run playback on. Only consulted by the async client, which
    /// falls back to the ambient runtime; the blocking client plays on the
    /// calling thread.
    pub runtime: Option<Handle>,
}

impl Default for SpeakOptions {
    fn default() -> Self {
        Self {
            return_bytes: true,
            check_every: Duration::from_secs(1),
            file_path: None,
            play_sound: false,
            runtime: None,
        }
    }
}

impl SpeakOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the audio URL instead of the bytes.
    pub fn return_path(mut self) -> Self {
        self.return_bytes = false;
        self
    }

    pub fn check_every(mut self, interval: Duration) -> Self {
        self.check_every = interval;
        self
    }

    pub fn save_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn play_sound(mut self) -> Self {
        self.play_sound = true;
        self
    }

    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }
}

/// Outcome of a synthesis call, shaped by [`SpeakOptions::return_bytes`].
#[derive(Debug, Clone)]
pub enum SpeakOutput {
    /// The rendered audio payload (a WAV container).
    Bytes(Bytes),
    /// The URL the rendered audio can be fetched from.
    Path(String),
}

impl SpeakOutput {
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            SpeakOutput::Bytes(bytes) => Some(bytes),
            SpeakOutput::Path(_) => None,
        }
    }

    pub fn into_path(self) -> Option<String> {
        match self {
            SpeakOutput::Bytes(_) => None,
            SpeakOutput::Path(path) => Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let options = SpeakOptions::default();
        assert!(options.return_bytes);
        assert_eq!(options.check_every, Duration::from_secs(1));
        assert!(options.file_path.is_none());
        assert!(!options.play_sound);
    }

    #[test]
    fn chained_setters() {
        let options = SpeakOptions::new()
            .return_path()
            .check_every(Duration::from_millis(250))
            .save_to("/tmp/out.wav");
        assert!(!options.return_bytes);
        assert_eq!(options.check_every, Duration::from_millis(250));
        assert_eq!(options.file_path.as_deref(), Some(std::path::Path::new("/tmp/out.wav")));
    }
}
