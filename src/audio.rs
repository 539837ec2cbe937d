//! Materializing a finished job's audio: raw bytes, a saved file, playback.

use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;

use crate::error::{Result, UberduckError};

/// Terminal result of a synthesis call: where the rendered audio lives, plus
/// the payload itself once something needed it.
///
/// The payload is fetched at most once per result; the bytes return, the file
/// write and playback all share that single fetch, however many of them are
/// requested.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    path: String,
    bytes: Option<Bytes>,
}

impl SynthesisResult {
    pub(crate) fn new(path: String) -> Self {
        Self { path, bytes: None }
    }

    /// The fetchable address of the rendered audio.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The audio payload, if it has already been fetched.
    pub fn cached_bytes(&self) -> Option<&Bytes> {
        self.bytes.as_ref()
    }

    /// Fetch the audio, reusing any previously fetched payload.
    pub async fn fetch(&mut self, http: &reqwest::Client) -> Result<Bytes> {
        if let Some(bytes) = &self.bytes {
            return Ok(bytes.clone());
        }
        tracing::debug!(path = %self.path, "fetching rendered audio");
        let response = http.get(&self.path).send().await?;
        let bytes = response.error_for_status()?.bytes().await?;
        self.bytes = Some(bytes.clone());
        Ok(bytes)
    }

    /// Blocking mirror of [`fetch`](Self::fetch).
    pub fn fetch_blocking(&mut self, http: &reqwest::blocking::Client) -> Result<Bytes> {
        if let Some(bytes) = &self.bytes {
            return Ok(bytes.clone());
        }
        tracing::debug!(path = %self.path, "fetching rendered audio");
        let response = http.get(&self.path).send()?;
        let bytes = response.error_for_status()?.bytes()?;
        self.bytes = Some(bytes.clone());
        Ok(bytes)
    }
}

/// Decode a WAV payload and play it on the default output device, blocking
/// until the sink drains.
///
/// The async client runs this on a blocking worker; call it directly only
/// from a thread that may sleep.
pub fn play_wav(bytes: &[u8]) -> Result<()> {
    let (_stream, handle) = rodio::OutputStream::try_default()
        .map_err(|e| UberduckError::Playback(format!("no output device: {}", e)))?;
    let sink = rodio::Sink::try_new(&handle)
        .map_err(|e| UberduckError::Playback(format!("failed to open sink: {}", e)))?;
    let source = rodio::Decoder::new_wav(Cursor::new(bytes.to_vec()))
        .map_err(|e| UberduckError::Playback(format!("failed to decode WAV: {}", e)))?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

/// Overwrite `path` with the raw audio bytes.
///
/// A failure mid-write leaves a truncated file; there is no partial-write
/// recovery.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)?;
    tracing::debug!(path = %path.display(), len = bytes.len(), "wrote audio to file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_bytes_start_empty() {
        let result = SynthesisResult::new("https://audio/abc.wav".to_owned());
        assert_eq!(result.path(), "https://audio/abc.wav");
        assert!(result.cached_bytes().is_none());
    }

    #[test]
    fn write_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        write_file(&path, b"first").unwrap();
        write_file(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }
}
