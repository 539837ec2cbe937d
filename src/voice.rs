//! Voice catalog types and accessors.
//!
//! The catalog endpoint is unauthenticated, so the module-level [`voices`]
//! and [`voice_names`] helpers work without constructing a client. The same
//! calls are available on [`UberduckClient`](crate::UberduckClient) (and its
//! blocking mirror), which is the route to take when a custom base URL or
//! timeout is needed.

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{classify, Result};

/// A membership tag grouping a voice under a named collection (e.g. a themed
/// voice pack). Both fields are nullable in the wire schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Membership {
    pub name: Option<String>,
    pub id: Option<i64>,
}

/// A selectable synthesis voice, as listed by the catalog endpoint.
///
/// `name` is the unique key and the value passed back to the API when
/// synthesizing; `model_id` is not unique. Voices are plain read-only
/// records, created once per catalog fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    pub name: String,
    /// Better formatted name to show to end users.
    pub display_name: String,
    /// Where the voice is from (a show, a game, ...).
    pub category: String,
    /// Engine the voice was built with.
    pub architecture: String,
    pub is_active: bool,
    pub is_private: bool,
    /// Whether the voice exposes synthesis controls.
    pub controls: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub contributors: Vec<String>,
    /// At most one membership record in the observed schema; absent, null
    /// and empty all deserialize to an empty list.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub memberships: Vec<Membership>,
    pub model_id: String,
    pub symbol_set: String,
    pub voicemodel_uuid: String,
}

/// Anything that can name a voice: a raw name or a full [`Voice`] record.
/// Call sites lower-case the name before transmission, so any casing works.
pub trait AsVoiceName {
    fn voice_name(&self) -> &str;
}

impl AsVoiceName for str {
    fn voice_name(&self) -> &str {
        self
    }
}

impl AsVoiceName for String {
    fn voice_name(&self) -> &str {
        self
    }
}

impl AsVoiceName for Voice {
    fn voice_name(&self) -> &str {
        &self.name
    }
}

impl<T: AsVoiceName + ?Sized> AsVoiceName for &T {
    fn voice_name(&self) -> &str {
        (**self).voice_name()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) const CATALOG_PATH: &str = "/voices?mode=tts-basic";

/// Shared client backing the module-level catalog helpers.
static CATALOG_HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

pub(crate) async fn fetch_catalog(http: &reqwest::Client, base_url: &str) -> Result<Value> {
    let url = format!("{}{}", base_url, CATALOG_PATH);
    let response = http.get(&url).send().await?;
    let status = response.status().as_u16();
    let body: Value = response.json().await?;
    tracing::debug!(status, "fetched voice catalog");
    classify(status, &body, None)?;
    Ok(body)
}

pub(crate) fn fetch_catalog_blocking(
    http: &reqwest::blocking::Client,
    base_url: &str,
) -> Result<Value> {
    let url = format!("{}{}", base_url, CATALOG_PATH);
    let response = http.get(&url).send()?;
    let status = response.status().as_u16();
    let body: Value = response.json()?;
    tracing::debug!(status, "fetched voice catalog");
    classify(status, &body, None)?;
    Ok(body)
}

pub(crate) fn catalog_voices(body: Value) -> Result<Vec<Voice>> {
    Ok(serde_json::from_value(body)?)
}

/// Pull only the name strings out of a catalog payload, skipping the full
/// record deserialization.
pub(crate) fn catalog_names(body: Value) -> Result<Vec<String>> {
    #[derive(Deserialize)]
    struct Entry {
        name: String,
    }
    let entries: Vec<Entry> = serde_json::from_value(body)?;
    Ok(entries.into_iter().map(|entry| entry.name).collect())
}

/// Fetch every voice the API can synthesize with.
pub async fn voices() -> Result<Vec<Voice>> {
    catalog_voices(fetch_catalog(&CATALOG_HTTP, crate::DEFAULT_BASE_URL).await?)
}

/// Fetch only the voice names, the cheaper call when full records are not
/// needed.
pub async fn voice_names() -> Result<Vec<String>> {
    catalog_names(fetch_catalog(&CATALOG_HTTP, crate::DEFAULT_BASE_URL).await?)
}
