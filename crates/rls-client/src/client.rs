//! High-level client for the RocketLeagueStats API

use std::collections::BTreeMap;

use reqwest::Client;

use crate::cache::ReferenceCache;
use crate::http::HttpClient;
use crate::response_types::{Platform, Player, Playlist, Season, Tier};
use crate::search::{SearchPage, SearchResults};
use crate::{Error, Result};

/// Maximum number of players in one batch lookup, enforced by the service
pub const MAX_BATCH_SIZE: usize = 10;

/// One entry in a batch player lookup
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    /// Steam 64 ID, PSN username, or Xbox gamertag/XUID
    pub unique_id: String,
    /// Numeric platform ID
    pub platform_id: i64,
}

impl BatchEntry {
    /// Build an entry from any displayable identifier and anything that
    /// reduces to a platform ID (a raw `i64` or a [`Platform`])
    pub fn new(unique_id: impl ToString, platform: impl Into<i64>) -> Self {
        Self {
            unique_id: unique_id.to_string(),
            platform_id: platform.into(),
        }
    }
}

/// Key for looking up a platform from the cached platform list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformKey {
    /// Numeric platform ID
    Id(i64),
    /// Case-insensitive platform name, e.g. `"steam"`
    Name(String),
}

impl From<i64> for PlatformKey {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for PlatformKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for PlatformKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Client for the RocketLeagueStats REST API.
///
/// One client serializes all of its outbound requests so the service's
/// per-key rate limit can be tracked from response headers; see the
/// [`crate::http`] module for the request path. Reference data (platforms,
/// seasons, tiers, playlists) is cached on first access and only refetched
/// on explicit renewal.
#[derive(Debug)]
pub struct RlsClient {
    http: HttpClient,
    cache: ReferenceCache,
}

impl RlsClient {
    /// Create a client authenticating with the given API key.
    ///
    /// The key may be empty, in which case every operation fails with
    /// [`Error::MissingCredential`] before any request is attempted.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(api_key)?,
            cache: ReferenceCache::default(),
        })
    }

    /// Create a client with a custom reqwest client
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            http: HttpClient::with_client(client, api_key),
            cache: ReferenceCache::default(),
        }
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    /// Cap the number of retries after throttled responses.
    ///
    /// By default a throttled request sleeps out the reported reset window
    /// and retries until the service accepts it.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.http = self.http.with_max_retries(max_retries);
        self
    }

    /// Retrieve a single player.
    ///
    /// `id` is a Steam 64 ID, PSN username, or Xbox gamertag/XUID;
    /// `platform` accepts a [`Platform`] or a raw platform ID.
    pub async fn player(&self, id: impl ToString, platform: impl Into<i64>) -> Result<Player> {
        let platform_id: i64 = platform.into();
        let query = [
            ("unique_id", id.to_string()),
            ("platform_id", platform_id.to_string()),
        ];
        self.http.get("player", &query).await
    }

    /// Retrieve up to ten players in one request.
    ///
    /// Fails with [`Error::BatchTooLarge`] before any request when more
    /// than [`MAX_BATCH_SIZE`] entries are supplied. Players are returned
    /// in response order.
    pub async fn players(&self, entries: &[BatchEntry]) -> Result<Vec<Player>> {
        if entries.len() > MAX_BATCH_SIZE {
            return Err(Error::batch_too_large(entries.len(), MAX_BATCH_SIZE));
        }
        self.http.post("player/batch", entries).await
    }

    /// Search players by display name, returning a cursor positioned at the
    /// given zero-based page.
    pub async fn search(
        &self,
        display_name: impl Into<String>,
        page: u32,
    ) -> Result<SearchResults<'_>> {
        let display_name = display_name.into();
        let first = self.search_page(&display_name, page).await?;
        Ok(SearchResults::new(self, display_name, first))
    }

    pub(crate) async fn search_page(&self, display_name: &str, page: u32) -> Result<SearchPage> {
        let query = [
            ("display_name", display_name.to_owned()),
            ("page", page.to_string()),
        ];
        self.http.get("search/players", &query).await
    }

    /// Tracked platforms, cached after the first call.
    ///
    /// `renew` ignores the cache and replaces it with a fresh fetch.
    pub async fn platforms(&self, renew: bool) -> Result<Vec<Platform>> {
        self.cache.platforms(&self.http, renew).await
    }

    /// Seasons keyed by season ID, cached after the first call
    pub async fn seasons(&self, renew: bool) -> Result<BTreeMap<i64, Season>> {
        self.cache.seasons(&self.http, renew).await
    }

    /// Ranked tiers keyed by tier ID, cached after the first call
    pub async fn tiers(&self, renew: bool) -> Result<BTreeMap<i64, Tier>> {
        self.cache.tiers(&self.http, renew).await
    }

    /// Playlists keyed by playlist ID, cached after the first call
    pub async fn playlists(&self, renew: bool) -> Result<BTreeMap<i64, Playlist>> {
        self.cache.playlists(&self.http, renew).await
    }

    /// Look up a season by ID from the cached season list
    pub async fn season(&self, id: i64) -> Result<Option<Season>> {
        Ok(self.seasons(false).await?.get(&id).copied())
    }

    /// Look up a tier by ID from the cached tier list
    pub async fn tier(&self, id: i64) -> Result<Option<Tier>> {
        Ok(self.tiers(false).await?.get(&id).cloned())
    }

    /// Look up a playlist by ID from the cached playlist list
    pub async fn playlist(&self, id: i64) -> Result<Option<Playlist>> {
        Ok(self.playlists(false).await?.get(&id).cloned())
    }

    /// The running season, or `None` if every season has ended.
    ///
    /// The service reports at most one unended season; if it ever reported
    /// several, the one with the lowest ID wins.
    pub async fn current_season(&self) -> Result<Option<Season>> {
        Ok(self
            .seasons(false)
            .await?
            .into_values()
            .find(Season::is_current))
    }

    /// Look up a platform by ID or by case-insensitive name
    pub async fn platform(&self, key: impl Into<PlatformKey>) -> Result<Option<Platform>> {
        let key = key.into();
        let platforms = self.platforms(false).await?;
        Ok(platforms.into_iter().find(|platform| match &key {
            PlatformKey::Id(id) => platform.id == *id,
            PlatformKey::Name(name) => platform.name.eq_ignore_ascii_case(name),
        }))
    }
}
