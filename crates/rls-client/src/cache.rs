//! Lazily populated cache for slowly-changing reference data
//!
//! Platforms, seasons, tiers, and playlists change rarely on the service
//! side, so each collection is fetched once and served from memory until a
//! caller explicitly renews it. A renewal always replaces the whole
//! collection; there is no partial invalidation.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::Result;
use crate::http::HttpClient;
use crate::response_types::{Platform, Playlist, Season, Tier};

/// Cached reference-data collections, one slot per category.
///
/// Each slot is `None` until its first successful fetch. An empty collection
/// is a valid cached value and is not refetched. Slot writes take the slot's
/// own lock so concurrent renewals end in a consistent full collection.
#[derive(Debug, Default)]
pub(crate) struct ReferenceCache {
    platforms: Mutex<Option<Vec<Platform>>>,
    seasons: Mutex<Option<BTreeMap<i64, Season>>>,
    tiers: Mutex<Option<BTreeMap<i64, Tier>>>,
    playlists: Mutex<Option<BTreeMap<i64, Playlist>>>,
}

impl ReferenceCache {
    /// Tracked platforms, in the order the service lists them.
    pub(crate) async fn platforms(&self, http: &HttpClient, renew: bool) -> Result<Vec<Platform>> {
        if !renew {
            if let Some(cached) = self.platforms.lock().clone() {
                return Ok(cached);
            }
        }

        debug!("Fetching platform list");
        let platforms: Vec<Platform> = http.get("data/platforms", &[]).await?;
        *self.platforms.lock() = Some(platforms.clone());
        Ok(platforms)
    }

    /// Seasons keyed by season ID.
    pub(crate) async fn seasons(
        &self,
        http: &HttpClient,
        renew: bool,
    ) -> Result<BTreeMap<i64, Season>> {
        if !renew {
            if let Some(cached) = self.seasons.lock().clone() {
                return Ok(cached);
            }
        }

        debug!("Fetching season list");
        let seasons: Vec<Season> = http.get("data/seasons", &[]).await?;
        let seasons: BTreeMap<i64, Season> =
            seasons.into_iter().map(|season| (season.id, season)).collect();
        *self.seasons.lock() = Some(seasons.clone());
        Ok(seasons)
    }

    /// Ranked tiers keyed by tier ID.
    pub(crate) async fn tiers(&self, http: &HttpClient, renew: bool) -> Result<BTreeMap<i64, Tier>> {
        if !renew {
            if let Some(cached) = self.tiers.lock().clone() {
                return Ok(cached);
            }
        }

        debug!("Fetching tier list");
        let tiers: Vec<Tier> = http.get("data/tiers", &[]).await?;
        let tiers: BTreeMap<i64, Tier> = tiers.into_iter().map(|tier| (tier.id, tier)).collect();
        *self.tiers.lock() = Some(tiers.clone());
        Ok(tiers)
    }

    /// Playlists keyed by playlist ID.
    pub(crate) async fn playlists(
        &self,
        http: &HttpClient,
        renew: bool,
    ) -> Result<BTreeMap<i64, Playlist>> {
        if !renew {
            if let Some(cached) = self.playlists.lock().clone() {
                return Ok(cached);
            }
        }

        debug!("Fetching playlist list");
        let playlists: Vec<Playlist> = http.get("data/playlists", &[]).await?;
        let playlists: BTreeMap<i64, Playlist> = playlists
            .into_iter()
            .map(|playlist| (playlist.id, playlist))
            .collect();
        *self.playlists.lock() = Some(playlists.clone());
        Ok(playlists)
    }
}
