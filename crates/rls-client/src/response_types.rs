//! Typed response objects for the RocketLeagueStats API
//!
//! Every object is decoded once from a JSON payload and never mutated
//! afterwards. Wire field names are camelCase; timestamps are unix seconds.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::serde::{ts_seconds, ts_seconds_option};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// A gaming platform tracked by the service.
///
/// Platforms change very rarely, and the common ones are available as
/// process-wide constants so callers do not need an API request to
/// reference them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Platform {
    /// Platform ID
    pub id: i64,
    /// Platform display name
    pub name: String,
}

static STEAM: LazyLock<Platform> = LazyLock::new(|| Platform {
    id: 1,
    name: "Steam".to_owned(),
});

static PS4: LazyLock<Platform> = LazyLock::new(|| Platform {
    id: 2,
    name: "Ps4".to_owned(),
});

static XBOX_ONE: LazyLock<Platform> = LazyLock::new(|| Platform {
    id: 3,
    name: "XboxOne".to_owned(),
});

impl Platform {
    /// The Steam platform (ID 1)
    pub fn steam() -> &'static Self {
        &STEAM
    }

    /// The PlayStation 4 platform (ID 2)
    pub fn ps4() -> &'static Self {
        &PS4
    }

    /// The Xbox One platform (ID 3)
    pub fn xbox_one() -> &'static Self {
        &XBOX_ONE
    }
}

impl From<Platform> for i64 {
    fn from(platform: Platform) -> Self {
        platform.id
    }
}

impl From<&Platform> for i64 {
    fn from(platform: &Platform) -> Self {
        platform.id
    }
}

/// A player's accumulated lifetime stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Stats {
    pub wins: u64,
    pub goals: u64,
    pub mvps: u64,
    pub saves: u64,
    pub shots: u64,
    pub assists: u64,
}

/// A competitive season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Season {
    /// Season ID
    #[serde(rename = "seasonId")]
    pub id: i64,
    /// Season start time
    #[serde(rename = "startedOn", with = "ts_seconds")]
    pub started_on: DateTime<Utc>,
    /// Season end time, absent while the season is running
    #[serde(rename = "endedOn", default, with = "ts_seconds_option")]
    pub ended_on: Option<DateTime<Utc>>,
}

impl Season {
    /// Whether this season is still running
    pub fn is_current(&self) -> bool {
        self.ended_on.is_none()
    }
}

/// A ranked skill tier
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tier {
    /// Tier ID
    #[serde(rename = "tierId")]
    pub id: i64,
    /// Tier display name
    #[serde(rename = "tierName")]
    pub name: String,
}

/// A playlist and its participation count
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "PlaylistData")]
pub struct Playlist {
    /// Playlist ID
    pub id: i64,
    /// Playlist display name
    pub name: String,
    /// Number of players currently in this playlist
    pub population: u64,
    /// When the population count was last refreshed
    pub updated_at: DateTime<Utc>,
}

/// Wire shape of a playlist entry; the population count is nested
#[derive(Deserialize)]
struct PlaylistData {
    id: i64,
    name: String,
    population: PopulationData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PopulationData {
    players: u64,
    #[serde(with = "ts_seconds")]
    updated_at: DateTime<Utc>,
}

impl From<PlaylistData> for Playlist {
    fn from(data: PlaylistData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            population: data.population.players,
            updated_at: data.population.updated_at,
        }
    }
}

/// One playlist's entry in a player's ranked history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedHistory {
    /// Playlist this entry applies to
    pub playlist_id: i64,
    /// Rank rating points
    pub rank_points: i64,
    /// Matches played this season, absent for unplayed placements
    pub matches_played: Option<i64>,
    /// Tier reached, absent before placement completes
    pub tier_id: Option<i64>,
    /// Division within the tier, absent before placement completes
    pub division: Option<i64>,
}

/// Wire shape of a ranked history entry; the playlist ID is the map key
/// in the payload, not a field.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedHistoryData {
    rank_points: i64,
    #[serde(default)]
    matches_played: Option<i64>,
    #[serde(default)]
    tier: Option<i64>,
    #[serde(default)]
    division: Option<i64>,
}

/// A Rocket League player as tracked by the service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Steam 64 ID, PSN username, or Xbox gamertag/XUID
    #[serde(rename = "uniqueId")]
    pub id: String,
    /// Display name at the time of the last profile refresh
    pub display_name: String,
    /// Platform the player plays on
    pub platform: Platform,
    /// URL of the player's avatar image, absent for some platforms
    #[serde(default)]
    pub avatar: Option<String>,
    /// URL of the player's profile page
    pub profile_url: String,
    /// URL of the player's signature image
    pub signature_url: String,
    /// Accumulated lifetime stats
    pub stats: Stats,
    /// Ranked rating per season, keyed by season ID
    #[serde(default, deserialize_with = "ranked_seasons")]
    pub ranked_seasons: BTreeMap<i64, Vec<RankedHistory>>,
    /// When this profile was last requested through the service
    #[serde(with = "ts_seconds")]
    pub last_requested: DateTime<Utc>,
    /// When this profile was first tracked
    #[serde(with = "ts_seconds")]
    pub created_at: DateTime<Utc>,
    /// When the profile data was last refreshed from the game
    #[serde(with = "ts_seconds")]
    pub updated_at: DateTime<Utc>,
    /// Earliest time the service will refresh the profile again
    #[serde(rename = "nextUpdateAt", with = "ts_seconds")]
    pub next_update: DateTime<Utc>,
}

/// Decode the `rankedSeasons` payload object.
///
/// The payload keys season and playlist IDs as JSON strings:
/// `{"5": {"10": {"rankPoints": ..}}}`. The playlist key is folded into
/// each entry so a season's history is a flat list.
fn ranked_seasons<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<i64, Vec<RankedHistory>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, BTreeMap<String, RankedHistoryData>> =
        Deserialize::deserialize(deserializer)?;

    let mut seasons = BTreeMap::new();
    for (season_id, playlists) in raw {
        let season_id: i64 = season_id.parse().map_err(serde::de::Error::custom)?;
        let mut entries = Vec::with_capacity(playlists.len());
        for (playlist_id, data) in playlists {
            let playlist_id: i64 = playlist_id.parse().map_err(serde::de::Error::custom)?;
            entries.push(RankedHistory {
                playlist_id,
                rank_points: data.rank_points,
                matches_played: data.matches_played,
                tier_id: data.tier,
                division: data.division,
            });
        }
        seasons.insert(season_id, entries);
    }

    Ok(seasons)
}
