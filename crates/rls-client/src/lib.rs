//! RocketLeagueStats REST API client
//!
//! Typed bindings to the RocketLeagueStats API: player, platform, season,
//! tier, and playlist lookups plus display-name search with cursor-based
//! pagination. All requests for one client are serialized through a single
//! rate-limit-aware request path that waits out the service's reset window
//! and transparently retries throttled calls; reference data is cached on
//! first access.
//!
//! ```no_run
//! use rls_client::{Platform, RlsClient};
//!
//! # async fn run() -> rls_client::Result<()> {
//! let client = RlsClient::new("my-api-key")?;
//!
//! let player = client
//!     .player(76_561_198_033_338_223_u64, Platform::steam())
//!     .await?;
//! println!("{} has {} wins", player.display_name, player.stats.wins);
//!
//! let mut search = client.search("Squishy", 0).await?;
//! let everyone = search.all().await?;
//! println!("{} players found", everyone.len());
//! # Ok(())
//! # }
//! ```

mod cache;
pub mod client;
pub mod error;
pub mod http;
pub mod response_types;
pub mod search;

pub use client::{BatchEntry, MAX_BATCH_SIZE, PlatformKey, RlsClient};
pub use error::{Error, Result};
pub use http::{API_BASE, HttpClient};
pub use response_types::{Platform, Player, Playlist, RankedHistory, Season, Stats, Tier};
pub use search::SearchResults;
