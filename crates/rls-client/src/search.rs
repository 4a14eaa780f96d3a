//! Cursor over paginated player search results

use serde::Deserialize;
use tracing::debug;

use crate::Result;
use crate::client::RlsClient;
use crate::response_types::Player;

/// Wire shape of one page of `search/players` results
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchPage {
    pub(crate) page: u32,
    pub(crate) results: u32,
    pub(crate) total_results: u32,
    pub(crate) max_results_per_page: u32,
    #[serde(rename = "data")]
    pub(crate) players: Vec<Player>,
}

/// Search results with cursor-based access to further pages.
///
/// Holds every player fetched so far; [`Self::next_page`] extends the set one
/// page at a time and [`Self::all`] drains the remaining pages. The cursor
/// borrows the client that produced it, so it cannot outlive the client.
#[derive(Debug)]
pub struct SearchResults<'a> {
    client: &'a RlsClient,
    display_name: String,
    page: u32,
    results: u32,
    total_results: u32,
    max_results_per_page: u32,
    players: Vec<Player>,
}

impl<'a> SearchResults<'a> {
    pub(crate) fn new(
        client: &'a RlsClient,
        display_name: impl Into<String>,
        page: SearchPage,
    ) -> Self {
        Self {
            client,
            display_name: display_name.into(),
            page: page.page,
            results: page.results,
            total_results: page.total_results,
            max_results_per_page: page.max_results_per_page,
            players: page.players,
        }
    }

    /// The search query this cursor was created for
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Page number of the most recently fetched page
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Result count of the most recently fetched page
    pub fn results(&self) -> u32 {
        self.results
    }

    /// Total number of players matching the query across all pages
    pub fn total_results(&self) -> u32 {
        self.total_results
    }

    /// Page size limit reported by the service
    pub fn max_results_per_page(&self) -> u32 {
        self.max_results_per_page
    }

    /// Every player fetched so far, in response order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Fetch the next page and return only the newly fetched players.
    ///
    /// A page shorter than the page-size limit marks the end of the result
    /// set; from then on this returns an empty vector without issuing a
    /// request.
    pub async fn next_page(&mut self) -> Result<Vec<Player>> {
        if self.results < self.max_results_per_page {
            return Ok(Vec::new());
        }

        self.page += 1;
        debug!("Fetching search page {} for {:?}", self.page, self.display_name);

        let page = self.client.search_page(&self.display_name, self.page).await?;
        self.results = page.results;
        self.players.extend(page.players.iter().cloned());
        Ok(page.players)
    }

    /// Fetch every remaining page and return the full accumulated set.
    ///
    /// Each page fetch goes through the client's serialized request path, so
    /// a heavily throttled query can block here for a long time.
    pub async fn all(&mut self) -> Result<&[Player]> {
        while !self.next_page().await?.is_empty() {}
        Ok(&self.players)
    }
}
