//! Search and artist-profile flows on top of the request pipeline.

use std::time::Duration;

use tracing::debug;
use tunes_model::{
    AmgArtistId, ArtistId, CatalogItem, ItemKind, LookupResults, MediaKind,
    SearchResults,
};

use crate::api::endpoint::{ApiEndpoint, CATALOG_BASE_URL};
use crate::api::pipeline::{DEFAULT_REQUEST_TIMEOUT, RequestPipeline};
use crate::error::Outcome;

/// Related works shown next to an artist.
pub const DEFAULT_RELATED_WORKS_LIMIT: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    pub base_url: String,
    pub request_timeout: Duration,
    pub related_works_limit: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: CATALOG_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            related_works_limit: DEFAULT_RELATED_WORKS_LIMIT,
        }
    }
}

/// Artist details plus a short list of their recent works.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArtistProfile {
    /// `None` when the artist lookup came back empty.
    pub artist: Option<CatalogItem>,
    pub works: Vec<CatalogItem>,
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    pipeline: RequestPipeline,
    settings: CatalogSettings,
}

impl CatalogClient {
    pub fn new(pipeline: RequestPipeline, settings: CatalogSettings) -> Self {
        Self { pipeline, settings }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    fn endpoint<R>(&self, endpoint: ApiEndpoint<R>) -> ApiEndpoint<R> {
        endpoint.with_base_url(self.settings.base_url.as_str())
    }

    pub async fn search(
        &self,
        term: &str,
        media: MediaKind,
        limit: u32,
    ) -> Outcome<Vec<CatalogItem>> {
        let endpoint =
            self.endpoint(ApiEndpoint::<SearchResults>::search(term, media, limit));
        let page = self
            .pipeline
            .execute(&endpoint, self.settings.request_timeout)
            .await?;
        Ok(page.results)
    }

    /// First record of an artist lookup.
    pub async fn artist_info(
        &self,
        id: ArtistId,
    ) -> Outcome<Option<CatalogItem>> {
        let endpoint =
            self.endpoint(ApiEndpoint::<LookupResults>::lookup_artist_info(id));
        let page = self
            .pipeline
            .execute(&endpoint, self.settings.request_timeout)
            .await?;
        Ok(page.results.into_iter().next())
    }

    /// Recent works of an artist, at most `limit` of them.
    ///
    /// The catalog does not always honour `limit`, so the list is cut down
    /// after the fetch as well.
    pub async fn artist_works(
        &self,
        id: ArtistId,
        amg_id: Option<AmgArtistId>,
        entity: Option<ItemKind>,
        limit: u32,
    ) -> Outcome<Vec<CatalogItem>> {
        let endpoint = self.endpoint(
            ApiEndpoint::<LookupResults>::lookup_artist_works(
                id, amg_id, entity, limit,
            ),
        );
        let page = self
            .pipeline
            .execute(&endpoint, self.settings.request_timeout)
            .await?;
        Ok(truncate_results(page.results, limit))
    }

    /// Resolves the artist behind `item` and their recent works.
    ///
    /// Returns `Ok(None)` when `item` names no artist at all. Works are
    /// looked up by the artist's AMG id when the artist lookup reports one,
    /// and restricted to the same kind as `item`.
    pub async fn artist_profile(
        &self,
        item: &CatalogItem,
    ) -> Outcome<Option<ArtistProfile>> {
        let Some(artist_ref) = item.artist_ref() else {
            debug!(title = item.display_title(), "item carries no artist reference");
            return Ok(None);
        };
        let id = artist_ref.lookup_id();

        let artist = self.artist_info(id).await?;
        let amg_id = artist.as_ref().and_then(|artist| artist.amg_artist_id);
        let works = self
            .artist_works(id, amg_id, item.kind, self.settings.related_works_limit)
            .await?;

        Ok(Some(ArtistProfile { artist, works }))
    }
}

fn truncate_results(mut results: Vec<CatalogItem>, limit: u32) -> Vec<CatalogItem> {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    if results.len() > limit {
        debug!(received = results.len(), limit, "truncating oversized result list");
        results.truncate(limit);
    }
    results
}
