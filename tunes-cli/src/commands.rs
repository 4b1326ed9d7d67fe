use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::info;
use tunes_config::Config;
use tunes_core::{
    CatalogClient, FetchOutcome, ImageCache, RequestPipeline, ReqwestTransport,
    SlotId, SlotToken,
};
use tunes_model::{ArtistId, CatalogItem, ItemKind, MediaKind};

/// Shared clients built once from the loaded configuration.
#[derive(Debug)]
pub struct App {
    config: Config,
    pipeline: RequestPipeline,
    catalog: CatalogClient,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.api.user_agent)
            .context("failed to build HTTP client")?;
        let pipeline = RequestPipeline::new(Arc::new(transport));
        let catalog = CatalogClient::new(pipeline.clone(), config.catalog());
        Ok(Self {
            config,
            pipeline,
            catalog,
        })
    }

    pub async fn search(
        &self,
        term: &str,
        media: Option<MediaKind>,
        limit: Option<u32>,
        json: bool,
    ) -> Result<()> {
        let media = media.unwrap_or(self.config.search.media);
        let limit = limit.unwrap_or(self.config.search.limit);
        let items = self
            .catalog
            .search(term, media, limit)
            .await
            .with_context(|| format!("search for '{term}' failed"))?;

        if json {
            println!("{}", serde_json::to_string_pretty(&items)?);
            return Ok(());
        }
        if items.is_empty() {
            println!("No results for '{term}'.");
        }
        for (index, item) in items.iter().enumerate() {
            println!("{:>3}. {}", index + 1, describe(item));
        }
        Ok(())
    }

    pub async fn artist(
        &self,
        id: ArtistId,
        entity: Option<ItemKind>,
        limit: Option<u32>,
    ) -> Result<()> {
        let limit = limit.unwrap_or(self.config.search.related_limit);
        let artist = self
            .catalog
            .artist_info(id)
            .await
            .with_context(|| format!("lookup of artist {id} failed"))?;

        let amg_id = artist.as_ref().and_then(|artist| artist.amg_artist_id);
        match &artist {
            Some(artist) => {
                println!("{}", artist.display_title());
                if let Some(genre) = &artist.primary_genre_name {
                    println!("  genre: {genre}");
                }
                if let Some(link) = &artist.artist_view_url {
                    println!("  {link}");
                }
            }
            None => println!("Artist {id} not found; listing works by id."),
        }

        let works = self
            .catalog
            .artist_works(id, amg_id, entity, limit)
            .await
            .with_context(|| format!("works of artist {id} could not be loaded"))?;
        println!("Recent works:");
        for (index, work) in works.iter().enumerate() {
            println!("{:>3}. {}", index + 1, describe(work));
        }
        Ok(())
    }

    pub async fn artwork(
        &self,
        term: &str,
        media: Option<MediaKind>,
        limit: Option<u32>,
    ) -> Result<()> {
        let media = media.unwrap_or(self.config.search.media);
        let limit = limit.unwrap_or(self.config.search.limit);
        let items = self
            .catalog
            .search(term, media, limit)
            .await
            .with_context(|| format!("search for '{term}' failed"))?;

        let images =
            ImageCache::new(self.pipeline.clone(), self.config.image_cache());
        let rows = items.iter().enumerate().map(|(row, item)| {
            let images = images.clone();
            async move {
                let Some(url) = item.artwork_url() else {
                    return format!("{} (no artwork)", item.display_title());
                };
                let token = SlotToken::first(SlotId(row as u64));
                let result = match images.fetch(url, token) {
                    FetchOutcome::Ready(image) => Some(Ok(image)),
                    FetchOutcome::Pending(pending) => pending.await,
                };
                match result {
                    Some(Ok(image)) => format!(
                        "{}: {}x{} ({})",
                        item.display_title(),
                        image.width(),
                        image.height(),
                        image.footprint()
                    ),
                    Some(Err(err)) => format!("{}: {err}", item.display_title()),
                    None => format!("{}: superseded", item.display_title()),
                }
            }
        });

        for (index, line) in join_all(rows).await.into_iter().enumerate() {
            println!("{:>3}. {line}", index + 1);
        }

        let stats = images.stats();
        info!(
            entries = stats.entries,
            resident = %stats.resident,
            hits = stats.hits,
            misses = stats.misses,
            joins = stats.joins,
            evictions = stats.evictions,
            "image cache"
        );
        println!(
            "cache: {} images, {} resident, {} downloads, {} shared, {} evicted",
            stats.entries, stats.resident, stats.misses, stats.joins, stats.evictions
        );
        Ok(())
    }
}

fn describe(item: &CatalogItem) -> String {
    let mut line = item.display_title().to_string();
    if let Some(artist) = &item.artist_name
        && item.track_name.is_some()
    {
        line.push_str(" - ");
        line.push_str(artist);
    }
    if let Some(kind) = item.kind {
        line.push_str(&format!(" [{kind}]"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunes_model::WrapperType;

    #[test]
    fn describe_includes_artist_and_kind_for_tracks() {
        let mut item = CatalogItem::new(WrapperType::Track);
        item.track_name = Some("Thriller".into());
        item.artist_name = Some("Michael Jackson".into());
        item.kind = Some(ItemKind::Song);
        assert_eq!(describe(&item), "Thriller - Michael Jackson [song]");
    }

    #[test]
    fn describe_falls_back_to_collection_name() {
        let mut item = CatalogItem::new(WrapperType::Collection);
        item.collection_name = Some("Bad".into());
        item.artist_name = Some("Michael Jackson".into());
        assert_eq!(describe(&item), "Bad");
    }
}
