//! # Tunes Core
//!
//! Core library for the Tunes catalog client: a typed request pipeline for
//! the iTunes Search API and a slot-aware image cache for result thumbnails.
//!
//! ## Overview
//!
//! - **Endpoint descriptors** ([`api::endpoint`]): immutable, pure
//!   descriptions of the search, artist lookup and artist-works calls.
//! - **Request pipeline** ([`api::pipeline`]): runs a descriptor over a
//!   [`Transport`], bounds the round trip with a timeout and maps every
//!   failure onto the closed [`NetworkError`] taxonomy.
//! - **Image cache** ([`image::cache`]): deduplicates concurrent downloads,
//!   keeps decoded thumbnails under a count and byte budget, and drops
//!   deliveries for display slots that were rebound to another item.
//! - **Catalog client** ([`catalog`]): the search / artist profile flows
//!   built on the pipeline.
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use tunes_core::{
//!     CatalogClient, CatalogSettings, ImageCache, ImageCacheConfig,
//!     RequestPipeline, ReqwestTransport, SlotId, SlotToken,
//!     FetchOutcome,
//! };
//! use tunes_model::MediaKind;
//!
//! async fn first_thumbnail() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = ReqwestTransport::new("tunes-example/0.1")?;
//!     let pipeline = RequestPipeline::new(Arc::new(transport));
//!     let catalog = CatalogClient::new(pipeline.clone(), CatalogSettings::default());
//!     let images = ImageCache::new(pipeline, ImageCacheConfig::default());
//!
//!     let items = catalog.search("Michael Jackson", MediaKind::Music, 10).await?;
//!     if let Some(url) = items.first().and_then(|item| item.artwork_url()) {
//!         let token = SlotToken::first(SlotId(0));
//!         match images.fetch(url, token) {
//!             FetchOutcome::Ready(image) => println!("{}x{}", image.width(), image.height()),
//!             FetchOutcome::Pending(pending) => {
//!                 if let Some(Ok(image)) = pending.await {
//!                     println!("{}x{}", image.width(), image.height());
//!                 }
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod api;
pub mod catalog;
pub mod error;
pub mod image;

pub use api::endpoint::{ApiEndpoint, CATALOG_BASE_URL, CatalogRoute, Endpoint};
pub use api::pipeline::{DEFAULT_REQUEST_TIMEOUT, RequestHandle, RequestPipeline};
pub use api::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use catalog::{
    ArtistProfile, CatalogClient, CatalogSettings, DEFAULT_RELATED_WORKS_LIMIT,
};
pub use error::{DecodeError, ErrorKind, NetworkError, Outcome, TransportError};
pub use image::cache::{
    CacheStats, FetchOutcome, FetchStatus, ImageCache, ImageCacheConfig,
    ImageResult, PendingImage,
};
pub use image::decoder::{DecodedImage, ImageDecoder, ImageRequest};
pub use image::slot::{SlotId, SlotToken};
