//! Artwork download, decode and caching.

pub mod cache;
pub mod decoder;
pub mod slot;

pub use cache::{
    CacheStats, FetchOutcome, FetchStatus, ImageCache, ImageCacheConfig,
    ImageResult, PendingImage,
};
pub use decoder::{DecodedImage, ImageDecoder, ImageRequest};
pub use slot::{SlotId, SlotToken};
