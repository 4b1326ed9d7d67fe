//! Catalog data model definitions shared across Tunes crates.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod item;
pub mod media_type;
pub mod units;

pub use error::{ModelError, Result as ModelResult};
pub use ids::{AmgArtistId, ArtistId, ArtistRef};
pub use item::{CatalogItem, LookupResults, ResultPage, SearchResults};
pub use media_type::{ItemKind, MediaKind, WrapperType};
pub use units::ByteSize;
