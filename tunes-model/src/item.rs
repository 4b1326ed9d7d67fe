use crate::ids::{AmgArtistId, ArtistId, ArtistRef};
use crate::media_type::{ItemKind, WrapperType};

/// One result record returned by the search and lookup endpoints.
///
/// Only `wrapper_type` is mandatory; every other field is optional because
/// the catalog omits whatever does not apply to the record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CatalogItem {
    pub wrapper_type: WrapperType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: Option<ItemKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub artist_id: Option<ArtistId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub amg_artist_id: Option<AmgArtistId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub collection_id: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub collection_artist_id: Option<ArtistId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub track_id: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub artist_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub collection_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub track_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub artist_view_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub collection_view_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub track_view_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub preview_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub artwork_url60: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub artwork_url100: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub collection_price: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub track_price: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub track_time_millis: Option<i64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub country: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub currency: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub primary_genre_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub short_description: Option<String>,
}

impl CatalogItem {
    /// Minimal record with only the mandatory field set.
    pub fn new(wrapper_type: WrapperType) -> Self {
        Self {
            wrapper_type,
            kind: None,
            artist_id: None,
            amg_artist_id: None,
            collection_id: None,
            collection_artist_id: None,
            track_id: None,
            artist_name: None,
            collection_name: None,
            track_name: None,
            artist_view_url: None,
            collection_view_url: None,
            track_view_url: None,
            preview_url: None,
            artwork_url60: None,
            artwork_url100: None,
            collection_price: None,
            track_price: None,
            track_time_millis: None,
            country: None,
            currency: None,
            primary_genre_name: None,
            short_description: None,
        }
    }

    /// Thumbnail URL to display, preferring the 100px artwork.
    pub fn artwork_url(&self) -> Option<&str> {
        self.artwork_url100
            .as_deref()
            .or(self.artwork_url60.as_deref())
    }

    /// Artist this record belongs to, if the catalog reported one.
    pub fn artist_ref(&self) -> Option<ArtistRef> {
        self.artist_id
            .map(ArtistRef::Artist)
            .or(self.amg_artist_id.map(ArtistRef::Amg))
            .or(self.collection_artist_id.map(ArtistRef::CollectionArtist))
    }

    /// Best human-readable title: track, then collection, then artist name.
    pub fn display_title(&self) -> &str {
        self.track_name
            .as_deref()
            .or(self.collection_name.as_deref())
            .or(self.artist_name.as_deref())
            .unwrap_or("")
    }
}

/// Envelope shared by the search and lookup endpoints.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ResultPage {
    pub result_count: u32,
    pub results: Vec<CatalogItem>,
}

pub type SearchResults = ResultPage;
pub type LookupResults = ResultPage;
