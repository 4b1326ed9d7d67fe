//! Endpoint descriptors.
//!
//! A descriptor is an immutable value describing one GET call: where it
//! goes and what shape its body decodes into. Building the target is a pure
//! function of the descriptor's fields; no I/O happens here.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tunes_model::{AmgArtistId, ArtistId, ItemKind, MediaKind};
use url::Url;

use super::decode::{Decoder, JsonDecoder};
use crate::error::{DecodeError, NetworkError};

/// Public catalog API root.
pub const CATALOG_BASE_URL: &str = "https://itunes.apple.com";

/// Largest page the catalog will return for a single call.
pub const MAX_RESULT_LIMIT: u32 = 200;

/// HTTP verb of a descriptor. The catalog is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
        }
    }
}

/// Fully-formed, validated request URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTarget(Url);

impl RequestTarget {
    /// Parses `raw`, accepting only absolute http(s) URLs with a host.
    pub fn parse(raw: &str) -> Result<Self, NetworkError> {
        let url = Url::parse(raw).map_err(|err| {
            NetworkError::Encoding(format!("{raw}: {err}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(NetworkError::Encoding(format!(
                "{raw}: not an http(s) URL"
            )));
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Something the request pipeline can execute.
pub trait Endpoint: Send + Sync {
    /// Value the response body decodes into.
    type Response: Send + 'static;

    fn method(&self) -> Method {
        Method::Get
    }

    /// Builds the request URL, or fails with [`NetworkError::Encoding`].
    fn target(&self) -> Result<RequestTarget, NetworkError>;

    fn decode(&self, body: &[u8]) -> Result<Self::Response, DecodeError>;
}

/// The three catalog calls and their validated parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogRoute {
    Search {
        term: String,
        media: MediaKind,
        limit: u32,
    },
    ArtistInfo {
        id: ArtistId,
    },
    /// Recent works of an artist. The AMG id takes precedence over `id`
    /// when present; a missing `entity` asks for every kind.
    ArtistWorks {
        id: ArtistId,
        amg_id: Option<AmgArtistId>,
        entity: Option<ItemKind>,
        limit: u32,
    },
}

impl CatalogRoute {
    fn path_and_query(&self) -> Result<String, NetworkError> {
        match self {
            CatalogRoute::Search { term, media, limit } => {
                if term.trim().is_empty() {
                    return Err(NetworkError::Encoding(
                        "search term is empty".into(),
                    ));
                }
                check_limit(*limit)?;
                Ok(format!(
                    "/search?term={}&media={}&limit={}",
                    urlencoding::encode(term),
                    media.as_str(),
                    limit
                ))
            }
            CatalogRoute::ArtistInfo { id } => Ok(format!("/lookup?id={id}")),
            CatalogRoute::ArtistWorks {
                id,
                amg_id,
                entity,
                limit,
            } => {
                check_limit(*limit)?;
                let entity = entity_param(*entity);
                Ok(match amg_id {
                    Some(amg_id) => format!(
                        "/lookup?amgArtistId={amg_id}&entity={entity}&limit={limit}&sort=recent"
                    ),
                    None => format!(
                        "/lookup?id={id}&entity={entity}&limit={limit}&sort=recent"
                    ),
                })
            }
        }
    }
}

fn check_limit(limit: u32) -> Result<(), NetworkError> {
    if limit == 0 || limit > MAX_RESULT_LIMIT {
        return Err(NetworkError::Encoding(format!(
            "limit {limit} outside 1..={MAX_RESULT_LIMIT}"
        )));
    }
    Ok(())
}

fn entity_param(entity: Option<ItemKind>) -> &'static str {
    match entity {
        Some(ItemKind::Unrecognized) | None => "all",
        Some(kind) => kind.as_str(),
    }
}

/// Typed catalog descriptor: a [`CatalogRoute`] plus the response shape `R`.
pub struct ApiEndpoint<R> {
    base_url: String,
    route: CatalogRoute,
    _response: PhantomData<fn() -> R>,
}

impl<R> ApiEndpoint<R> {
    pub fn new(route: CatalogRoute) -> Self {
        Self {
            base_url: CATALOG_BASE_URL.to_string(),
            route,
            _response: PhantomData,
        }
    }

    pub fn search(term: impl Into<String>, media: MediaKind, limit: u32) -> Self {
        Self::new(CatalogRoute::Search {
            term: term.into(),
            media,
            limit,
        })
    }

    pub fn lookup_artist_info(id: ArtistId) -> Self {
        Self::new(CatalogRoute::ArtistInfo { id })
    }

    pub fn lookup_artist_works(
        id: ArtistId,
        amg_id: Option<AmgArtistId>,
        entity: Option<ItemKind>,
        limit: u32,
    ) -> Self {
        Self::new(CatalogRoute::ArtistWorks {
            id,
            amg_id,
            entity,
            limit,
        })
    }

    /// Points the descriptor at another API root (mirrors, local fakes).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn route(&self) -> &CatalogRoute {
        &self.route
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl<R> Clone for ApiEndpoint<R> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            route: self.route.clone(),
            _response: PhantomData,
        }
    }
}

impl<R> fmt::Debug for ApiEndpoint<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiEndpoint")
            .field("base_url", &self.base_url)
            .field("route", &self.route)
            .field("response", &std::any::type_name::<R>())
            .finish()
    }
}

impl<R> Endpoint for ApiEndpoint<R>
where
    R: DeserializeOwned + Send + 'static,
{
    type Response = R;

    fn target(&self) -> Result<RequestTarget, NetworkError> {
        let base = self.base_url.trim_end_matches('/');
        let raw = format!("{base}{}", self.route.path_and_query()?);
        RequestTarget::parse(&raw)
    }

    fn decode(&self, body: &[u8]) -> Result<R, DecodeError> {
        JsonDecoder.decode(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunes_model::{LookupResults, SearchResults};

    fn target_of<R>(endpoint: &ApiEndpoint<R>) -> String
    where
        R: DeserializeOwned + Send + 'static,
    {
        endpoint.target().expect("valid target").to_string()
    }

    #[test]
    fn search_target_percent_encodes_term() {
        let endpoint = ApiEndpoint::<SearchResults>::search(
            "Michael Jackson",
            MediaKind::Music,
            10,
        );
        assert_eq!(
            target_of(&endpoint),
            "https://itunes.apple.com/search?term=Michael%20Jackson&media=music&limit=10"
        );
    }

    #[test]
    fn search_target_is_deterministic() {
        let a = ApiEndpoint::<SearchResults>::search("Björk", MediaKind::All, 20);
        let b = ApiEndpoint::<SearchResults>::search("Björk", MediaKind::All, 20);
        assert_eq!(target_of(&a), target_of(&b));
        assert_eq!(
            target_of(&a),
            "https://itunes.apple.com/search?term=Bj%C3%B6rk&media=all&limit=20"
        );
    }

    #[test]
    fn reserved_characters_cannot_break_out_of_the_term() {
        let endpoint = ApiEndpoint::<SearchResults>::search(
            "AC/DC & Friends?=#",
            MediaKind::MusicVideo,
            50,
        );
        assert_eq!(
            target_of(&endpoint),
            "https://itunes.apple.com/search?term=AC%2FDC%20%26%20Friends%3F%3D%23&media=musicVideo&limit=50"
        );
    }

    #[test]
    fn artist_info_target() {
        let endpoint =
            ApiEndpoint::<LookupResults>::lookup_artist_info(ArtistId(12345));
        assert_eq!(
            target_of(&endpoint),
            "https://itunes.apple.com/lookup?id=12345"
        );
    }

    #[test]
    fn artist_works_prefers_amg_id() {
        let endpoint = ApiEndpoint::<LookupResults>::lookup_artist_works(
            ArtistId(4321),
            Some(AmgArtistId(1234)),
            Some(ItemKind::Album),
            5,
        );
        assert_eq!(
            target_of(&endpoint),
            "https://itunes.apple.com/lookup?amgArtistId=1234&entity=album&limit=5&sort=recent"
        );
    }

    #[test]
    fn artist_works_without_amg_id_uses_plain_id_and_all_entity() {
        let endpoint = ApiEndpoint::<LookupResults>::lookup_artist_works(
            ArtistId(4321),
            None,
            None,
            5,
        );
        assert_eq!(
            target_of(&endpoint),
            "https://itunes.apple.com/lookup?id=4321&entity=all&limit=5&sort=recent"
        );
    }

    #[test]
    fn custom_base_url_is_honoured() {
        let endpoint =
            ApiEndpoint::<LookupResults>::lookup_artist_info(ArtistId(1))
                .with_base_url("http://127.0.0.1:8080/");
        assert_eq!(target_of(&endpoint), "http://127.0.0.1:8080/lookup?id=1");
    }

    #[test]
    fn invalid_inputs_fail_with_encoding_error() {
        let empty = ApiEndpoint::<SearchResults>::search("   ", MediaKind::All, 20);
        assert!(matches!(empty.target(), Err(NetworkError::Encoding(_))));

        let zero = ApiEndpoint::<SearchResults>::search("abba", MediaKind::All, 0);
        assert!(matches!(zero.target(), Err(NetworkError::Encoding(_))));

        let huge = ApiEndpoint::<SearchResults>::search("abba", MediaKind::All, 201);
        assert!(matches!(huge.target(), Err(NetworkError::Encoding(_))));

        let bad_base = ApiEndpoint::<SearchResults>::search("abba", MediaKind::All, 20)
            .with_base_url("itunes.apple.com");
        assert!(matches!(bad_base.target(), Err(NetworkError::Encoding(_))));

        let ftp = ApiEndpoint::<SearchResults>::search("abba", MediaKind::All, 20)
            .with_base_url("ftp://itunes.apple.com");
        assert!(matches!(ftp.target(), Err(NetworkError::Encoding(_))));
    }
}
