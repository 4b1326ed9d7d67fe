use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::ModelError;

/// Catalog artist identifier (`artistId` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ArtistId(pub u64);

/// All Music Guide artist identifier (`amgArtistId` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AmgArtistId(pub u64);

impl ArtistId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl AmgArtistId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for AmgArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArtistId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ArtistId)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

impl FromStr for AmgArtistId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(AmgArtistId)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

/// Which field of a result an artist reference was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtistRef {
    Artist(ArtistId),
    Amg(AmgArtistId),
    CollectionArtist(ArtistId),
}

impl ArtistRef {
    /// Identifier passed to the `id` parameter of an artist lookup.
    ///
    /// The catalog accepts every variant through `id`, so AMG references are
    /// forwarded as-is.
    pub const fn lookup_id(self) -> ArtistId {
        match self {
            ArtistRef::Artist(id) | ArtistRef::CollectionArtist(id) => id,
            ArtistRef::Amg(AmgArtistId(raw)) => ArtistId(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_parse_from_decimal_strings() {
        assert_eq!(" 909253 ".parse::<ArtistId>(), Ok(ArtistId(909253)));
        assert_eq!("1234".parse::<AmgArtistId>(), Ok(AmgArtistId(1234)));
        assert!("-1".parse::<ArtistId>().is_err());
    }

    #[test]
    fn amg_reference_forwards_raw_value() {
        assert_eq!(ArtistRef::Amg(AmgArtistId(7)).lookup_id(), ArtistId(7));
    }
}
