use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ModelError;

/// Media filter accepted by the catalog search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum MediaKind {
    Movie,
    Podcast,
    Music,
    MusicVideo,
    Audiobook,
    ShortFilm,
    TvShow,
    Software,
    Ebook,
    #[default]
    All,
}

impl MediaKind {
    pub const ALL_KINDS: [MediaKind; 10] = [
        MediaKind::Movie,
        MediaKind::Podcast,
        MediaKind::Music,
        MediaKind::MusicVideo,
        MediaKind::Audiobook,
        MediaKind::ShortFilm,
        MediaKind::TvShow,
        MediaKind::Software,
        MediaKind::Ebook,
        MediaKind::All,
    ];

    /// Spelling used in the `media` query parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Podcast => "podcast",
            MediaKind::Music => "music",
            MediaKind::MusicVideo => "musicVideo",
            MediaKind::Audiobook => "audiobook",
            MediaKind::ShortFilm => "shortFilm",
            MediaKind::TvShow => "tvShow",
            MediaKind::Software => "software",
            MediaKind::Ebook => "ebook",
            MediaKind::All => "all",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        MediaKind::ALL_KINDS
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownMediaKind(s.to_string()))
    }
}

/// Top-level record type reported by the catalog for each result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WrapperType {
    Track,
    Collection,
    Artist,
    Audiobook,
}

/// Finer-grained content kind of a result.
///
/// The catalog grows new kinds over time; anything not listed here decodes
/// to [`ItemKind::Unrecognized`] instead of failing the whole page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ItemKind {
    Book,
    Album,
    Pdf,
    Podcast,
    Song,
    Artist,
    TvEpisode,
    SoftwarePackage,
    PodcastEpisode,
    MusicVideo,
    InteractiveBooklet,
    FeatureMovie,
    CoachedAudio,
    #[cfg_attr(feature = "serde", serde(other))]
    Unrecognized,
}

impl ItemKind {
    const KNOWN: [ItemKind; 13] = [
        ItemKind::Book,
        ItemKind::Album,
        ItemKind::Pdf,
        ItemKind::Podcast,
        ItemKind::Song,
        ItemKind::Artist,
        ItemKind::TvEpisode,
        ItemKind::SoftwarePackage,
        ItemKind::PodcastEpisode,
        ItemKind::MusicVideo,
        ItemKind::InteractiveBooklet,
        ItemKind::FeatureMovie,
        ItemKind::CoachedAudio,
    ];

    /// Wire spelling, also used as the `entity` parameter of works lookups.
    pub const fn as_str(self) -> &'static str {
        match self {
            ItemKind::Book => "book",
            ItemKind::Album => "album",
            ItemKind::Pdf => "pdf",
            ItemKind::Podcast => "podcast",
            ItemKind::Song => "song",
            ItemKind::Artist => "artist",
            ItemKind::TvEpisode => "tv-episode",
            ItemKind::SoftwarePackage => "software-package",
            ItemKind::PodcastEpisode => "podcast-episode",
            ItemKind::MusicVideo => "music-video",
            ItemKind::InteractiveBooklet => "interactive-booklet",
            ItemKind::FeatureMovie => "feature-movie",
            ItemKind::CoachedAudio => "coached-audio",
            ItemKind::Unrecognized => "unrecognized",
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ItemKind::KNOWN
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownItemKind(s.to_string()))
    }
}
