use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tunes_model::{ArtistId, ItemKind, MediaKind};

#[derive(Debug, Parser)]
#[command(name = "tunes", version, about = "Search the iTunes catalog from the terminal")]
pub struct Cli {
    /// Path to a tunes.toml (defaults to ./tunes.toml or config/tunes.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the catalog by free-text term
    Search {
        term: String,
        /// movie, podcast, music, musicVideo, audiobook, shortFilm, tvShow, software, ebook or all
        #[arg(long)]
        media: Option<MediaKind>,
        /// Page size (1-200)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=200))]
        limit: Option<u32>,
        /// Print raw result records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show an artist and their recent works
    Artist {
        id: ArtistId,
        /// Restrict works to one kind (song, album, feature-movie, ...)
        #[arg(long)]
        entity: Option<ItemKind>,
        /// Number of works to show (1-200)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=200))]
        limit: Option<u32>,
    },
    /// Download the thumbnails of a search through the image cache
    Artwork {
        term: String,
        #[arg(long)]
        media: Option<MediaKind>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=200))]
        limit: Option<u32>,
    },
}
