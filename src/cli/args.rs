//! Command line argument definitions.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Media Renamer - rename your library into a tagged, normalized layout
#[derive(Parser, Debug)]
#[command(name = "media-renamer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Type of media to rename
    #[arg(value_enum, value_name = "MEDIA")]
    pub media: MediaArg,

    /// Path to the media library
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output directory name, created in the parent of PATH
    #[arg(value_name = "OUTPUT")]
    pub output: String,

    /// Create a fake directory structure of marker files, touch nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Do not prompt; ambiguous matches take the best-scored candidate
    #[arg(long)]
    pub no_interact: bool,

    /// Also write the computed plan as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub plan: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Media type argument.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaArg {
    Movie,
    Show,
}

impl From<MediaArg> for crate::models::media::MediaKind {
    fn from(arg: MediaArg) -> Self {
        match arg {
            MediaArg::Movie => Self::Movie,
            MediaArg::Show => Self::Show,
        }
    }
}
