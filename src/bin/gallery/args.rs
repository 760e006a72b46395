use clap::{Parser, Subcommand};
use image_gallery::types::ImageId;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gallery",
    about = "Browse and edit the images of a remote image gallery"
)]
pub struct CliArgs {
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
    /// Root URL of the image server
    #[arg(long)]
    pub base_url: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Directory displayed images are written to
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the images stored on the server
    List,
    /// Fetch one image, optionally processed by an algorithm
    Show {
        id: ImageId,
        /// Algorithm parameters, e.g. "blur size=3 type=M"
        #[arg(long, short = 'p')]
        params: Option<String>,
    },
    /// Add a local image file to the gallery
    Upload {
        path: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete an image from the server
    Delete { id: ImageId },
    /// Start an interactive editing session on an image
    Edit { id: ImageId },
}
