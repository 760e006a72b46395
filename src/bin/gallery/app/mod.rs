mod commands;
mod session;

use std::path::PathBuf;

use clap::Parser;
use image_gallery::{
    client::{GalleryClientBuilder, HttpImageService},
    gallery::GalleryController,
};

use crate::args::{CliArgs, Command};
use crate::config::{load_config, AppConfig, ConfigPaths};
use crate::logging::init_logging;
use crate::output::FileRenderer;

pub type Gallery = GalleryController<HttpImageService, FileRenderer>;

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let loaded = load_config(args.config.clone())?;
    init_logging(&loaded.config.logging, &loaded.paths)?;
    if !loaded.config_exists {
        log::debug!(
            "No config file at {}, using defaults",
            loaded.paths.config_file.display()
        );
    }

    let service = build_service(&args, &loaded.config)?;
    let renderer = FileRenderer::new(output_dir(&args, &loaded.config, &loaded.paths))?;
    log::info!(
        "Using image server {} (output in {})",
        service.base_url(),
        renderer.directory().display()
    );
    let mut gallery = GalleryController::new(service, renderer);

    match args.command {
        Command::List => commands::list(&mut gallery).await,
        Command::Show { id, params } => commands::show(&mut gallery, id, params.as_deref()).await,
        Command::Upload { path, name } => commands::upload(&mut gallery, &path, name).await,
        Command::Delete { id } => commands::delete(&mut gallery, id).await,
        Command::Edit { id } => session::run_session(&mut gallery, id).await,
    }
}

fn build_service(args: &CliArgs, config: &AppConfig) -> anyhow::Result<HttpImageService> {
    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| config.server.base_url.clone());
    let mut builder = GalleryClientBuilder::new()
        .base_url(base_url)
        .user_agent(concat!("gallery/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = args.timeout.or(config.server.timeout_seconds) {
        builder = builder.timeout_seconds(timeout);
    }
    Ok(builder.build()?)
}

fn output_dir(args: &CliArgs, config: &AppConfig, paths: &ConfigPaths) -> PathBuf {
    args.output
        .clone()
        .or_else(|| config.output.directory.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| paths.output_dir.clone())
}
