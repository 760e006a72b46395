#[path = "gallery/app/mod.rs"]
mod app;
#[path = "gallery/args.rs"]
mod args;
#[path = "gallery/config/mod.rs"]
mod config;
#[path = "gallery/logging.rs"]
mod logging;
#[path = "gallery/output.rs"]
mod output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
