mod app;
mod config;
mod upload;
mod utils;

use anyhow::Context;
use app::HostelMediaApp;
use config::MediaHostConfig;
use eframe::CreationContext;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use upload::{CloudinaryClient, FormLayout};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hostel_media_uploader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MediaHostConfig::from_env().context("Invalid media host configuration")?;
    tracing::info!(
        cloud = %config.cloud_name,
        preset = %config.upload_preset,
        "Loaded media host configuration",
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let host = Arc::new(CloudinaryClient::new(config));
    let app = HostelMediaApp::new(host, FormLayout::defaults(), runtime)
        .context("Invalid form layout")?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 720.0])
            .with_min_inner_size([420.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Hostel Media Uploader",
        options,
        Box::new(move |_cc: &CreationContext| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run window: {}", e))
}
