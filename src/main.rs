mod app;

use anyhow::Context;
use app::FramePlayerApp;
use clap::Parser;
use eframe::NativeOptions;
use egui_frame_player::config::Args;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    ffmpeg_next::init().context("Failed to initialize FFmpeg")?;

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Video Player"),
        ..Default::default()
    };

    eframe::run_native(
        "Video Player",
        options,
        Box::new(|cc| Ok(Box::new(FramePlayerApp::new(cc, args)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))
}
