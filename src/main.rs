//! HMI Player - Main Entry Point
//!
//! Loads the configuration, acquires the scene font (fatal if none of the
//! candidates can be read), restores the variable snapshot and opens the
//! player window.

use anyhow::Context;
use clap::Parser;
use hmi_player::{
    config::PlayerConfig,
    persistence::SnapshotFile,
    render::load_font,
    scene::write_default_scene,
    store::VariableStore,
    HmiApp,
};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "hmi-player", version)]
#[command(about = "Run an operator dashboard described by a JSON scene document")]
struct Args {
    /// Config file (defaults to hmi.toml, then the platform config directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Scene document, overriding the configured path
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Variable snapshot file, overriding the configured path
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Disable demo seeding and the demonstration control loop
    #[arg(long)]
    no_demo: bool,

    /// Write the default scene document to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_default_scene: Option<PathBuf>,
}

/// Console logging plus an optional daily-rolling file. The returned guard
/// must be held until exit so buffered lines reach the file.
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "hmi-player.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,hmi_player=debug")),
        )
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut config, config_origin) = PlayerConfig::load_or_default(args.config.as_deref());
    if let Some(scene) = args.scene {
        config.paths.scene = scene;
    }
    if let Some(snapshot) = args.snapshot {
        config.paths.snapshot = snapshot;
    }
    if args.no_demo {
        config.demo.enabled = false;
    }

    let _log_guard = init_logging(config.paths.log_dir.as_deref());
    config_origin.log();

    if let Some(path) = args.write_default_scene {
        write_default_scene(&path)?;
        return Ok(());
    }

    tracing::info!("Starting XSmall-HMI SCADA Player");

    let font = load_font(&config.fonts.candidates).context("Failed to initialize HMI player")?;

    let store = VariableStore::shared();
    if config.demo.enabled {
        store.seed_demo_values();
    }
    let snapshot = SnapshotFile::new(&config.paths.snapshot);
    snapshot.load_into(&store);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width as f32, config.window.height as f32])
            .with_resizable(false)
            .with_title(&config.window.title),
        ..Default::default()
    };

    let scene_path = config.paths.scene.clone();
    let title = config.window.title.clone();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(HmiApp::new(
                cc, &config, store, &font, &scene_path, snapshot,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Window system error: {}", e))?;

    tracing::info!("HMI player exited");
    Ok(())
}
