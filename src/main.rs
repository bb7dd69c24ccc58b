// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use cosmic::Application;
use snapcam::app::AppModel;
use snapcam::config::Config;
use snapcam::{constants, i18n, storage};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "snapcam")]
#[command(about = "Take a photo, save it to the gallery or apply a quick effect")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run in terminal mode (renders camera to terminal)
    Terminal,

    /// List available cameras
    List,

    /// Take a photo
    Photo {
        /// Camera index to use (from 'snapcam list')
        #[arg(short, long, default_value = "0")]
        camera: usize,

        /// Also add the photo to the gallery folder
        #[arg(short, long)]
        save: bool,
    },

    /// Resize and rotate an existing image
    Effect {
        /// Image to transform
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=snapcam=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();
    i18n::init(&requested_languages);

    storage::prune_scratch_files(constants::timing::SCRATCH_MAX_AGE);

    match cli.command {
        Some(Commands::Terminal) => snapcam::terminal::run(),
        Some(Commands::List) => Ok(cli::list_cameras()?),
        Some(Commands::Photo { camera, save }) => {
            Ok(cli::take_photo(&Config::load(AppModel::APP_ID), camera, save)?)
        }
        Some(Commands::Effect { input }) => Ok(cli::apply_effect(input)?),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(360.0)
            .min_height(180.0),
    );

    // Starts the application's event loop with `()` as the application's flags.
    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
