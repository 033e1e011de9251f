//! Department console - desktop admin for nested departments over GraphQL.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use eframe::egui;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use dept_console as app;

use app::client::DirectoryClient;
use app::config::{AppConfig, ConfigLoadResult};
use app::session::{FileSessionStore, MemorySessionStore, SharedSession};
use app::ui::ConsoleApp;

/// Desktop console for managing departments and sub-departments.
#[derive(Parser)]
#[command(name = "dept-console")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Override the directory service base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Keep the session in memory only
    #[arg(long)]
    no_persist: bool,
}

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = if cli.dev {
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };

    let (config, config_note) = load_config(&config_path);
    let config = apply_overrides(config, &cli);

    // Initialize logging; the guard must outlive the window.
    let _log_guard = init_logging(&config);

    tracing::info!("Department console starting...");
    tracing::info!("Config path: {:?}", config_path);
    if let Some(note) = config_note {
        tracing::warn!("{}", note);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Config invalid after overrides: {}", e);
        std::process::exit(2);
    }
    tracing::info!("Directory service: {}", config.api.graphql_url());

    let session = open_session(&config);

    let client = match DirectoryClient::new(&config.api, session) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    // Create tokio runtime for async operations
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Department Management")
            .with_inner_size([config.ui.window_width, config.ui.window_height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Department Management",
        options,
        Box::new(|cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(ConsoleApp::new(client, config, rt)))
        }),
    )
}

/// Load config, falling back to defaults when missing or invalid.
///
/// A missing file is created with defaults so it can be edited.
fn load_config(path: &Path) -> (AppConfig, Option<String>) {
    match AppConfig::try_load(path) {
        ConfigLoadResult::Loaded(config) => (config, None),
        ConfigLoadResult::Missing => {
            let config = AppConfig::default();
            let note = match config.save(path) {
                Ok(()) => format!("Config missing, wrote defaults to {path:?}"),
                Err(e) => format!("Config missing and defaults could not be written: {e}"),
            };
            (config, Some(note))
        }
        ConfigLoadResult::Invalid(e) => (AppConfig::default(), Some(format!("Config invalid, using defaults: {e}"))),
    }
}

fn apply_overrides(mut config: AppConfig, cli: &Cli) -> AppConfig {
    config.apply_env();
    if let Some(url) = &cli.api_url {
        config.api.url = url.clone();
    }
    if cli.no_persist {
        config.session.persist = false;
    }
    config
}

/// Console logging plus optional daily log files.
fn init_logging(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());

    match &config.logging.file_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "dept-console.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

fn open_session(config: &AppConfig) -> SharedSession {
    if !config.session.persist {
        tracing::info!("Session kept in memory only");
        return Arc::new(MemorySessionStore::new());
    }

    let dir = match &config.session.token_dir {
        Some(dir) => dir.clone(),
        None => match FileSessionStore::default_dir() {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!("{}; keeping session in memory", e);
                return Arc::new(MemorySessionStore::new());
            }
        },
    };

    let store = FileSessionStore::new(&dir);
    tracing::info!("Session file: {:?}", store.path());
    Arc::new(store)
}
