use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use newsdash::api::NewsClient;
use newsdash::app::{App, AppEvent};
use newsdash::config::{default_config_path, Config, BASE_URL_ENV};
use newsdash::keybindings::KeybindingRegistry;
use newsdash::theme::ThemeVariant;
use newsdash::ui;

#[derive(Parser, Debug)]
#[command(
    name = "newsdash",
    version,
    about = "Terminal dashboard for fetching and filtering classified news"
)]
struct Args {
    /// Backend root URL (overrides NEWSDASH_BASE_URL and the config file)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Config file [default: ~/.config/newsdash/config.toml]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Color theme
    #[arg(long, value_parser = ["dark", "light"])]
    theme: Option<String>,

    /// Fetch news as soon as the dashboard opens
    #[arg(long)]
    fetch_on_start: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never land on the alternate screen
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.config.clone().or_else(default_config_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            tracing::warn!("HOME not set, using default configuration");
            Config::default()
        }
    };

    let env_base_url = std::env::var(BASE_URL_ENV).ok();
    let base_url = config.effective_base_url(args.base_url.as_deref(), env_base_url.as_deref());
    let timeout = Duration::from_secs(config.request_timeout_secs.max(1));
    let client = NewsClient::new(&base_url, timeout)
        .with_context(|| format!("Invalid backend URL '{}'", base_url))?;

    let theme_name = args.theme.as_deref().unwrap_or(&config.theme);
    let theme = ThemeVariant::from_str_name(theme_name).unwrap_or_else(|| {
        tracing::warn!(theme = %theme_name, "Unknown theme, falling back to dark");
        ThemeVariant::Dark
    });

    let mut keybindings = KeybindingRegistry::new();
    for warning in keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        base_url = %client.base_url(),
        theme = theme.name(),
        timeout_secs = timeout.as_secs(),
        "Starting newsdash"
    );

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    let mut app = App::new(client.clone(), theme, keybindings);

    ui::spawn_category_load(client, event_tx.clone());
    if args.fetch_on_start || config.fetch_on_start {
        ui::start_fetch(&mut app, &event_tx);
    }

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
