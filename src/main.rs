//! Gallery viewer - Entry Point

use clap::Parser;
use gallery_engine::config::loader::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
};
use gallery_engine::config::{KeyBindings, ResolvedConfig};
use gallery_engine::model::{AppError, LayoutMode, Rect};
use gallery_engine::provider::SyntheticProvider;
use gallery_engine::replay::{self, Replayer};
use gallery_engine::{logging, view};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Gallery viewer - browse a synthetic gallery in the terminal or replay a gesture script
#[derive(Parser, Debug)]
#[command(name = "gallery")]
#[command(version)]
#[command(about = "Gesture-driven gallery viewer with paged and continuous layouts")]
pub struct Args {
    /// Layout mode: left-to-right, right-to-left or top-to-bottom
    #[arg(short, long)]
    pub mode: Option<LayoutMode>,

    /// Number of pages in the synthetic gallery
    #[arg(short, long)]
    pub pages: Option<usize>,

    /// Zero-based page that fails to load (repeatable)
    #[arg(long = "fail-page", value_name = "N")]
    pub fail_pages: Vec<usize>,

    /// Report a gallery-level error instead of pages
    #[arg(long, value_name = "MSG")]
    pub error: Option<String>,

    /// Replay a JSONL gesture script headlessly and print a JSON summary
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Replay viewport width in pixels
    #[arg(long, default_value_t = 1080, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Replay viewport height in pixels
    #[arg(long, default_value_t = 1920, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Defaults → Config File → Env Vars → CLI Args
fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    let config_file = load_config_with_precedence(args.config.clone())?;
    let merged = merge_config(config_file);
    let with_env = apply_env_overrides(merged)?;
    Ok(apply_cli_overrides(with_env, args.mode, args.pages))
}

fn build_provider(args: &Args, config: &ResolvedConfig) -> SyntheticProvider {
    let provider =
        SyntheticProvider::new(config.page_count).with_failing_pages(args.fail_pages.iter().copied());
    match &args.error {
        Some(message) => provider.with_error(message.clone()),
        None => provider,
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    // Initialize tracing with configured log file path
    logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let provider = Box::new(build_provider(&args, &config));
    let viewer_config = config.viewer_config();

    match &args.script {
        Some(path) => {
            let steps = replay::load_script(path)?;
            let bounds = Rect::new(0.0, 0.0, args.width as f32, args.height as f32);
            let summary = Replayer::new(provider, &viewer_config, bounds).run(&steps);

            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &summary).map_err(io::Error::from)?;
            writeln!(stdout)?;
        }
        None => view::run(provider, &viewer_config, KeyBindings::default())?,
    }

    Ok(())
}
