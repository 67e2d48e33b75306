//! handorgel demo - Entry Point

use clap::Parser;
use handorgel::config::CliOverrides;
use std::path::PathBuf;
use tracing::info;

/// Browse an accordion document in the terminal
#[derive(Parser, Debug)]
#[command(name = "handorgel")]
#[command(version)]
#[command(about = "Accessible accordion demo: one TOML [[fold]] table per header/content pair")]
pub struct Args {
    /// Path to the accordion document (TOML)
    pub document: PathBuf,

    /// Keep at most one fold open at a time
    #[arg(long)]
    pub single: bool,

    /// In single mode, keep the open fold from being closed again
    #[arg(long)]
    pub no_collapse: bool,

    /// Stop at the first and last header instead of wrapping focus
    #[arg(long)]
    pub no_carousel: bool,

    /// Leave ARIA attributes off the headers and contents
    #[arg(long)]
    pub no_aria: bool,

    /// Disable arrow/Home/End header navigation
    #[arg(long)]
    pub no_keyboard: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Flags only override when given; absent flags keep the config value.
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            multi_selectable: self.single.then_some(false),
            collapsible: self.no_collapse.then_some(false),
            carousel_focus: self.no_carousel.then_some(false),
            aria_enabled: self.no_aria.then_some(false),
            keyboard_interaction: self.no_keyboard.then_some(false),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Styles read NO_COLOR when the view is built
    if args.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // Defaults → Config File → CLI Args
    let config = {
        let config_file = handorgel::config::load_config_with_precedence(args.config.clone())?;
        let merged = handorgel::config::merge_config(config_file)?;
        handorgel::config::apply_cli_overrides(merged, args.overrides())
    };

    handorgel::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    handorgel::view::run_document(&args.document, config.options)?;

    Ok(())
}
