//! Netgrid - extra-networks browser panels for on-disk model assets.

mod cli;
mod config;
mod pages;
mod pathsafe;
mod registry;
mod serve;
mod ui;
mod utils;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::AppConfig;
use pages::DirectoryPage;
use serve::serve_panels;
use std::sync::Arc;
use ui::UiController;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_path(&cli.config)?;
    config.update_with_cli(&cli);
    config.validate()?;
    config::init_config(config);

    register_pages();

    match &cli.command {
        Commands::Serve { .. } => serve_panels(),
        Commands::Render { tabname } => render_panels(tabname),
    }
}

/// Build one directory page per configured category and register it.
fn register_pages() {
    registry::reset_pages();

    let c = config::cfg();
    for page in &c.pages {
        registry::register_page(Arc::new(DirectoryPage::new(page)));
    }
    log!("pages"; "registered {} pages", c.pages.len());
}

/// Render every page's panel HTML to stdout.
fn render_panels(tabname: &str) -> Result<()> {
    let ui = UiController::from_registry(tabname);
    for tab in ui.create_tabs()? {
        println!("<!-- {} -->", tab.title);
        println!("{}", tab.html);
    }
    Ok(())
}
