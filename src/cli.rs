//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Netgrid extra-networks panel server CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Config file name (default: netgrid.toml)
    #[arg(short = 'C', long, default_value = "netgrid.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the extra-networks browser panels
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Render every page's panel HTML to stdout
    Render {
        /// Tab name used as the element-id prefix
        #[arg(short, long, default_value = "txt2img")]
        tabname: String,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
    pub const fn is_render(&self) -> bool {
        matches!(self.command, Commands::Render { .. })
    }
}
