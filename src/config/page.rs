//! `[[pages]]` section configuration.
//!
//! One entry per asset category; each becomes one browser tab backed by a
//! directory-scanning page provider.

use super::defaults;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One `[[pages]]` entry in netgrid.toml - a single asset category.
///
/// # Example
/// ```toml
/// [[pages]]
/// title = "Lora"
/// directories = ["/data/models/lora"]
/// extensions = [".safetensors", ".pt"]
/// allow_negative_prompt = true
/// prompt_format = "<lora:{name}:1.0>"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageConfig {
    /// Tab title. The page name (its identity) is the lowercased title.
    pub title: String,

    /// Root directories scanned for assets; also the directories
    /// whitelisted for preview serving.
    pub directories: Vec<PathBuf>,

    /// Asset file extensions, with leading dot. Matched case-insensitively.
    #[serde(default = "defaults::page::extensions")]
    pub extensions: Vec<String>,

    /// Whether cards of this category may edit the negative prompt.
    #[serde(default = "defaults::r#false")]
    pub allow_negative_prompt: bool,

    /// Template for the prompt text a card click inserts; `{name}` is
    /// replaced with the asset name before JSON-encoding.
    #[serde(default = "defaults::page::prompt_format")]
    pub prompt_format: String,
}
