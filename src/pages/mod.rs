//! Extra-network pages: per-category providers of browsable assets.
//!
//! An [`ExtraNetworksPage`] lists items for one asset category and renders
//! them into static panel HTML. Only `list_items` is required of concrete
//! providers (the compiler enforces the override the original expressed as
//! a NotImplementedError); everything else has defaults:
//!
//! - `allowed_directories_for_previews` defines the page's contribution to
//!   the registry's whitelist and the domain for `search_term_from_path`
//! - `link_preview` builds the thumbnail URL with an mtime cache-buster
//! - `create_html` assembles subfolder filter buttons plus one card per item

pub mod directory;
pub mod html;
pub mod item;
pub mod order;

pub use directory::DirectoryPage;
pub use item::{Item, PreformattedExpression};

use crate::{config::cfg, pathsafe};
use anyhow::Result;
use html::{CARD_TEMPLATE, NO_CARDS_TEMPLATE, escape};
use std::{
    fs,
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};
use walkdir::WalkDir;

/// A category provider of browsable assets.
///
/// Identity is [`name`](Self::name), the lowercased title. Pages are
/// created once at startup and never mutated except by `refresh`, which
/// only invalidates internal caches.
pub trait ExtraNetworksPage: Send + Sync {
    /// Tab title shown in the UI.
    fn title(&self) -> &str;

    /// Page identity: lowercased title.
    fn name(&self) -> String {
        self.title().to_lowercase()
    }

    /// Whether cards of this category may edit the negative prompt.
    fn allow_negative_prompt(&self) -> bool {
        false
    }

    /// List every browsable item. The one method every concrete page
    /// must implement.
    fn list_items(&self) -> Result<Vec<Item>>;

    /// Root directories whitelisted for preview serving. Also the
    /// candidate set for [`search_term_from_path`](Self::search_term_from_path).
    fn allowed_directories_for_previews(&self) -> Vec<PathBuf> {
        Vec::new()
    }

    /// Invalidate any internal item cache so the next `list_items`
    /// reflects filesystem changes. Must be idempotent.
    fn refresh(&self) {}

    /// Build the thumbnail-fetch URL for a preview file, appending its
    /// last-modified time as a cache-busting query parameter.
    ///
    /// The URL resolves through the path guard as long as `filename` is
    /// under an allowed directory; that is the registrant's obligation,
    /// not re-validated here.
    fn link_preview(&self, filename: &Path) -> Result<String> {
        let forward = filename.to_string_lossy().replace('\\', "/");
        let mtime = fs::metadata(filename)?
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Ok(format!(
            "./sd_extra_networks/thumb?filename={}&mtime={mtime}",
            urlencoding::encode(&forward)
        ))
    }

    /// Path of `filename` relative to the first candidate directory that
    /// is an ancestor of it, normalized to forward slashes without a
    /// leading slash. Empty string when no candidate matches.
    fn search_term_from_path(&self, filename: &Path, candidates: Option<&[PathBuf]>) -> String {
        let abspath = pathsafe::absolute(filename);
        let own_dirs;
        let candidates = match candidates {
            Some(dirs) => dirs,
            None => {
                own_dirs = self.allowed_directories_for_previews();
                &own_dirs
            }
        };

        for dir in candidates {
            let dir = pathsafe::absolute(dir);
            if let Ok(remainder) = abspath.strip_prefix(&dir) {
                let remainder = remainder.to_string_lossy().replace('\\', "/");
                return remainder.trim_start_matches('/').to_owned();
            }
        }

        String::new()
    }

    /// Render the full browsable panel for this page: subfolder filter
    /// buttons plus one card per item, in two separately addressable
    /// containers keyed by `{tabname}_{sanitized page name}`.
    fn create_html(&self, tabname: &str) -> Result<String> {
        let view = cfg().ui.default_view;

        // Enumerate subdirectories under every allowed root; entries
        // sharing a relative path across roots merge into one button.
        let mut subdirs: Vec<String> = Vec::new();
        for parent in self.allowed_directories_for_previews() {
            let parent = pathsafe::absolute(&parent);
            for entry in WalkDir::new(&parent)
                .min_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
            {
                if !entry.file_type().is_dir() {
                    continue;
                }

                let mut subdir = match entry.path().strip_prefix(&parent) {
                    Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
                    Err(_) => continue,
                };
                while subdir.starts_with('/') {
                    subdir.remove(0);
                }

                // non-empty directories carry a trailing slash marker
                let is_empty = fs::read_dir(entry.path())
                    .map(|mut entries| entries.next().is_none())
                    .unwrap_or(true);
                if !is_empty && !subdir.ends_with('/') {
                    subdir.push('/');
                }

                if !subdirs.contains(&subdir) {
                    subdirs.push(subdir);
                }
            }
        }

        // synthetic "" entry stands for "show all"
        if !subdirs.is_empty() {
            subdirs.insert(0, String::new());
        }

        let subdirs_html: String = subdirs
            .iter()
            .map(|subdir| {
                let extra_class = if subdir.is_empty() { " search-all" } else { "" };
                let label = if subdir.is_empty() { "all" } else { subdir };
                format!(
                    "<button class='gr-button gr-button-lg gr-button-secondary{extra_class}' \
                     onclick='extraNetworksSearchButton(\"{tabname}_extra_tabs\", event)'>\n{}\n</button>\n",
                    escape(label)
                )
            })
            .collect();

        let mut items_html = String::new();
        for item in self.list_items()? {
            items_html.push_str(&self.create_html_for_item(&item, tabname));
        }

        if items_html.is_empty() {
            let dirs: String = self
                .allowed_directories_for_previews()
                .iter()
                .map(|dir| format!("<li>{}</li>", dir.display()))
                .collect();
            items_html = NO_CARDS_TEMPLATE.replace("{dirs}", &dirs);
        }

        let name_id = self.name().replace(' ', "_");

        Ok(format!(
            "\n<div id='{tabname}_{name_id}_subdirs' class='extra-network-subdirs extra-network-subdirs-{view}'>\n\
             {subdirs_html}\
             </div>\n\
             <div id='{tabname}_{name_id}_cards' class='extra-network-{view}'>\n\
             {items_html}\n\
             </div>\n"
        ))
    }

    /// Fill the card template for one item.
    ///
    /// `description`, `preview` and `search_term` are HTML-escaped here;
    /// `prompt`, `name` and a supplied `onclick` are pre-formed
    /// expressions inserted verbatim (the provider's obligation).
    fn create_html_for_item(&self, item: &Item, tabname: &str) -> String {
        let tabname_json = PreformattedExpression::json_str(tabname);

        let preview_html = item
            .preview
            .as_deref()
            .map(|url| format!("style='background-image: url(\"{}\")'", escape(url)))
            .unwrap_or_default();

        let description = item
            .description
            .as_deref()
            .map(|text| format!("\"{}\"", escape(text)))
            .unwrap_or_default();

        let local_preview_json =
            PreformattedExpression::json_str(&item.local_preview.to_string_lossy());

        let card_clicked = item.onclick.clone().unwrap_or_else(|| {
            let negative = if self.allow_negative_prompt() {
                "true"
            } else {
                "false"
            };
            PreformattedExpression::raw(format!(
                "\"{}\"",
                escape(&format!(
                    "return cardClicked({}, {}, {negative})",
                    tabname_json.as_str(),
                    item.prompt.as_str()
                ))
            ))
        });

        let save_card_preview = format!(
            "\"{}\"",
            escape(&format!(
                "return saveCardPreview(event, {}, {})",
                tabname_json.as_str(),
                local_preview_json.as_str()
            ))
        );

        CARD_TEMPLATE
            .replace("{preview_html}", &preview_html)
            .replace("{description}", &description)
            .replace("{prompt}", item.prompt.as_str())
            .replace("{tabname}", tabname_json.as_str())
            .replace("{local_preview}", local_preview_json.as_str())
            .replace("{name}", &item.name)
            .replace("{card_clicked}", card_clicked.as_str())
            .replace("{save_card_preview}", &save_card_preview)
            .replace("{search_term}", &escape(&item.search_term))
    }
}
