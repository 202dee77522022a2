//! Directory-backed page provider.
//!
//! One `DirectoryPage` per configured asset category: scans its root
//! directories for files with the configured extensions and turns each
//! into a card item. Sibling files supply the optional extras: a
//! `.preview.png` / `.png` / `.jpg` becomes the thumbnail, a `.txt` the
//! description.

use super::{ExtraNetworksPage, Item, PreformattedExpression};
use crate::{config::PageConfig, pathsafe};
use anyhow::Result;
use parking_lot::Mutex;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

pub struct DirectoryPage {
    title: String,
    directories: Vec<PathBuf>,
    /// Lowercased, with leading dot
    extensions: Vec<String>,
    allow_negative_prompt: bool,
    prompt_format: String,

    /// Item cache; `None` until the first listing, cleared by `refresh`.
    items: Mutex<Option<Vec<Item>>>,
}

impl DirectoryPage {
    pub fn new(config: &PageConfig) -> Self {
        let extensions = config
            .extensions
            .iter()
            .map(|ext| {
                let ext = ext.to_lowercase();
                if ext.starts_with('.') { ext } else { format!(".{ext}") }
            })
            .collect();

        Self {
            title: config.title.clone(),
            directories: config.directories.clone(),
            extensions,
            allow_negative_prompt: config.allow_negative_prompt,
            prompt_format: config.prompt_format.clone(),
            items: Mutex::new(None),
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        self.extensions.iter().any(|ext| name.ends_with(ext))
    }

    /// First existing sibling preview image for an asset file.
    fn find_preview(&self, asset: &Path) -> Option<PathBuf> {
        for extension in ["preview.png", "png", "jpg"] {
            let candidate = asset.with_extension(extension);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }

    /// Sibling `.txt` description, if present and non-empty.
    fn find_description(&self, asset: &Path) -> Option<String> {
        let text = fs::read_to_string(asset.with_extension("txt")).ok()?;
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_owned())
    }

    fn scan(&self) -> Result<Vec<Item>> {
        let mut items = Vec::new();

        for root in &self.directories {
            let root = pathsafe::absolute(root);
            for entry in WalkDir::new(&root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
            {
                let path = entry.path();
                if !entry.file_type().is_file() || !self.matches_extension(path) {
                    continue;
                }

                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();

                let preview = match self.find_preview(path) {
                    Some(preview) => Some(self.link_preview(&preview)?),
                    None => None,
                };

                let prompt_text = self.prompt_format.replace("{name}", &name);

                items.push(Item {
                    search_term: self.search_term_from_path(path, None),
                    prompt: PreformattedExpression::json_str(&prompt_text),
                    local_preview: path.with_extension("preview.png"),
                    description: self.find_description(path),
                    onclick: None,
                    preview,
                    name,
                });
            }
        }

        Ok(items)
    }
}

impl ExtraNetworksPage for DirectoryPage {
    fn title(&self) -> &str {
        &self.title
    }

    fn allow_negative_prompt(&self) -> bool {
        self.allow_negative_prompt
    }

    fn allowed_directories_for_previews(&self) -> Vec<PathBuf> {
        self.directories.clone()
    }

    fn list_items(&self) -> Result<Vec<Item>> {
        let mut cache = self.items.lock();
        if cache.is_none() {
            *cache = Some(self.scan()?);
        }
        Ok(cache.as_ref().cloned().unwrap_or_default())
    }

    fn refresh(&self) {
        *self.items.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{File, create_dir_all, remove_file, write};
    use tempfile::TempDir;

    fn page_config(dir: &Path) -> PageConfig {
        toml::from_str(&format!(
            r#"
            title = "Lora"
            directories = [{:?}]
            extensions = [".safetensors", ".pt"]
            prompt_format = "<lora:{{name}}:1.0>"
        "#,
            dir.display().to_string()
        ))
        .unwrap()
    }

    #[test]
    fn test_scan_finds_matching_files_only() {
        let tmp = TempDir::new().unwrap();
        File::create(tmp.path().join("a.safetensors")).unwrap();
        File::create(tmp.path().join("b.pt")).unwrap();
        File::create(tmp.path().join("notes.txt")).unwrap();

        let page = DirectoryPage::new(&page_config(tmp.path()));
        let items = page.list_items().unwrap();

        let names: Vec<_> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        File::create(tmp.path().join("a.SafeTensors")).unwrap();

        let page = DirectoryPage::new(&page_config(tmp.path()));
        assert_eq!(page.list_items().unwrap().len(), 1);
    }

    #[test]
    fn test_item_fields() {
        let tmp = TempDir::new().unwrap();
        create_dir_all(tmp.path().join("style")).unwrap();
        File::create(tmp.path().join("style/a.safetensors")).unwrap();

        let page = DirectoryPage::new(&page_config(tmp.path()));
        let items = page.list_items().unwrap();
        let item = &items[0];

        assert_eq!(item.name, "a");
        assert_eq!(item.search_term, "style/a.safetensors");
        assert_eq!(item.prompt.as_str(), "\"<lora:a:1.0>\"");
        assert_eq!(
            item.local_preview,
            pathsafe::absolute(&tmp.path().join("style/a.preview.png"))
        );
        assert!(item.preview.is_none());
        assert!(item.description.is_none());
    }

    #[test]
    fn test_sibling_preview_and_description_picked_up() {
        let tmp = TempDir::new().unwrap();
        File::create(tmp.path().join("a.safetensors")).unwrap();
        File::create(tmp.path().join("a.preview.png")).unwrap();
        write(tmp.path().join("a.txt"), "a fine style\n").unwrap();

        let page = DirectoryPage::new(&page_config(tmp.path()));
        let items = page.list_items().unwrap();

        assert!(items[0].preview.as_deref().unwrap().contains("a.preview.png"));
        assert_eq!(items[0].description.as_deref(), Some("a fine style"));
    }

    #[test]
    fn test_blank_description_ignored() {
        let tmp = TempDir::new().unwrap();
        File::create(tmp.path().join("a.safetensors")).unwrap();
        write(tmp.path().join("a.txt"), "   \n").unwrap();

        let page = DirectoryPage::new(&page_config(tmp.path()));
        assert!(page.list_items().unwrap()[0].description.is_none());
    }

    #[test]
    fn test_list_items_is_cached_until_refresh() {
        let tmp = TempDir::new().unwrap();
        File::create(tmp.path().join("a.safetensors")).unwrap();

        let page = DirectoryPage::new(&page_config(tmp.path()));
        assert_eq!(page.list_items().unwrap().len(), 1);

        remove_file(tmp.path().join("a.safetensors")).unwrap();

        // cached listing still served
        assert_eq!(page.list_items().unwrap().len(), 1);

        page.refresh();
        assert_eq!(page.list_items().unwrap().len(), 0);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let page = DirectoryPage::new(&page_config(tmp.path()));
        page.refresh();
        page.refresh();
        assert!(page.list_items().unwrap().is_empty());
    }

    #[test]
    fn test_extensions_normalized_without_leading_dot() {
        let tmp = TempDir::new().unwrap();
        File::create(tmp.path().join("a.ckpt")).unwrap();

        let mut config = page_config(tmp.path());
        config.extensions = vec!["CKPT".into()];

        let page = DirectoryPage::new(&config);
        assert_eq!(page.list_items().unwrap().len(), 1);
    }
}
