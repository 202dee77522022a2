//! UI controller: binds ordered pages to panel actions.
//!
//! Thin glue between the registry and the HTTP layer: builds one tab per
//! ordered page, re-renders everything on refresh, and handles the
//! save-preview action (clamp the gallery selection, decode the image,
//! re-check the write target against every page's allowed directories,
//! overwrite, re-render).

use crate::{
    config::cfg,
    log,
    pages::{ExtraNetworksPage, order::pages_in_preferred_order},
    pathsafe, registry,
};
use anyhow::{Context, Result, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::{path::Path, sync::Arc};

/// One rendered browser tab.
pub struct Tab {
    pub title: String,
    pub html: String,
}

pub struct UiController {
    tabname: String,
    /// Ordered snapshot taken at construction; refresh re-renders but
    /// never reorders.
    pages: Vec<Arc<dyn ExtraNetworksPage>>,
}

impl UiController {
    pub fn new(tabname: &str, pages: Vec<Arc<dyn ExtraNetworksPage>>) -> Self {
        Self {
            tabname: tabname.to_owned(),
            pages,
        }
    }

    /// Controller over the globally registered pages, in preferred order.
    pub fn from_registry(tabname: &str) -> Self {
        let pages = pages_in_preferred_order(registry::registered_pages(), &cfg().ui.tab_reorder);
        Self::new(tabname, pages)
    }

    pub fn tabname(&self) -> &str {
        &self.tabname
    }

    /// Build one tab per ordered page.
    pub fn create_tabs(&self) -> Result<Vec<Tab>> {
        self.pages
            .iter()
            .map(|page| {
                Ok(Tab {
                    title: page.title().to_owned(),
                    html: page.create_html(&self.tabname)?,
                })
            })
            .collect()
    }

    /// Refresh every page, then re-render all panels.
    pub fn refresh(&self) -> Result<Vec<String>> {
        for page in &self.pages {
            page.refresh();
        }
        self.render_all()
    }

    fn render_all(&self) -> Result<Vec<String>> {
        self.pages
            .iter()
            .map(|page| page.create_html(&self.tabname))
            .collect()
    }

    /// Save the selected gallery image as an asset's preview, then
    /// re-render all panels.
    ///
    /// An empty gallery is recovered locally (notice + unchanged HTML);
    /// a write target outside every page's allowed directories is a hard
    /// error, never a silent skip.
    pub fn save_preview(&self, index: i64, images: &[String], filename: &str) -> Result<Vec<String>> {
        if images.is_empty() {
            log!("ui"; "there is no image in gallery to save as a preview");
            return self.render_all();
        }

        let index = clamp_gallery_index(index, images.len());
        let image = image_from_data_url(&images[index])
            .with_context(|| format!("cannot decode gallery image {index}"))?;

        let is_allowed = self.pages.iter().any(|page| {
            page.allowed_directories_for_previews()
                .iter()
                .any(|dir| pathsafe::path_is_parent(dir, Path::new(filename)))
        });
        if !is_allowed {
            bail!("writing to {filename} is not allowed");
        }

        image
            .save(filename)
            .with_context(|| format!("cannot save preview to {filename}"))?;

        self.render_all()
    }
}

/// Clamp a gallery selection index into `[0, len - 1]`.
pub fn clamp_gallery_index(index: i64, len: usize) -> usize {
    if index < 0 {
        return 0;
    }
    (index as usize).min(len.saturating_sub(1))
}

/// Decode a `data:image/...;base64,` URL into an image.
fn image_from_data_url(data: &str) -> Result<image::DynamicImage> {
    let payload = data
        .split_once("base64,")
        .map(|(_, payload)| payload)
        .unwrap_or(data);
    let bytes = BASE64.decode(payload.trim())?;
    Ok(image::load_from_memory(&bytes)?)
}
