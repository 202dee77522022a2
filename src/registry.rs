//! Process-wide page registry.
//!
//! Holds every registered page provider and the derived
//! allowed-directory set gating preview serving. The set is recomputed
//! in full on every registration (never patched incrementally), so it
//! always reflects exactly the currently-registered pages.
//!
//! Lifecycle: single writer at startup. Pages are registered once during
//! initialization, before the first request is handled; the only other
//! mutation is [`reset_pages`] followed by re-registering everything
//! (used when reinitializing the whole UI). There is no
//! remove-single-page operation by design.

use crate::pages::ExtraNetworksPage;
use parking_lot::RwLock;
use std::{
    collections::BTreeSet,
    path::PathBuf,
    sync::{Arc, LazyLock},
};

#[derive(Default)]
pub struct PageRegistry {
    pages: Vec<Arc<dyn ExtraNetworksPage>>,
    allowed_dirs: BTreeSet<PathBuf>,
}

impl PageRegistry {
    /// Append a page, then recompute the allowed-directory set as the
    /// union over all registered pages.
    pub fn register(&mut self, page: Arc<dyn ExtraNetworksPage>) {
        self.pages.push(page);
        self.allowed_dirs = self
            .pages
            .iter()
            .flat_map(|page| page.allowed_directories_for_previews())
            .collect();
    }

    /// Clear all registered pages and the derived directory set.
    pub fn reset(&mut self) {
        self.pages.clear();
        self.allowed_dirs.clear();
    }

    pub fn pages(&self) -> Vec<Arc<dyn ExtraNetworksPage>> {
        self.pages.clone()
    }

    pub fn allowed_dirs(&self) -> Vec<PathBuf> {
        self.allowed_dirs.iter().cloned().collect()
    }
}

// ============================================================================
// Global Instance
// ============================================================================

static REGISTRY: LazyLock<RwLock<PageRegistry>> =
    LazyLock::new(|| RwLock::new(PageRegistry::default()));

/// Register an extra networks page; call during startup, before the
/// first UI build.
pub fn register_page(page: Arc<dyn ExtraNetworksPage>) {
    REGISTRY.write().register(page);
}

/// Drop every registered page (reinitialization path).
pub fn reset_pages() {
    REGISTRY.write().reset();
}

/// Snapshot of the registered pages, in registration order.
pub fn registered_pages() -> Vec<Arc<dyn ExtraNetworksPage>> {
    REGISTRY.read().pages()
}

/// Snapshot of the allowed-directory union.
pub fn allowed_preview_dirs() -> Vec<PathBuf> {
    REGISTRY.read().allowed_dirs()
}
