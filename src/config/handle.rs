//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads. The config is installed once in
//! `main` before any page is registered or any request is handled; after
//! that every reader (page rendering, the HTTP loop) takes a cheap
//! atomic snapshot via [`cfg`].

use super::AppConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
///
/// Initialized with default config, then replaced with the loaded config
/// in main. Single-writer-at-startup lifecycle; never swapped during
/// request handling.
static CONFIG: LazyLock<ArcSwap<AppConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(AppConfig::default()));

/// Get current config as `Arc<AppConfig>`.
///
/// Returns an `Arc` that keeps the config alive. Thread-safe and wait-free.
/// The Arc auto-derefs to `&AppConfig`:
///
/// ```ignore
/// let c = cfg();
/// let view = c.ui.default_view;
/// ```
#[inline]
pub fn cfg() -> Arc<AppConfig> {
    CONFIG.load_full()
}

/// Install the loaded config (called once at startup).
#[inline]
pub fn init_config(config: AppConfig) {
    CONFIG.store(Arc::new(config));
}
