//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [ui] Section Defaults
// ============================================================================

pub mod ui {
    use crate::config::ViewMode;

    pub fn default_view() -> ViewMode {
        ViewMode::Grid
    }

    pub fn tab_reorder() -> String {
        String::new()
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        7861
    }
}

// ============================================================================
// [[pages]] Section Defaults
// ============================================================================

pub mod page {
    pub fn extensions() -> Vec<String> {
        vec![".safetensors".into(), ".ckpt".into(), ".pt".into()]
    }

    pub fn prompt_format() -> String {
        "{name}".into()
    }
}
