//! `[ui]` section configuration.
//!
//! Gallery presentation settings shared by every panel tab.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gallery layout for the card containers.
///
/// Rendered into the container CSS classes (`extra-network-grid` /
/// `extra-network-list`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Grid => f.write_str("grid"),
            ViewMode::List => f.write_str("list"),
        }
    }
}

/// `[ui]` section in netgrid.toml - gallery presentation settings.
///
/// # Example
/// ```toml
/// [ui]
/// default_view = "list"
/// tab_reorder = "lora, embed"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// Default gallery view mode for every tab.
    #[serde(default = "defaults::ui::default_view")]
    #[educe(Default = defaults::ui::default_view())]
    pub default_view: ViewMode,

    /// Comma-separated substring patterns ranking tab display order.
    /// Pages whose name contains an earlier pattern sort first; pages
    /// matching no pattern keep their registration order at the end.
    #[serde(default = "defaults::ui::tab_reorder")]
    #[educe(Default = defaults::ui::tab_reorder())]
    pub tab_reorder: String,
}

#[cfg(test)]
mod tests {
    use super::super::AppConfig;
    use super::*;

    #[test]
    fn test_ui_config() {
        let config = r#"
            [ui]
            default_view = "list"
            tab_reorder = "lora, embed"
        "#;
        let config: AppConfig = toml::from_str(config).unwrap();

        assert_eq!(config.ui.default_view, ViewMode::List);
        assert_eq!(config.ui.tab_reorder, "lora, embed");
    }

    #[test]
    fn test_ui_config_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config.ui.default_view, ViewMode::Grid);
        assert!(config.ui.tab_reorder.is_empty());
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [ui]
            unknown_field = "should_fail"
        "#;
        let result: Result<AppConfig, _> = toml::from_str(config);

        assert!(result.is_err());
    }

    #[test]
    fn test_view_mode_display() {
        assert_eq!(ViewMode::Grid.to_string(), "grid");
        assert_eq!(ViewMode::List.to_string(), "list");
    }
}
