//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Card list --
    pub card_name: Style,
    pub card_company: Style,
    pub card_category: Style,
    pub card_date: Style,
    pub card_selected: Style,
    pub card_placeholder_icon: Style,

    // -- Header and controls --
    pub header_title: Style,
    pub header_counts: Style,
    pub search_input: Style,
    pub search_active: Style,
    pub tab_normal: Style,
    pub tab_selected: Style,

    // -- States --
    pub loading: Style,
    pub empty: Style,
    pub error_banner: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub popup_label: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            card_name: Style::default().add_modifier(Modifier::BOLD),
            card_company: Style::default().fg(Color::Gray),
            card_category: Style::default().fg(Color::Cyan),
            card_date: Style::default().fg(Color::DarkGray),
            card_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            card_placeholder_icon: Style::default().fg(Color::DarkGray),

            header_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_counts: Style::default().fg(Color::Gray),
            search_input: Style::default(),
            search_active: Style::default().fg(Color::Yellow),
            tab_normal: Style::default().fg(Color::Gray),
            tab_selected: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),

            loading: Style::default().fg(Color::Yellow),
            empty: Style::default().fg(Color::DarkGray),
            error_banner: Style::default().fg(Color::White).bg(Color::Red),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            popup_label: Style::default().fg(Color::Cyan),
        }
    }

    fn light() -> Self {
        Self {
            card_name: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_company: Style::default().fg(Color::DarkGray),
            card_category: Style::default().fg(Color::Blue),
            card_date: Style::default().fg(Color::DarkGray),
            card_selected: Style::default().bg(Color::Blue).fg(Color::White),
            card_placeholder_icon: Style::default().fg(Color::Gray),

            header_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_counts: Style::default().fg(Color::DarkGray),
            search_input: Style::default().fg(Color::Black),
            search_active: Style::default().fg(Color::Magenta),
            tab_normal: Style::default().fg(Color::DarkGray),
            tab_selected: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),

            loading: Style::default().fg(Color::Magenta),
            empty: Style::default().fg(Color::DarkGray),
            error_banner: Style::default().fg(Color::White).bg(Color::Red),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            popup_label: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 19] = [
    "card_name",
    "card_company",
    "card_category",
    "card_date",
    "card_selected",
    "card_placeholder_icon",
    "header_title",
    "header_counts",
    "search_input",
    "search_active",
    "tab_normal",
    "tab_selected",
    "loading",
    "empty",
    "error_banner",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "popup_label",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 19] = [
            p.card_name,
            p.card_company,
            p.card_category,
            p.card_date,
            p.card_selected,
            p.card_placeholder_icon,
            p.header_title,
            p.header_counts,
            p.search_input,
            p.search_active,
            p.tab_normal,
            p.tab_selected,
            p.loading,
            p.empty,
            p.error_banner,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.popup_label,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    pub fn for_variant(variant: ThemeVariant) -> Self {
        Self::from_palette(&variant.palette())
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_selection_is_dark_gray() {
        let palette = ThemeVariant::Dark.palette();
        assert_eq!(
            palette.card_selected,
            Style::default().bg(Color::DarkGray).fg(Color::White)
        );
    }

    #[test]
    fn error_banner_is_red_in_both_variants() {
        for variant in [ThemeVariant::Dark, ThemeVariant::Light] {
            assert_eq!(variant.palette().error_banner.bg, Some(Color::Red));
        }
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.card_selected, light.card_selected);
        assert_ne!(dark.status_bar, light.status_bar);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name("Light"), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn variant_cycles() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next().next(), ThemeVariant::Light);
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.resolve("card_selected"), palette.card_selected);
        assert_eq!(sm.resolve("error_banner"), palette.error_banner);
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn style_map_has_all_roles() {
        let sm = StyleMap::for_variant(ThemeVariant::Light);
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
        for name in ROLE_NAMES {
            assert!(sm.map.contains_key(name), "Role '{}' missing from StyleMap", name);
        }
    }
}
