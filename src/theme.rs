use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Display mode, cycled auto → dark → light → auto.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "web", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Dark,
    Light,
}

impl ThemeMode {
    pub fn next(self) -> Self {
        match self {
            ThemeMode::Auto => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Auto,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Auto => "auto",
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Auto => "Auto (följer system)",
            ThemeMode::Dark => "Mörkt",
            ThemeMode::Light => "Ljust",
        }
    }

    /// Tooltip and accessible name of the toggle button.
    pub fn title(self) -> String {
        format!("Tema: {}", self.label())
    }

    /// Forced modes render the toggle as pressed.
    pub fn aria_pressed(self) -> bool {
        self != ThemeMode::Auto
    }

    /// Reads the attribute value; anything unrecognised counts as auto.
    pub fn from_attribute(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme {0:?}")]
pub struct UnknownTheme(pub String);

impl FromStr for ThemeMode {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auto" => Ok(ThemeMode::Auto),
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

/// Accessibility state of the toggle button for a given mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "web", derive(utoipa::ToSchema))]
pub struct ThemeToggleView {
    pub mode: ThemeMode,
    pub label: String,
    pub title: String,
    pub aria_pressed: bool,
}

impl From<ThemeMode> for ThemeToggleView {
    fn from(mode: ThemeMode) -> Self {
        Self {
            mode,
            label: mode.label().to_string(),
            title: mode.title(),
            aria_pressed: mode.aria_pressed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_three_modes() {
        let mut mode = ThemeMode::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(
            seen,
            [ThemeMode::Auto, ThemeMode::Dark, ThemeMode::Light, ThemeMode::Auto]
        );
    }

    #[test]
    fn pressed_only_when_forced() {
        assert!(!ThemeMode::Auto.aria_pressed());
        assert!(ThemeMode::Dark.aria_pressed());
        assert!(ThemeMode::Light.aria_pressed());
    }

    #[test]
    fn labels_and_titles() {
        let view = ThemeToggleView::from(ThemeMode::Dark);
        assert_eq!(view.title, "Tema: Mörkt");
        assert_eq!(ThemeMode::Auto.title(), "Tema: Auto (följer system)");
    }

    #[test]
    fn attribute_parsing_falls_back_to_auto() {
        assert_eq!(ThemeMode::from_attribute(None), ThemeMode::Auto);
        assert_eq!(ThemeMode::from_attribute(Some("sepia")), ThemeMode::Auto);
        assert_eq!(ThemeMode::from_attribute(Some("light")), ThemeMode::Light);
    }

    #[test]
    fn unknown_theme_is_an_error() {
        let err = "sepia".parse::<ThemeMode>().unwrap_err();
        assert_eq!(err, UnknownTheme("sepia".into()));
        assert_eq!(err.to_string(), r#"unknown theme "sepia""#);
    }
}
