use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Deserializer};

const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Embed)]
#[folder = "assets/themes/"]
struct BundledThemes;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// A `#rrggbb` color from a theme file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hex(Color);

impl Hex {
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self(Color::Rgb(channel(0)?, channel(2)?, channel(4)?)))
    }
}

impl<'de> Deserialize<'de> for Hex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Hex::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color {text:?}")))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ThemeColors {
    bg: Hex,
    fg: Hex,
    /// Secondary text: hints, labels, untested marks.
    text_pending: Hex,
    accent: Hex,
    accent_dim: Hex,
    border: Hex,
    border_focused: Hex,
    header_bg: Hex,
    header_fg: Hex,
    error: Hex,
    warning: Hex,
    success: Hex,
}

impl ThemeColors {
    pub fn bg(&self) -> Color {
        self.bg.0
    }
    pub fn fg(&self) -> Color {
        self.fg.0
    }
    pub fn text_pending(&self) -> Color {
        self.text_pending.0
    }
    pub fn accent(&self) -> Color {
        self.accent.0
    }
    pub fn accent_dim(&self) -> Color {
        self.accent_dim.0
    }
    pub fn border(&self) -> Color {
        self.border.0
    }
    pub fn border_focused(&self) -> Color {
        self.border_focused.0
    }
    pub fn header_bg(&self) -> Color {
        self.header_bg.0
    }
    pub fn header_fg(&self) -> Color {
        self.header_fg.0
    }
    pub fn error(&self) -> Color {
        self.error.0
    }
    pub fn warning(&self) -> Color {
        self.warning.0
    }
    pub fn success(&self) -> Color {
        self.success.0
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        let rgb = |r, g, b| Hex(Color::Rgb(r, g, b));
        Self {
            bg: rgb(0x1e, 0x1e, 0x2e),
            fg: rgb(0xcd, 0xd6, 0xf4),
            text_pending: rgb(0x58, 0x5b, 0x70),
            accent: rgb(0x89, 0xb4, 0xfa),
            accent_dim: rgb(0x45, 0x47, 0x5a),
            border: rgb(0x45, 0x47, 0x5a),
            border_focused: rgb(0x89, 0xb4, 0xfa),
            header_bg: rgb(0x31, 0x32, 0x44),
            header_fg: rgb(0xcd, 0xd6, 0xf4),
            error: rgb(0xf3, 0x8b, 0xa8),
            warning: rgb(0xf9, 0xe2, 0xaf),
            success: rgb(0xa6, 0xe3, 0xa1),
        }
    }
}

impl Theme {
    /// Look `name` up in the user theme directory, then among the bundled themes.
    pub fn load(name: &str) -> Option<Self> {
        let file = format!("{name}.toml");
        if let Some(path) = user_theme_dir().map(|dir| dir.join(&file))
            && let Ok(content) = fs::read_to_string(&path)
        {
            match toml::from_str(&content) {
                Ok(theme) => return Some(theme),
                Err(e) => tracing::warn!(path = %path.display(), "ignoring user theme: {e}"),
            }
        }

        let asset = BundledThemes::get(&file)?;
        let content = std::str::from_utf8(&asset.data).ok()?;
        toml::from_str(content)
            .inspect_err(|e| tracing::error!(theme = name, "bundled theme is invalid: {e}"))
            .ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = BundledThemes::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors::default(),
        })
    }
}

fn user_theme_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vocadr").join("themes"))
}
