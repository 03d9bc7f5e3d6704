use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::quiz::{DEFAULT_DISTRACTORS, QuizDirection, QuizOrder, QuizSettings};
use crate::store::schema::Language;

pub const MIN_DISTRACTORS: usize = 1;
pub const MAX_DISTRACTORS: usize = 5;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_distractor_count")]
    pub distractor_count: usize,
    #[serde(default)]
    pub quiz_order: QuizOrder,
    #[serde(default)]
    pub quiz_direction: QuizDirection,
    #[serde(default = "default_source_language")]
    pub source_language: Language,
    #[serde(default = "default_target_language")]
    pub target_language: Language,
    /// Overrides the platform data directory when set.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_ui_language")]
    pub ui_language: String,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_distractor_count() -> usize {
    DEFAULT_DISTRACTORS
}
fn default_source_language() -> Language {
    Language::En
}
fn default_target_language() -> Language {
    Language::Ko
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_ui_language() -> String {
    "ko".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            distractor_count: default_distractor_count(),
            quiz_order: QuizOrder::default(),
            quiz_direction: QuizDirection::default(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            data_dir: None,
            log_level: default_log_level(),
            ui_language: default_ui_language(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocadr")
            .join("config.toml")
    }

    /// Where word sets, bookmarks and logs are kept.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("vocadr")
        })
    }

    /// Clamp out-of-range values left by hand-edited or stale config files.
    pub fn validate(&mut self) {
        self.distractor_count = self
            .distractor_count
            .clamp(MIN_DISTRACTORS, MAX_DISTRACTORS);
        if self.source_language == self.target_language {
            self.target_language = self.source_language.other();
        }
        if !rust_i18n::available_locales!().contains(&self.ui_language.as_str()) {
            self.ui_language = default_ui_language();
        }
    }

    pub fn quiz_settings(&self) -> QuizSettings {
        QuizSettings {
            distractor_count: self.distractor_count,
            order: self.quiz_order,
            direction: self.quiz_direction,
            seed: None,
        }
    }
}
