// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::clipboard::ClipboardMode;
use anyhow::{Context, Result, anyhow, bail};
use folio_app::{Panel, Theme, normalize_fragment};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub clipboard: Clipboard,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub storage: Storage,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            content: Content::default(),
            ui: Ui::default(),
            clipboard: Clipboard::default(),
            log: Log::default(),
            storage: Storage::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub theme: Option<String>,
    pub start: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            theme: Some(Theme::Calm.as_str().to_owned()),
            start: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Clipboard {
    pub mode: Option<String>,
}

impl Default for Clipboard {
    fn default() -> Self {
        Self {
            mode: Some(ClipboardMode::Osc52.as_str().to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("FOLIO_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set FOLIO_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(folio_store::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no `version`; add `version = 1` at the top",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            folio_store::validate_db_path(db_path)?;
        }

        if let Some(theme) = &self.ui.theme
            && Theme::parse(theme).is_none()
        {
            bail!(
                "ui.theme in {} must be `calm` or `glow`, got {theme:?}",
                path.display()
            );
        }

        if let Some(start) = &self.ui.start
            && Panel::from_fragment(start.trim()).is_none()
        {
            bail!(
                "ui.start in {} must name a panel (#home, #projects, #resume, #contact), got {start:?}",
                path.display()
            );
        }

        if let Some(mode) = &self.clipboard.mode
            && ClipboardMode::parse(mode).is_none()
        {
            bail!(
                "clipboard.mode in {} must be one of osc52, command, none; got {mode:?}",
                path.display()
            );
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).with_context(|| {
                format!("log.level in {} is not a valid filter", path.display())
            })?;
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => folio_store::default_db_path(),
        }
    }

    /// Content file from the config; relative paths resolve against the
    /// config file's directory.
    pub fn content_path(&self, config_path: &Path) -> Option<PathBuf> {
        let raw = self.content.path.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        let path = PathBuf::from(raw);
        if path.is_absolute() {
            return Some(path);
        }
        Some(match config_path.parent() {
            Some(parent) => parent.join(path),
            None => path,
        })
    }

    pub fn theme(&self) -> Theme {
        self.ui
            .theme
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or_default()
    }

    /// `[ui].start` as a fragment; `projects` and `#projects` are the same.
    pub fn start_location(&self) -> Option<String> {
        self.ui.start.as_deref().map(normalize_fragment)
    }

    pub fn clipboard_mode(&self) -> ClipboardMode {
        self.clipboard
            .mode
            .as_deref()
            .and_then(ClipboardMode::parse)
            .unwrap_or(ClipboardMode::Osc52)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let root = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .ok_or_else(|| anyhow!("cannot resolve log directory; set [log].file"))?;
        Ok(root.join(folio_store::APP_NAME).join("folio.log"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# folio config\n# Place this file at: {}\n\nversion = 1\n\n[content]\n# Optional. TOML file with [profile] and [[projects]]; the built-in portfolio is used when unset\n# path = \"portfolio.toml\"\n\n[ui]\n# Theme used until one is picked with `t`: calm or glow\ntheme = \"calm\"\n# Optional. Panel shown when no location was saved\n# start = \"#projects\"\n\n[clipboard]\n# osc52, command or none; FOLIO_CLIPBOARD overrides\nmode = \"osc52\"\n\n[log]\n# tracing filter directive; FOLIO_LOG overrides\nlevel = \"{}\"\n# file = \"/absolute/path/to/folio.log\"\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/folio/folio.db)\n# db_path = \"/absolute/path/to/folio.db\"\n",
            path.display(),
            DEFAULT_LOG_LEVEL,
        )
    }
}
