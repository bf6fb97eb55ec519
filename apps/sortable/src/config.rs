use std::{fs, path::Path, time::Duration};

use client_core::{ControllerSettings, Item, WidgetEnvironment, DEFAULT_ERROR_DISMISS_AFTER};
use serde::Deserialize;
use shared::domain::Indicator;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "sortable.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub handler_url: Option<String>,
    pub error_dismiss_ms: u64,
    pub guard_in_flight: bool,
    pub items: Vec<String>,
    pub remaining_attempts: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            handler_url: None,
            error_dismiss_ms: DEFAULT_ERROR_DISMISS_AFTER.as_millis() as u64,
            guard_in_flight: true,
            items: ["Australia", "China", "Finland", "Pakistan", "United States"]
                .into_iter()
                .map(String::from)
                .collect(),
            remaining_attempts: 1,
        }
    }
}

impl Settings {
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            error_dismiss_after: Duration::from_millis(self.error_dismiss_ms),
            guard_in_flight: self.guard_in_flight,
        }
    }

    /// State the widget is restored into: `marked` lists the positions that
    /// the previous result flagged as out of place.
    pub fn widget_environment(
        &self,
        locked: bool,
        marked: &[usize],
        indicator: Option<Indicator>,
    ) -> WidgetEnvironment {
        let mut environment =
            WidgetEnvironment::from_texts(&self.items, self.remaining_attempts).locked(locked);
        for &position in marked {
            match environment.items.get_mut(position) {
                Some(item) => *item = Item::with_mark(item.text(), true),
                None => warn!(position, items = self.items.len(), "ignoring mark outside the list"),
            }
        }
        environment.indicator = indicator;
        environment
    }
}

pub fn parse_indicator(raw: &str) -> Result<Indicator, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "success" | "correct" => Ok(Indicator::Success),
        "error" | "incorrect" => Ok(Indicator::Error),
        other => Err(format!("unknown indicator '{other}'; expected success or error")),
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    handler_url: Option<String>,
    error_dismiss_ms: Option<u64>,
    guard_in_flight: Option<bool>,
    items: Option<Vec<String>>,
    remaining_attempts: Option<i64>,
}

pub fn load_settings(path: &Path) -> Settings {
    load_settings_with(path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file if present, then environment variables.
pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring unreadable config file");
            }
        }
    }

    if let Some(v) = env("SORTABLE_HANDLER_URL") {
        settings.handler_url = Some(v);
    }
    if let Some(v) = env("APP__HANDLER_URL") {
        settings.handler_url = Some(v);
    }

    if let Some(v) = env("APP__ERROR_DISMISS_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.error_dismiss_ms = parsed;
        }
    }

    if let Some(v) = env("APP__GUARD_IN_FLIGHT") {
        if let Some(parsed) = parse_flag(&v) {
            settings.guard_in_flight = parsed;
        }
    }

    if let Some(v) = env("APP__REMAINING_ATTEMPTS") {
        if let Ok(parsed) = v.trim().parse::<i64>() {
            settings.remaining_attempts = parsed;
        }
    }

    settings.handler_url = settings
        .handler_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.handler_url {
        settings.handler_url = Some(v);
    }
    if let Some(v) = file_cfg.error_dismiss_ms {
        settings.error_dismiss_ms = v;
    }
    if let Some(v) = file_cfg.guard_in_flight {
        settings.guard_in_flight = v;
    }
    if let Some(v) = file_cfg.items {
        settings.items = v;
    }
    if let Some(v) = file_cfg.remaining_attempts {
        settings.remaining_attempts = v;
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
