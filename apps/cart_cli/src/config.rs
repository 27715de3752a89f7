use std::{fs, io::ErrorKind, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Page URL that relative row endpoints are resolved against.
    pub base_url: Option<String>,
    pub endpoint_url: String,
    /// Page fetched before the first request so the server sets `csrftoken`.
    pub session_url: Option<String>,
    /// Extra cookies, `name=value; name=value`.
    pub cookie: Option<String>,
    pub notification_hide_ms: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: None,
            endpoint_url: "/add-to-cart/".into(),
            session_url: None,
            cookie: None,
            notification_hide_ms: 2400,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn notification_hide_after(&self) -> Duration {
        Duration::from_millis(self.notification_hide_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    endpoint_url: Option<String>,
    session_url: Option<String>,
    cookie: Option<String>,
    notification_hide_ms: Option<u64>,
    log_filter: Option<String>,
}

/// Defaults, then `path` (if it exists), then the environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("invalid settings file '{}'", path.display()))?;
            apply_file(&mut settings, file_cfg);
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read '{}'", path.display()));
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.base_url {
        settings.base_url = Some(v);
    }
    if let Some(v) = file_cfg.endpoint_url {
        settings.endpoint_url = v;
    }
    if let Some(v) = file_cfg.session_url {
        settings.session_url = Some(v);
    }
    if let Some(v) = file_cfg.cookie {
        settings.cookie = Some(v);
    }
    if let Some(v) = file_cfg.notification_hide_ms {
        settings.notification_hide_ms = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
}

/// `CART_*` names first, `APP__*` names win.
fn apply_env(
    settings: &mut Settings,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    let lookup = |name: &str| {
        var(&format!("APP__{name}")).or_else(|| var(&format!("CART_{name}")))
    };

    if let Some(v) = lookup("BASE_URL") {
        settings.base_url = Some(v);
    }
    if let Some(v) = lookup("ENDPOINT_URL") {
        settings.endpoint_url = v;
    }
    if let Some(v) = lookup("SESSION_URL") {
        settings.session_url = Some(v);
    }
    if let Some(v) = lookup("COOKIE") {
        settings.cookie = Some(v);
    }
    if let Some(v) = lookup("NOTIFICATION_HIDE_MS") {
        settings.notification_hide_ms = v
            .parse()
            .with_context(|| format!("NOTIFICATION_HIDE_MS must be milliseconds, got '{v}'"))?;
    }
    if let Some(v) = lookup("LOG_FILTER") {
        settings.log_filter = v;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
