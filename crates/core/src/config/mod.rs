//! Layered configuration: explicit overrides, environment variables, and a
//! TOML file snapshot.
//!
//! Resolution order per key, first match wins:
//! 1. explicit runtime override ([`ConfigStore::set_override`]),
//! 2. environment variable (exact key, then dots-to-underscores uppercased,
//!    then all-lowercase),
//! 3. the file loaded once at startup.
//!
//! A missing file is fatal at load time; a missing individual key is not an
//! error unless a typed accessor requires the value.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::driver::{BrowserKind, PlatformKind};
use crate::error::{Error, Result};
use crate::nav::Module;


/// Environment variable naming an alternate configuration file.
pub const CONFIG_FILE_ENV: &str = "GX_CONFIG";

/// Default configuration file, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gx.toml";

/// Key-value snapshot combining an override layer, the process environment,
/// and a flattened TOML file.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    overrides: BTreeMap<String, String>,
    file: BTreeMap<String, String>,
}

impl ConfigStore {
    /// A store with no file layer. Useful for fully programmatic setups.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads and flattens a TOML configuration file. Nested tables become
    /// dotted keys, so `[module.image] subdomain = "image"` resolves as
    /// `module.image.subdomain`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "unable to read configuration file {}: {e}",
                path.display()
            ))
        })?;
        debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml_str(&raw)
    }

    /// Loads the file named by `GX_CONFIG`, falling back to `gx.toml`.
    pub fn load_default() -> Result<Self> {
        let path =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load(path)
    }

    /// Parses a TOML document into a store.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let value: toml::Value = raw
            .parse()
            .map_err(|e| Error::Config(format!("invalid configuration file: {e}")))?;
        let mut file = BTreeMap::new();
        flatten("", &value, &mut file);
        Ok(Self {
            overrides: BTreeMap::new(),
            file,
        })
    }

    /// Registers a runtime override. Overrides win over every other layer.
    pub fn set_override(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.overrides.insert(key.into(), value.into());
    }

    /// Resolves a key through the three layers. Absent everywhere is `None`,
    /// never an error.
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.overrides.get(key) {
            return Some(value.clone());
        }
        if let Some(value) = env_lookup(key) {
            return Some(value);
        }
        self.file.get(key).cloned()
    }

    /// Resolves a key, substituting `default` when absent from all layers.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// Environment lookup with key normalization: exact key first, then dots
/// converted to underscores and uppercased (`page.load.timeout` becomes
/// `PAGE_LOAD_TIMEOUT`), then the all-lowercase key.
fn env_lookup(key: &str) -> Option<String> {
    if let Ok(value) = std::env::var(key) {
        return Some(value);
    }
    let upper = key.replace('.', "_").to_uppercase();
    if let Ok(value) = std::env::var(&upper) {
        return Some(value);
    }
    std::env::var(key.to_lowercase()).ok()
}

fn flatten(prefix: &str, value: &toml::Value, out: &mut BTreeMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, nested) in table {
                let dotted = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&dotted, nested, out);
            }
        }
        toml::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        scalar => {
            out.insert(prefix.to_string(), scalar.to_string());
        }
    }
}

/// Typed accessors over a [`ConfigStore`].
///
/// Boolean keys follow lenient parsing (anything but `true`, case-insensitive,
/// is false); numeric and enum keys fail with [`Error::Config`] when present
/// but unparseable.
#[derive(Debug, Clone)]
pub struct Settings {
    store: ConfigStore,
}

impl Settings {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Loads settings from the default configuration file.
    pub fn load_default() -> Result<Self> {
        Ok(Self::new(ConfigStore::load_default()?))
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    pub fn browser(&self) -> Result<BrowserKind> {
        self.store.get_or("browser", "chrome").parse()
    }

    pub fn platform(&self) -> Result<PlatformKind> {
        self.store.get_or("platform", "dweb").parse()
    }

    pub fn base_url(&self) -> Option<String> {
        self.store.get("base.url")
    }

    pub fn remote(&self) -> bool {
        self.bool_key("remote", false)
    }

    pub fn grid_url(&self) -> String {
        self.store.get_or("grid.url", "http://localhost:4444/wd/hub")
    }

    /// Local automation endpoint (chromedriver or msedgedriver).
    pub fn webdriver_url(&self) -> String {
        self.store.get_or("webdriver.url", "http://localhost:9515")
    }

    pub fn headless(&self) -> bool {
        self.bool_key("headless", false)
    }

    pub fn implicit_wait(&self) -> Result<Duration> {
        Ok(Duration::from_secs(self.u64_key("implicit.wait", 0)?))
    }

    pub fn page_load_timeout(&self) -> Result<Duration> {
        Ok(Duration::from_secs(self.u64_key("page.load.timeout", 30)?))
    }

    pub fn screenshot_on_failure(&self) -> bool {
        self.bool_key("screenshot.on.failure", true)
    }

    pub fn artifacts_dir(&self) -> String {
        self.store.get_or("artifacts.dir", "artifacts")
    }

    pub fn mobile_device_name(&self) -> String {
        self.store.get_or("mobile.device.name", "Pixel 7")
    }

    pub fn mobile_width(&self) -> Result<u64> {
        self.u64_key("mobile.width", 412)
    }

    pub fn mobile_height(&self) -> Result<u64> {
        self.u64_key("mobile.height", 915)
    }

    pub fn mobile_pixel_ratio(&self) -> Result<f64> {
        let raw = self.store.get_or("mobile.pixel.ratio", "2.63");
        raw.trim()
            .parse()
            .map_err(|e| Error::Config(format!("invalid value for mobile.pixel.ratio: {raw} ({e})")))
    }

    pub fn mobile_user_agent(&self) -> String {
        self.store.get_or(
            "mobile.user.agent",
            "Mozilla/5.0 (Linux; Android 14; Pixel 7) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome Mobile Safari/537.36",
        )
    }

    pub fn environment(&self) -> String {
        self.store.get_or("environment", "local")
    }

    pub fn base_domain(&self) -> String {
        self.store.get_or("base.domain", "galaxy.ai")
    }

    /// Subdomain for a module, from `module.{name}.subdomain`. Required.
    pub fn module_subdomain(&self, module: Module) -> Result<String> {
        self.required(&format!("module.{}.subdomain", module.config_key()))
    }

    /// Base path for a module, from `module.{name}.base.path`. Required.
    pub fn module_base_path(&self, module: Module) -> Result<String> {
        self.required(&format!("module.{}.base.path", module.config_key()))
    }

    fn required(&self, key: &str) -> Result<String> {
        self.store
            .get(key)
            .ok_or_else(|| Error::Config(format!("required key is not configured: {key}")))
    }

    fn bool_key(&self, key: &str, default: bool) -> bool {
        match self.store.get(key) {
            Some(value) => value.trim().eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    fn u64_key(&self, key: &str, default: u64) -> Result<u64> {
        match self.store.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("invalid value for {key}: {raw} ({e})"))),
            None => Ok(default),
        }
    }
}
