use serde::Deserialize;

pub const DEFAULT_HOST: &str = "nominatim.openstreetmap.org";

pub const DEFAULT_CREDITS: &str = "<p>Location data provided by <a href=\"https://nominatim.openstreetmap.org/\">Nominatim</a>, \
     &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors.</p>";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Geocoding service
    pub host: String,
    pub credits: String,
    pub language: String,

    // Cache settings
    pub expiry_secs: u64,
    pub cache_gc_interval_secs: u64,

    // Failure handling
    pub timeout_secs: u64,
    pub timeout_window_secs: u64,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            credits: DEFAULT_CREDITS.to_string(),
            language: "en".to_string(),
            expiry_secs: 90 * 24 * 3600,
            cache_gc_interval_secs: 300,
            timeout_secs: 2,
            timeout_window_secs: 60,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("NOMINATIM_HOST must not be empty")]
    EmptyHost,

    #[error("NOMINATIM_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,

    #[error("NOMINATIM_CACHE_GC_INTERVAL_SECS must be greater than zero")]
    ZeroGcInterval,
}

impl Config {
    /// Reject settings that would make every lookup fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.cache_gc_interval_secs == 0 {
            return Err(ConfigError::ZeroGcInterval);
        }
        Ok(())
    }
}

fn env_secs(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or(default)
}

pub fn load_config() -> anyhow::Result<Config> {
    let defaults = Config::default();

    let host = std::env::var("NOMINATIM_HOST").unwrap_or(defaults.host);

    let credits = std::env::var("NOMINATIM_CREDITS").unwrap_or(defaults.credits);

    let language = std::env::var("NOMINATIM_LANGUAGE").unwrap_or(defaults.language);

    let expiry_secs = env_secs("NOMINATIM_EXPIRY_SECS", defaults.expiry_secs);

    let cache_gc_interval_secs = env_secs(
        "NOMINATIM_CACHE_GC_INTERVAL_SECS",
        defaults.cache_gc_interval_secs,
    );

    let timeout_secs = env_secs("NOMINATIM_TIMEOUT_SECS", defaults.timeout_secs);

    let timeout_window_secs =
        env_secs("NOMINATIM_TIMEOUT_WINDOW_SECS", defaults.timeout_window_secs);

    let debug = std::env::var("DEBUG").is_ok();

    let cfg = Config {
        host,
        credits,
        language,
        expiry_secs,
        cache_gc_interval_secs,
        timeout_secs,
        timeout_window_secs,
        debug,
    };
    cfg.validate()?;

    Ok(cfg)
}
