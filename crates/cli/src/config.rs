//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Client configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `NOVAFORGE_BACKEND_URL`: storefront backend (default: `"http://localhost:8000"`)
/// - `NOVAFORGE_DATA_DIR`: where the cart and session are kept
///   (default: the platform data directory plus `novaforge`)
/// - `NOVAFORGE_HTTP_TIMEOUT_SECS`: per-request timeout (default: `10`)
/// - `NOVAFORGE_LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `RUST_LOG`: tracing filter directive (default: `"warn"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
    pub log_format: LogFormat,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            backend_url: non_empty("NOVAFORGE_BACKEND_URL").unwrap_or(defaults.backend_url),
            data_dir: non_empty("NOVAFORGE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            http_timeout: non_empty("NOVAFORGE_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            log_format: match non_empty("NOVAFORGE_LOG_FORMAT").as_deref() {
                Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => defaults.log_format,
            },
            log_level: non_empty("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, backend_url: Option<String>, data_dir: Option<PathBuf>) -> Self {
        if let Some(url) = backend_url {
            self.backend_url = url;
        }
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("novaforge")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            data_dir: default_data_dir(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log_format: LogFormat::Text,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert!(config.data_dir.ends_with("novaforge"));
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_lookup_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("NOVAFORGE_BACKEND_URL", "https://api.novaforge.test"),
            ("NOVAFORGE_DATA_DIR", "/tmp/nf"),
            ("NOVAFORGE_HTTP_TIMEOUT_SECS", "3"),
            ("NOVAFORGE_LOG_FORMAT", "JSON"),
            ("RUST_LOG", "debug"),
        ]));

        assert_eq!(config.backend_url, "https://api.novaforge.test");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/nf"));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_or_blank_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("NOVAFORGE_BACKEND_URL", "  "),
            ("NOVAFORGE_HTTP_TIMEOUT_SECS", "soon"),
            ("NOVAFORGE_LOG_FORMAT", "xml"),
        ]));

        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_command_line_overrides_win() {
        let config = Config::from_lookup(lookup(&[("NOVAFORGE_BACKEND_URL", "http://env")]))
            .with_overrides(Some("http://flag".to_string()), Some(PathBuf::from("/flag")));

        assert_eq!(config.backend_url, "http://flag");
        assert_eq!(config.data_dir, PathBuf::from("/flag"));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        // SAFETY: serialized with every other test touching the environment
        unsafe { std::env::set_var("NOVAFORGE_BACKEND_URL", "http://from-env:9000") };
        let config = Config::from_env();
        unsafe { std::env::remove_var("NOVAFORGE_BACKEND_URL") };

        assert_eq!(config.backend_url, "http://from-env:9000");
    }
}
