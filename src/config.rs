// Configuration module for ghostwrite
// This module handles loading and parsing configuration from ~/.config/ghostwrite/config.toml

pub mod ai_types;
mod types;

pub use types::{Config, SuggestConfig};

use std::fs;
use std::path::{Path, PathBuf};

/// Result of loading configuration
pub struct ConfigResult {
    pub config: Config,
    pub warning: Option<String>,
}

/// Loads configuration from ~/.config/ghostwrite/config.toml
/// Returns default configuration if file doesn't exist or on parse errors
pub fn load_config() -> ConfigResult {
    load_config_from(&get_config_path())
}

/// Loads configuration from an explicit path with the same fallback rules
pub fn load_config_from(config_path: &Path) -> ConfigResult {
    log::debug!("Loading config from {:?}", config_path);

    // If file doesn't exist, return defaults silently
    if !config_path.exists() {
        log::debug!("Config file does not exist, using defaults");
        return ConfigResult {
            config: Config::default(),
            warning: None,
        };
    }

    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            log::error!("Failed to read config file {:?}: {}", config_path, e);
            return ConfigResult {
                config: Config::default(),
                warning: Some(format!("Failed to read config: {}", e)),
            };
        }
    };

    match toml::from_str::<Config>(&contents) {
        Ok(config) => {
            log::debug!(
                "Config parsed: suggest enabled={}, debounce={}ms, provider={}",
                config.suggest.enabled,
                config.suggest.debounce_ms,
                config.ai.provider.name()
            );
            ConfigResult {
                config,
                warning: None,
            }
        }
        Err(e) => {
            log::error!("Failed to parse config file {:?}: {}", config_path, e);
            ConfigResult {
                config: Config::default(),
                warning: Some(format!("Invalid config: {}", e)),
            }
        }
    }
}

/// Returns the path to the configuration file
///
/// Always uses ~/.config/ghostwrite/config.toml on all platforms for consistency.
fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ghostwrite")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_missing_file_returns_defaults_without_warning() {
        let dir = TempDir::new().unwrap();
        let result = load_config_from(&dir.path().join("absent.toml"));
        assert!(result.warning.is_none());
        assert_eq!(result.config.suggest.debounce_ms, 1000);
    }

    #[test]
    fn test_valid_file_is_loaded() {
        let (_dir, path) = write_config(
            r#"
[suggest]
debounce_ms = 300
cache_capacity = 10
"#,
        );
        let result = load_config_from(&path);
        assert!(result.warning.is_none());
        assert_eq!(result.config.suggest.debounce_ms, 300);
        assert_eq!(result.config.suggest.cache_capacity, 10);
    }

    #[test]
    fn test_directory_path_yields_read_warning() {
        let dir = TempDir::new().unwrap();
        let result = load_config_from(dir.path());
        let warning = result.warning.expect("reading a directory should warn");
        assert!(warning.starts_with("Failed to read config"));
        assert_eq!(result.config.suggest.cache_capacity, 25);
    }

    // Any malformed TOML falls back to defaults with an "Invalid config" warning.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn prop_malformed_toml_fallback(
            malformed in prop::sample::select(vec![
                "[suggest\ndebounce_ms = 10",
                "[suggest]\nmarker_class = ghost",
                "[suggest]\n debounce_ms",
                "suggest]\nenabled = true",
                "[suggest]\nmarker_class = \"ghost",
            ])
        ) {
            let (_dir, path) = write_config(malformed);
            let result = load_config_from(&path);

            let warning = result.warning.unwrap_or_default();
            prop_assert!(warning.starts_with("Invalid config"), "got: {}", warning);
            prop_assert_eq!(result.config.suggest.debounce_ms, 1000);
            prop_assert!(result.config.suggest.enabled);
        }
    }

    #[test]
    fn test_config_path_ends_with_ghostwrite_config() {
        let path = get_config_path();
        let path_str = path.to_string_lossy();
        assert!(
            path_str.ends_with("ghostwrite/config.toml")
                || path_str.ends_with("ghostwrite\\config.toml"),
            "unexpected config path: {}",
            path_str
        );
    }
}
