use crate::store::DEFAULT_SOURCE_URL;
use anyhow::Result;
use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub appearance: AppearanceConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceConfig {
    /// Remote bookmark document, fetched once at startup.
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppearanceConfig {
    /// Column width of each folder panel, in terminal cells.
    pub panel_width: u16,
    /// Show the target URL of the selected bookmark in the footer.
    pub show_urls: bool,
    pub theme: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                url: DEFAULT_SOURCE_URL.to_string(),
                timeout_secs: 10,
            },
            appearance: AppearanceConfig {
                panel_width: 28,
                show_urls: true,
                theme: "dark".to_string(),
            },
        }
    }
}

pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig> {
    // If no config path is specified and no configs exist, just use defaults
    let has_config = config_path.is_some()
        || dirs::home_dir()
            .map(|h| h.join(".config").join("marks").join("config.toml").exists())
            .unwrap_or(false);

    if !has_config {
        return Ok(AppConfig::default());
    }

    let mut builder = Config::builder();

    // Start with defaults
    builder = builder.add_source(Config::try_from(&AppConfig::default())?);

    // Add system config if it exists
    if let Some(proj_dirs) = ProjectDirs::from("com", "marks", "marks") {
        let system_config = proj_dirs.config_dir().join("config.toml");
        if system_config.exists() {
            builder = builder.add_source(File::from(system_config));
        }
    }

    // Add user config if it exists
    if let Some(home) = dirs::home_dir() {
        let user_config = home.join(".config").join("marks").join("config.toml");
        if user_config.exists() {
            builder = builder.add_source(File::from(user_config));
        }
    }

    // Add specified config file
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path));
    }

    // Add environment variables with MARKS_ prefix
    builder = builder.add_source(Environment::with_prefix("MARKS").separator("_"));

    let config = builder.build()?;
    Ok(config.try_deserialize()?)
}

pub fn save_config(config: &AppConfig, path: Option<PathBuf>) -> Result<()> {
    let config_path = path.unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap()
            .join(".config")
            .join("marks")
            .join("config.toml")
    });

    // Ensure directory exists
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(config_path, toml_string)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn defaults_point_at_the_bundled_source() {
        let config = AppConfig::default();
        assert_eq!(config.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(config.source.timeout_secs, 10);
        assert!(config.appearance.panel_width > 0);
    }

    #[test]
    fn explicit_config_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [source]
            url = "https://example.com/marks.json"
            "#,
        )
        .unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.source.url, "https://example.com/marks.json");
        // Untouched sections keep their defaults.
        assert_eq!(config.source.timeout_secs, 10);
        assert_eq!(config.appearance.theme, "dark");
    }

    #[test]
    fn save_and_reload_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.appearance.panel_width = 40;
        config.appearance.show_urls = false;
        save_config(&config, Some(path.clone())).unwrap();

        let loaded = load_config(Some(path)).unwrap();
        assert_eq!(loaded.appearance.panel_width, 40);
        assert!(!loaded.appearance.show_urls);
    }
}
