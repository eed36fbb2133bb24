//! Studio configuration and data directory resolution.
//!
//! Reads `config.toml` from the data directory (`~/.chatstudio/` by default)
//! into [`StudioConfig`]. Falls back to defaults when the file is missing,
//! malformed, or carries out-of-range values.

use std::path::{Path, PathBuf};

use chatstudio_types::config::StudioConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CHATSTUDIO_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CHATSTUDIO_DATA_DIR` environment variable
/// 2. `~/.chatstudio`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatstudio");
    }

    // Last resort: current directory
    PathBuf::from(".chatstudio")
}

/// Load studio configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`StudioConfig::default()`].
/// - Unreadable, unparsable, or out-of-range file: warning plus defaults.
pub async fn load_studio_config(data_dir: &Path) -> StudioConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return StudioConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return StudioConfig::default();
        }
    };

    let config = match toml::from_str::<StudioConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            return StudioConfig::default();
        }
    };

    if !(0.0..=1.0).contains(&config.temperature) {
        tracing::warn!(
            temperature = config.temperature,
            "Temperature in {} is outside [0, 1], using defaults",
            config_path.display()
        );
        return StudioConfig::default();
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatstudio_types::llm::ReasoningEffort;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_studio_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_studio_config(tmp.path()).await;
        assert_eq!(config.model, "gpt-5");
        assert!(config.anonymize);
        assert_eq!(config.max_retries, 0);
    }

    #[tokio::test]
    async fn load_studio_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
model = "gpt-5-mini"
temperature = 0.7
reasoning_effort = "low"
max_retries = 2
"#,
        )
        .await
        .unwrap();

        let config = load_studio_config(tmp.path()).await;
        assert_eq!(config.model, "gpt-5-mini");
        assert!((config.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.reasoning_effort, ReasoningEffort::Low);
        assert_eq!(config.max_retries, 2);
        // Unset keys keep their defaults
        assert!(config.anonymize);
        assert_eq!(config.request_timeout_secs, 300);
    }

    #[tokio::test]
    async fn load_studio_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_studio_config(tmp.path()).await;
        assert_eq!(config.model, "gpt-5");
    }

    #[tokio::test]
    async fn load_studio_config_out_of_range_temperature_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "model = \"x\"\ntemperature = 1.5\n")
            .await
            .unwrap();

        let config = load_studio_config(tmp.path()).await;
        assert_eq!(config.model, "gpt-5");
        assert!((config.temperature - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn resolve_data_dir_ends_with_chatstudio_by_default() {
        // Only meaningful when the override is unset in the test environment.
        if std::env::var(DATA_DIR_ENV).is_err() {
            assert!(resolve_data_dir().ends_with(".chatstudio"));
        }
    }
}
