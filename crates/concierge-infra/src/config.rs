//! Global configuration loader for Concierge.
//!
//! Reads `config.toml` from the data directory (`~/.concierge/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing or malformed. The model API key comes from the environment.

use std::path::Path;

use secrecy::SecretString;

use concierge_types::config::GlobalConfig;

/// Environment variables checked, in order, for the Gemini API key.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Resolve the model API key from the environment.
///
/// Returns `None` when none of [`API_KEY_ENV_VARS`] holds a non-blank value.
pub fn resolve_api_key() -> Option<SecretString> {
    resolve_api_key_with(|name| std::env::var(name).ok())
}

fn resolve_api_key_with(lookup: impl Fn(&str) -> Option<String>) -> Option<SecretString> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.admin.access_key, "1502admin");
        assert_eq!(config.chat.model, "gemini-3-flash-preview");
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[chat]
greeting = "Welcome to TEAM 1502."
max_tokens = 2048

[admin]
access_key = "rotated-key"
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.chat.greeting, "Welcome to TEAM 1502.");
        assert_eq!(config.chat.max_tokens, 2048);
        assert_eq!(config.admin.access_key, "rotated-key");
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.admin.access_key, "1502admin");
    }

    #[test]
    fn resolve_api_key_prefers_gemini_var() {
        let key = resolve_api_key_with(|name| match name {
            "GEMINI_API_KEY" => Some("primary".to_string()),
            "API_KEY" => Some("secondary".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(key.expose_secret(), "primary");
    }

    #[test]
    fn resolve_api_key_skips_blank_values() {
        let key = resolve_api_key_with(|name| match name {
            "GEMINI_API_KEY" => Some("   ".to_string()),
            "API_KEY" => Some("fallback".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(key.expose_secret(), "fallback");
    }

    #[test]
    fn resolve_api_key_none_when_unset() {
        assert!(resolve_api_key_with(|_| None).is_none());
    }
}
