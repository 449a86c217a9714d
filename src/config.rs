use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_GYM_NAME: &str = "Cross-X";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub gym_name: String,
    pub seed_demo: bool,
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl AppConfig {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = non_empty("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_dir = non_empty("GYM_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let seed_demo = non_empty("GYM_SEED_DEMO")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            port,
            data_dir,
            gym_name: non_empty("GYM_NAME").unwrap_or_else(|| DEFAULT_GYM_NAME.to_string()),
            seed_demo,
            generator: GeneratorConfig {
                api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
                base_url: non_empty("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.gym_name, "Cross-X");
        assert!(!config.seed_demo);
        assert!(config.generator.api_key.is_none());
        assert_eq!(config.generator.model, "gemini-2.5-flash");
    }

    #[test]
    fn invalid_port_falls_back() {
        assert_eq!(config(&[("PORT", "not-a-port")]).port, 8080);
        assert_eq!(config(&[("PORT", "9090")]).port, 9090);
    }

    #[test]
    fn api_key_prefers_gemini_variable() {
        let config = config(&[("API_KEY", "legacy"), ("GEMINI_API_KEY", "primary")]);
        assert_eq!(config.generator.api_key.as_deref(), Some("primary"));

        let legacy = AppConfig::from_lookup(|key| {
            (key == "API_KEY").then(|| "legacy".to_string())
        });
        assert_eq!(legacy.generator.api_key.as_deref(), Some("legacy"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config(&[("GEMINI_API_KEY", "  "), ("GYM_SEED_DEMO", "true")]);
        assert!(config.generator.api_key.is_none());
        assert!(config.seed_demo);
    }
}
