use crate::core::validator::DEFAULT_MAX_WATER_BINDER_RATIO;
use crate::core::ConfigProvider;
use crate::domain::schema::{MixSchema, RangeOverride};
use crate::utils::error::{Result, StrengthError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_MODEL_PATH: &str = "models/model.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Per-field range overrides, e.g. `[schema.cement] min = 80.0`
    #[serde(default)]
    pub schema: HashMap<String, RangeOverride>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_max_water_binder_ratio")]
    pub max_water_binder_ratio: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_water_binder_ratio: default_max_water_binder_ratio(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub verbose: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_model_path() -> String {
    DEFAULT_MODEL_PATH.to_string()
}

fn default_max_water_binder_ratio() -> f64 {
    DEFAULT_MAX_WATER_BINDER_RATIO
}

impl ServiceConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StrengthError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StrengthError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_PATH})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StrengthError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// MODEL_PATH / API_HOST / API_PORT 環境變數覆蓋檔案設定
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// 由任意來源讀取覆蓋值，`lookup` 傳回 None 表示未設定
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("MODEL_PATH") {
            self.model.path = path;
        }
        if let Some(host) = lookup("API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| StrengthError::InvalidConfigValueError {
                    field: "API_PORT".to_string(),
                    value: port.clone(),
                    reason: "Port must be an integer between 0 and 65535".to_string(),
                })?;
        }
        Ok(())
    }

    pub fn mix_schema(&self) -> Result<MixSchema> {
        MixSchema::with_overrides(&self.schema)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_path("model.path", &self.model.path)?;
        validate_positive_number(
            "validation.max_water_binder_ratio",
            self.validation.max_water_binder_ratio,
        )?;

        for origin in &self.server.cors_origins {
            if origin != "*" {
                crate::utils::validation::validate_url("server.cors_origins", origin)?;
            }
        }

        self.mix_schema()?;
        Ok(())
    }
}

impl ConfigProvider for ServiceConfig {
    fn model_path(&self) -> &str {
        &self.model.path
    }

    fn max_water_binder_ratio(&self) -> f64 {
        self.validation.max_water_binder_ratio
    }

    fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MixField;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.model.path, "models/model.json");
        assert_eq!(config.validation.max_water_binder_ratio, 1.0);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 9000
cors_origins = ["http://localhost:8501"]

[model]
path = "/srv/models/forest.json"

[validation]
max_water_binder_ratio = 0.9

[schema.cement]
min = 80.0

[logging]
json = true
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.model_path(), "/srv/models/forest.json");
        assert_eq!(config.max_water_binder_ratio(), 0.9);
        assert!(config.logging.json);
        assert!(config.validate().is_ok());

        let schema = config.mix_schema().unwrap();
        assert_eq!(schema.spec(MixField::Cement).unwrap().min, 80.0);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STRENGTH_TEST_MODEL_DIR", "/opt/models");

        let toml_content = r#"
[model]
path = "${STRENGTH_TEST_MODEL_DIR}/model.json"
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.model.path, "/opt/models/model.json");

        std::env::remove_var("STRENGTH_TEST_MODEL_DIR");
    }

    #[test]
    fn test_config_validation() {
        let bad_ratio = ServiceConfig::from_toml_str("[validation]\nmax_water_binder_ratio = 0.0\n").unwrap();
        assert!(bad_ratio.validate().is_err());

        let bad_origin = ServiceConfig::from_toml_str("[server]\ncors_origins = [\"not a url\"]\n").unwrap();
        assert!(bad_origin.validate().is_err());

        let bad_schema = ServiceConfig::from_toml_str("[schema.age]\nmin = 400.0\n").unwrap();
        assert!(bad_schema.validate().is_err());

        assert!(ServiceConfig::from_toml_str("[server]\nport = \"eighty\"\n").is_err());
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServiceConfig::from_toml_str("[server]\nhost = \"127.0.0.1\"\nport = 9000\n").unwrap();
        config
            .apply_overrides_from(env_from(&[
                ("MODEL_PATH", "/srv/models/boosted.json"),
                ("API_HOST", "localhost"),
                ("API_PORT", "8080"),
            ]))
            .unwrap();

        assert_eq!(config.model_path(), "/srv/models/boosted.json");
        assert_eq!(config.bind_address(), "localhost:8080");
    }

    #[test]
    fn test_env_overrides_leave_unset_values() {
        let mut config = ServiceConfig::default();
        config.apply_overrides_from(env_from(&[("API_PORT", "8501")])).unwrap();

        assert_eq!(config.server.port, 8501);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.model.path, "models/model.json");
    }

    #[test]
    fn test_non_numeric_api_port_rejected() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_overrides_from(env_from(&[("API_PORT", "eighty")]))
            .unwrap_err();

        match err {
            StrengthError::InvalidConfigValueError { field, value, .. } => {
                assert_eq!(field, "API_PORT");
                assert_eq!(value, "eighty");
            }
            other => panic!("expected invalid config value, got {:?}", other),
        }
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 8123\n")
            .unwrap();

        let config = ServiceConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
