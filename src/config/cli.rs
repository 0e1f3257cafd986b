use crate::config::toml_config::ServiceConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "strength-serve")]
#[command(about = "Serve concrete compressive strength predictions over HTTP")]
pub struct ServeArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Model artifact path (overrides config and MODEL_PATH)
    #[arg(long)]
    pub model_path: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Emit JSON logs
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ServeArgs {
    /// 載入順序: 預設值 < TOML 檔案 < 環境變數 < 命令列參數
    pub fn load_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::default(),
        };

        config.apply_env_overrides()?;

        if let Some(path) = &self.model_path {
            config.model.path = path.clone();
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        config.logging.json |= self.json_logs;
        config.logging.verbose |= self.verbose;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = ServeArgs::parse_from([
            "strength-serve",
            "--model-path",
            "/tmp/forest.json",
            "--port",
            "9100",
            "--json-logs",
        ]);

        let config = args.load_config().unwrap();
        assert_eq!(config.model.path, "/tmp/forest.json");
        assert_eq!(config.server.port, 9100);
        assert!(config.logging.json);
    }
}
