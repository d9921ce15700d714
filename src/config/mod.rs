// Configuration module entry point
// Loads layered configuration (file, environment, command line)

mod state;
mod types;

use std::net::SocketAddr;

use crate::cli::Cli;
use crate::error::ConfigError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig};

/// Environment variable prefix, e.g. `PDFBUCKET_SERVER__PORT=9000`
const ENV_PREFIX: &str = "PDFBUCKET";

impl Config {
    /// Load configuration from the given file path (extension optional).
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load the config file named on the command line and apply CLI overrides
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut cfg = Self::load_from(&cli.config)?;
        cfg.apply_cli(cli);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Command-line values win over file and environment values.
    /// Buckets given on the command line are merged in, replacing any
    /// file entry with the same name.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref host) = cli.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(workers) = cli.workers {
            self.server.workers = Some(workers);
        }
        for (name, path) in &cli.buckets {
            self.buckets.insert(name.clone(), path.clone());
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buckets.is_empty() {
            return Err(ConfigError::NoBuckets);
        }
        if self.server.workers == Some(0) {
            return Err(ConfigError::InvalidValue(
                "server.workers must be at least 1".to_string(),
            ));
        }
        self.get_socket_addr()?;
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ConfigError::InvalidAddress { addr, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> String {
        let path = dir.path().join("server.toml");
        std::fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        let cfg = Config::load_from(missing.to_str().unwrap()).unwrap();

        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8000);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.performance.read_timeout, 30);
        assert!(cfg.buckets.is_empty());
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[server]
port = 9100
workers = 2

[logging]
level = "debug"
access_log_format = "json"

[performance]
max_connections = 64

[buckets]
docs = "/srv/docs"
"#,
        );
        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.logging.level, crate::logger::LogLevel::Debug);
        assert_eq!(cfg.logging.access_log_format, "json");
        assert_eq!(cfg.performance.max_connections, Some(64));
        assert_eq!(cfg.buckets.get("docs"), Some(&PathBuf::from("/srv/docs")));
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, "[logging]\nlevel = \"chatty\"\n");
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[server]\nport = 9100\n\n[buckets]\ndocs = \"/old\"\nimages = \"/img\"\n",
        );
        let cli = Cli::parse_from([
            "pdf-bucket-server",
            "--config",
            path.as_str(),
            "--port",
            "9200",
            "--bucket",
            "docs=/new",
        ]);
        let cfg = Config::load(&cli).unwrap();

        assert_eq!(cfg.server.port, 9200);
        assert_eq!(cfg.buckets.get("docs"), Some(&PathBuf::from("/new")));
        assert_eq!(cfg.buckets.get("images"), Some(&PathBuf::from("/img")));
    }

    #[test]
    fn test_no_buckets_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(cfg.validate(), Err(ConfigError::NoBuckets)));
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        let mut cfg = Config::default();
        cfg.buckets.insert("docs".to_string(), PathBuf::from("/srv/docs"));
        cfg.server.workers = Some(0);
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_invalid_address() {
        let mut cfg = Config::default();
        cfg.server.host = "not an address".to_string();
        assert!(matches!(
            cfg.get_socket_addr(),
            Err(ConfigError::InvalidAddress { .. })
        ));
    }
}
