use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analyzer::Timeouts;
use crate::cli::{Cli, Command, DEFAULT_HOST, DEFAULT_OUTPUT, DEFAULT_PORT};
use crate::http_client::DEFAULT_USER_AGENT;

/// Configuration file structure
/// All fields are optional to allow partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Address the HTTP API binds to
    pub host: Option<String>,

    /// Port the HTTP API listens on
    pub port: Option<u16>,

    /// Fetch budget for full analysis, in seconds
    pub analyze_timeout_secs: Option<u64>,

    /// Fetch budget for the meta fetch, in seconds
    pub meta_timeout_secs: Option<u64>,

    /// User-Agent sent to analyzed sites
    pub user_agent: Option<String>,

    /// Default tracing filter directive, e.g. "seolens=debug"
    pub log_level: Option<String>,

    /// Output format for one-shot commands: text or json
    pub output: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;

        let config = match format {
            ConfigFormat::Json => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            ConfigFormat::Toml => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Get the default configuration file paths to check (in order of priority)
    /// Returns paths in order: current directory, user config directory
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("seolens.{}", ext)));
            }
        }

        // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let config_dir = config_home.join("seolens");
            for format in &[ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
                for ext in format.extensions() {
                    paths.push(config_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Try to load configuration from default paths
    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading configuration");
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Loads the explicit `--config` file, or the first default path found.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(Path::new(path)),
            None => Ok(Self::from_default_paths()?.unwrap_or_default()),
        }
    }

    /// Fetch budgets, falling back to 15s / 10s
    pub fn timeouts(&self) -> Timeouts {
        let defaults = Timeouts::default();
        Timeouts {
            analyze: self
                .analyze_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.analyze),
            meta: self
                .meta_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.meta),
        }
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Merge this configuration with CLI arguments
    /// CLI arguments take precedence over config file values
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        let command = match &cli.command {
            Command::Serve(args) => {
                let mut args = args.clone();
                if args.host == DEFAULT_HOST
                    && let Some(host) = &self.host
                {
                    args.host = host.clone();
                }
                if args.port == DEFAULT_PORT
                    && let Some(port) = self.port
                {
                    args.port = port;
                }
                Command::Serve(args)
            }
            Command::Analyze(args) => {
                let mut args = args.clone();
                args.output = self.merge_output(&args.output);
                args.timeout = args.timeout.or(self.analyze_timeout_secs);
                Command::Analyze(args)
            }
            Command::Meta(args) => {
                let mut args = args.clone();
                args.output = self.merge_output(&args.output);
                args.timeout = args.timeout.or(self.meta_timeout_secs);
                Command::Meta(args)
            }
        };

        Cli {
            command,
            verbose: if cli.verbose {
                cli.verbose
            } else {
                self.verbose.unwrap_or(cli.verbose)
            },
            config: cli.config.clone(),
        }
    }

    fn merge_output(&self, cli_output: &str) -> String {
        if cli_output != DEFAULT_OUTPUT {
            cli_output.to_string()
        } else {
            self.output
                .clone()
                .unwrap_or_else(|| cli_output.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{AnalyzeArgs, ServeArgs};
    use serial_test::serial;
    use tempfile::NamedTempFile;

    fn serve_cli(host: &str, port: u16) -> Cli {
        Cli {
            command: Command::Serve(ServeArgs {
                host: host.to_string(),
                port,
            }),
            verbose: false,
            config: None,
        }
    }

    fn analyze_cli(output: &str, timeout: Option<u64>) -> Cli {
        Cli {
            command: Command::Analyze(AnalyzeArgs {
                url: "https://example.com".to_string(),
                output: output.to_string(),
                save: None,
                timeout,
            }),
            verbose: false,
            config: None,
        }
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.json")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.toml")),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.YML")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("config.txt")), None);
    }

    #[test]
    fn test_load_toml_config() {
        let toml_content = r#"
host = "0.0.0.0"
port = 9000
analyze_timeout_secs = 5
meta_timeout_secs = 3
user_agent = "custom-agent/1.0"
        "#;

        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("toml");
        fs::write(&temp_path, toml_content).unwrap();

        let config = Config::from_file(&temp_path).unwrap();
        assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.timeouts().analyze, Duration::from_secs(5));
        assert_eq!(config.timeouts().meta, Duration::from_secs(3));
        assert_eq!(config.user_agent(), "custom-agent/1.0");

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_load_yaml_config() {
        let yaml_content = r#"
port: 9100
log_level: "seolens=debug"
output: json
        "#;

        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("yaml");
        fs::write(&temp_path, yaml_content).unwrap();

        let config = Config::from_file(&temp_path).unwrap();
        assert_eq!(config.port, Some(9100));
        assert_eq!(config.log_level.as_deref(), Some("seolens=debug"));
        assert_eq!(config.output.as_deref(), Some("json"));

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_invalid_json_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("json");
        fs::write(&temp_path, "{ invalid json }").unwrap();

        assert!(Config::from_file(&temp_path).is_err());

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_unsupported_format() {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension("txt");
        fs::write(&temp_path, "content").unwrap();

        assert!(Config::from_file(&temp_path).is_err());

        fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_defaults_without_config() {
        let config = Config::default();
        assert_eq!(config.timeouts(), Timeouts::default());
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_merge_serve_defaults_from_config() {
        let config = Config {
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            verbose: Some(true),
            ..Default::default()
        };

        let merged = config.merge_with_cli(&serve_cli(DEFAULT_HOST, DEFAULT_PORT));
        let Command::Serve(args) = merged.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.port, 9000);
        assert!(merged.verbose);
    }

    #[test]
    fn test_merge_serve_cli_overrides() {
        let config = Config {
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            ..Default::default()
        };

        let merged = config.merge_with_cli(&serve_cli("10.0.0.1", 3000));
        let Command::Serve(args) = merged.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.host, "10.0.0.1");
        assert_eq!(args.port, 3000);
    }

    #[test]
    fn test_merge_analyze_output_and_timeout() {
        let config = Config {
            output: Some("json".to_string()),
            analyze_timeout_secs: Some(30),
            ..Default::default()
        };

        let merged = config.merge_with_cli(&analyze_cli(DEFAULT_OUTPUT, None));
        let Command::Analyze(args) = merged.command else {
            panic!("expected analyze command");
        };
        assert_eq!(args.output, "json");
        assert_eq!(args.timeout, Some(30));

        let merged = config.merge_with_cli(&analyze_cli("text-explicit", Some(2)));
        let Command::Analyze(args) = merged.command else {
            panic!("expected analyze command");
        };
        assert_eq!(args.output, "text-explicit");
        assert_eq!(args.timeout, Some(2));
    }

    #[test]
    #[serial]
    fn test_default_paths_with_xdg_config_home() {
        use std::env;

        unsafe {
            env::set_var("XDG_CONFIG_HOME", "/custom/config/path");
        }

        let paths = Config::default_paths();
        assert!(
            paths
                .iter()
                .any(|p| p.to_string_lossy().contains("/custom/config/path/seolens"))
        );
        assert!(
            paths
                .iter()
                .any(|p| p.to_string_lossy() == "seolens.toml")
        );

        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_from_default_paths_priority_order() {
        use std::env;
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path()).unwrap();

        let temp_config_dir = tempdir().unwrap();
        let config_dir = temp_config_dir.path().join("seolens");
        fs::create_dir_all(&config_dir).unwrap();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_config_dir.path());
        }

        fs::write(temp_dir.path().join("seolens.json"), r#"{"port": 7000}"#).unwrap();
        fs::write(config_dir.join("config.json"), r#"{"port": 7001}"#).unwrap();

        let config = Config::from_default_paths().unwrap().unwrap();
        assert_eq!(config.port, Some(7000));

        fs::remove_file(temp_dir.path().join("seolens.json")).unwrap();
        let config = Config::from_default_paths().unwrap().unwrap();
        assert_eq!(config.port, Some(7001));

        env::set_current_dir(&original_dir).ok();
        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_from_default_paths_returns_none_when_no_config_exists() {
        use std::env;
        use tempfile::tempdir;

        let temp_dir = tempdir().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path()).unwrap();

        let temp_config_dir = tempdir().unwrap();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_config_dir.path());
        }

        let result = Config::from_default_paths();
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());

        env::set_current_dir(&original_dir).ok();
        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }
}
