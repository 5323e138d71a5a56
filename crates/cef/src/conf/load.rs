//! Load: config loading from file and environment variables.

use std::path::Path;
use std::fs::File;
use std::io::Read;

use super::model::ParserConfig;

impl ParserConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = std::env::var("CEF_CONFIG_FILE")
            .unwrap_or_else(|_| "/etc/cef/parser.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: ParserConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply `CEF_*` overrides resolved through `lookup`.
    ///
    /// Unparseable values are errors rather than silently ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CEF_VALIDATE") {
            self.validate = parse_bool("CEF_VALIDATE", &v)?;
        }
        if let Some(v) = lookup("CEF_ALLOW_NULLS") {
            self.allow_nulls = parse_bool("CEF_ALLOW_NULLS", &v)?;
        }
        if let Some(v) = lookup("CEF_LOCALE") {
            self.locale = v.parse().map_err(|e| format!("CEF_LOCALE: {}", e))?;
        }
        if let Some(v) = lookup("CEF_MAX_LINE_SIZE") {
            self.max_line_size = v
                .trim()
                .parse()
                .map_err(|_| format!("CEF_MAX_LINE_SIZE: invalid size {:?}", v))?;
        }
        if let Some(v) = lookup("CEF_POPULATED_ONLY") {
            self.populated_only = parse_bool("CEF_POPULATED_ONLY", &v)?;
        }
        if let Some(v) = lookup("CEF_INCLUDE_CUSTOM") {
            self.include_custom = parse_bool("CEF_INCLUDE_CUSTOM", &v)?;
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(format!("{}: invalid boolean {:?}", name, value)),
    }
}
