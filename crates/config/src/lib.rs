//! Aurora Configuration Management
//!
//! Loads the engine options file (`config/engine.txt`): one `key = value`
//! per line, `#` or `//` comments, unknown keys ignored.

use aurora_core::{AuroraError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the options file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/engine.txt";

/// Highest selectable texture pack (0 = lowest quality)
pub const MAX_TEXTURE_PACK: u8 = 3;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Module content description (from "content" option)
    pub content_file: PathBuf,
    /// Module to load at startup (from "module" option)
    pub module: String,
    /// Tag of the object the player enters at (from "entry" option)
    pub entry_location: Option<String>,
    /// Tag given to the player object (from "pc" option)
    pub pc_tag: String,
    /// Texture pack quality, 0..=3 (from "texturepack" option)
    pub texture_pack: u8,
    /// Milliseconds per simulation tick (from "tickms" option)
    pub tick_ms: u64,
    /// Stop after this many ticks, 0 = run until exit (from "maxticks" option)
    pub max_ticks: u64,
    /// Fallback log filter when RUST_LOG is unset (from "loglevel" option)
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            content_file: PathBuf::from("content.json"),
            module: String::new(),
            entry_location: None,
            pc_tag: "player".into(),
            texture_pack: 2,
            tick_ms: 16,
            max_ticks: 0,
            log_level: "info".into(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from an options file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AuroraError::Config(format!("reading {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Load `config/engine.txt`, falling back to defaults if it is missing
    pub fn load_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if !path.exists() {
            tracing::debug!("{} not found, using default configuration", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Parse options file content
    pub fn parse(content: &str) -> Result<Self> {
        let mut config = Self::default();

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            let Some(eq_pos) = line.find('=') else {
                return Err(AuroraError::Config(format!(
                    "line {}: expected `key = value`, got {:?}",
                    number + 1,
                    line
                )));
            };

            let key = line[..eq_pos].trim().to_lowercase();
            let value = line[eq_pos + 1..].trim();
            config.parse_option(&key, value);
        }

        Ok(config)
    }

    fn parse_option(&mut self, key: &str, value: &str) {
        match key {
            "content" => self.content_file = PathBuf::from(value),
            "module" => self.module = value.into(),
            "entry" => {
                self.entry_location = if value.is_empty() {
                    None
                } else {
                    Some(value.into())
                };
            }
            "pc" => self.pc_tag = value.into(),
            "texturepack" => {
                self.texture_pack = value.parse().unwrap_or(2).min(MAX_TEXTURE_PACK);
            }
            "tickms" => {
                self.tick_ms = value.parse().unwrap_or(16).max(1);
            }
            "maxticks" => {
                self.max_ticks = value.parse().unwrap_or(0);
            }
            "loglevel" => self.log_level = value.into(),
            _ => {
                tracing::debug!("Unknown config option: {} = {}", key, value);
            }
        }
    }

    /// Duration of one simulation tick
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Log the effective configuration
    pub fn display(&self) {
        tracing::info!("Engine configuration:");
        tracing::info!("  Content: {}", self.content_file.display());
        if self.module.is_empty() {
            tracing::info!("  Module: (none)");
        } else {
            tracing::info!("  Module: {}", self.module);
        }
        if let Some(ref entry) = self.entry_location {
            tracing::info!("  Entry: {}", entry);
        }
        tracing::info!("  PC tag: {}", self.pc_tag);
        tracing::info!("  Texture pack: {}", self.texture_pack);
        tracing::info!("  Tick: {} ms", self.tick_ms);
        if self.max_ticks > 0 {
            tracing::info!("  Max ticks: {}", self.max_ticks);
        }
        tracing::info!("  Log level: {}", self.log_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.texture_pack, 2);
        assert_eq!(config.pc_tag, "player");
        assert!(config.entry_location.is_none());
    }

    #[test]
    fn test_parse_simple_config() {
        let config_text = r#"
# startup module
module = tutorial
entry = wp_start
tickms = 0
texturepack = 9
// unknown keys are ignored
fancy = yes
"#;
        let config = EngineConfig::parse(config_text).unwrap();
        assert_eq!(config.module, "tutorial");
        assert_eq!(config.entry_location.as_deref(), Some("wp_start"));
        assert_eq!(config.tick_ms, 1);
        assert_eq!(config.texture_pack, MAX_TEXTURE_PACK);
    }

    #[test]
    fn test_parse_rejects_line_without_equals() {
        let err = EngineConfig::parse("module tutorial").unwrap_err();
        assert!(matches!(err, AuroraError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "content = data/demo.json").unwrap();
        writeln!(file, "maxticks = 120").unwrap();

        let config = EngineConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.content_file, PathBuf::from("data/demo.json"));
        assert_eq!(config.max_ticks, 120);
        assert_eq!(config.tick_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = EngineConfig::load_from_file(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, AuroraError::Config(_)));
    }
}
