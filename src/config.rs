use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory holding the model source files.
    pub dir: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("model"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// GAMS executable, resolved through PATH when not absolute.
    pub executable: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("gams"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("MSG__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_no_config_file() {
        let cfg = Config::default();
        assert_eq!(cfg.model.dir, PathBuf::from("model"));
        assert_eq!(cfg.engine.executable, PathBuf::from("gams"));
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let cfg: Config = Figment::new()
            .merge(Toml::string("[engine]\nexecutable = \"/opt/gams/gams\"\n"))
            .extract()
            .unwrap();
        assert_eq!(cfg.engine.executable, PathBuf::from("/opt/gams/gams"));
        assert_eq!(cfg.model.dir, PathBuf::from("model"));
    }
}
