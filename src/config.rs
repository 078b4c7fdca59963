use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub ai_dir: PathBuf,
    pub python_bin: String,
    pub script: PathBuf,
    pub features_file: PathBuf,
    pub timeout_ms: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            ai_dir: PathBuf::from("../TasteHubAI"),
            python_bin: "python3".to_string(),
            script: PathBuf::from("predict.py"),
            features_file: PathBuf::from("tastehub_features.json"),
            timeout_ms: 20_000,
        }
    }
}

impl ModelConfig {
    pub fn script_path(&self) -> PathBuf {
        resolve(&self.ai_dir, &self.script)
    }

    pub fn features_path(&self) -> PathBuf {
        resolve(&self.ai_dir, &self.features_file)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub model: ModelConfig,
    pub server: ServerConfig,
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => EngineConfig::default(),
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read config: {}", err))?;
        toml::from_str(&contents).map_err(|err| format!("failed to parse config: {}", err))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("TASTEHUB_AI_DIR") {
            if !dir.trim().is_empty() {
                self.model.ai_dir = PathBuf::from(dir);
            }
        }
        if let Ok(bin) = env::var("PYTHON_BIN") {
            if !bin.trim().is_empty() {
                self.model.python_bin = bin;
            }
        }
        if let Ok(script) = env::var("TASTEHUB_PREDICT_SCRIPT") {
            if !script.trim().is_empty() {
                self.model.script = PathBuf::from(script);
            }
        }
        if let Ok(features) = env::var("TASTEHUB_FEATURES_FILE") {
            if !features.trim().is_empty() {
                self.model.features_file = PathBuf::from(features);
            }
        }
        if let Ok(timeout) = env::var("MODEL_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.model.timeout_ms = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("TASTEHUB_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/tastehub.toml")))
}
