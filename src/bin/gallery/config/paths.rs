use std::path::PathBuf;

use super::error::ConfigError;

const APP_DIR: &str = "image-gallery";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl ConfigPaths {
    pub fn resolve(config_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = default_data_dir()?;
        if let Some(path) = config_override {
            let dir = match path.parent() {
                Some(dir) if dir.as_os_str().is_empty() => PathBuf::from("."),
                Some(dir) => dir.to_path_buf(),
                None => return Err(ConfigError::InvalidPath(path)),
            };
            return Ok(Self::from_dirs(dir, data_dir, path));
        }
        let config_dir = default_config_dir()?;
        let config_file = config_dir.join("config.toml");
        Ok(Self::from_dirs(config_dir, data_dir, config_file))
    }

    fn from_dirs(config_dir: PathBuf, data_dir: PathBuf, config_file: PathBuf) -> Self {
        Self {
            config_file,
            config_dir,
            logs_dir: data_dir.join("logs"),
            output_dir: data_dir.join("output"),
            data_dir,
        }
    }
}

fn default_config_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::MissingHome)?;
    Ok(home.join(".config").join(APP_DIR))
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::MissingHome)?;
    Ok(home.join(".local").join("share").join(APP_DIR))
}
