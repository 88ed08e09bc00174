//! 加载器配置文件
//!
//! 配置以 JSON 保存，字段缺省时使用 `LoaderConfig::default()` 中的值。
//! 文件不存在视为使用默认配置；文件存在但无法解析或校验失败则报错，
//! 避免悄悄忽略用户写错的配置。

use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::image_loader::LoaderConfig;

/// 指定配置文件路径的环境变量。
pub const CONFIG_ENV_VAR: &str = "IMAGE_LOADER_CONFIG";

pub fn load_config_from_path(config_path: &Path) -> Result<LoaderConfig, AppError> {
    if !config_path.exists() {
        log::debug!("配置文件不存在，使用默认配置: {}", config_path.display());
        return Ok(LoaderConfig::default());
    }

    let content = fs::read_to_string(config_path)?;
    let config = serde_json::from_str::<LoaderConfig>(&content)
        .map_err(|e| AppError::Config(format!("failed to parse {}: {}", config_path.display(), e)))?;
    config
        .validate()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(config)
}

pub fn save_config_to_path(config_path: &Path, config: &LoaderConfig) -> Result<(), AppError> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("failed to serialize config: {}", e)))?;
    fs::write(config_path, content)?;
    Ok(())
}
